//! Reporting chains and their forward simulation
//!
//! Two real-world chains turn a sensor reading into a publicly displayed
//! whole-degree Fahrenheit value:
//!
//! - **ASOS** (5-minute automated report): round to whole °F, convert to °C,
//!   round to whole °C, convert back to °F, round to whole °F.
//! - **METAR** (hourly aviation report): round to whole °C, convert to °F,
//!   round to whole °F.
//!
//! All rounding is round-half-up (`n + 0.5 → n + 1`). The first rounding
//! acts on the raw reading; every later value is an exact rational computed
//! with [`Ratio`], so boundary decisions are never subject to binary
//! floating-point drift.
//!
//! # Usage
//! ```
//! use temp_rounding_core::pipeline::{simulate_asos, Pipeline};
//!
//! let steps = simulate_asos(69.7);
//! assert_eq!(steps.rounded_c, 21);
//! assert_eq!(steps.displayed_f, 70);
//! assert_eq!(Pipeline::Metar.display_for(20.7), 70);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core_types::exact::{round_half_up, Ratio};
use crate::core_types::units::TemperatureUnit;

/// One step of a reporting chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Round half-up to a whole degree of the given unit
    Round(TemperatureUnit),
    /// Exact unit conversion
    Convert {
        /// Unit of the incoming value
        from: TemperatureUnit,
        /// Unit of the outgoing value
        to: TemperatureUnit,
    },
}

impl Step {
    /// Unit of the value this step produces
    pub fn output_unit(self) -> TemperatureUnit {
        match self {
            Step::Round(unit) => unit,
            Step::Convert { to, .. } => to,
        }
    }

    fn apply(self, value: StageValue) -> StageValue {
        match (self, value) {
            (Step::Round(_), StageValue::Real(x)) => StageValue::Exact(Ratio::integer(round_half_up(x))),
            (Step::Round(_), StageValue::Exact(r)) => StageValue::Exact(Ratio::integer(r.round_half_up())),
            (Step::Convert { from, to }, StageValue::Exact(r)) => StageValue::Exact(r.convert(from, to)),
            (Step::Convert { from, to }, StageValue::Real(x)) => StageValue::Real(from.convert(x, to)),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Round(unit) => write!(f, "round to whole {unit}"),
            Step::Convert { from, to } => write!(f, "convert {from} to {to}"),
        }
    }
}

/// Value flowing between steps
///
/// A chain starts on a raw reading and becomes exact after its first
/// rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StageValue {
    /// Raw reading, not yet rounded
    Real(f64),
    /// Exact rational derived from whole-degree values
    Exact(Ratio),
}

impl StageValue {
    /// Nearest f64, for display
    pub fn to_f64(self) -> f64 {
        match self {
            StageValue::Real(x) => x,
            StageValue::Exact(r) => r.to_f64(),
        }
    }

    /// Whole-degree value, if this stage holds one exactly
    pub fn as_integer(self) -> Option<i64> {
        match self {
            StageValue::Exact(r) if r.is_integer() => Some(r.numer()),
            _ => None,
        }
    }
}

const ASOS_STEPS: [Step; 5] = [
    Step::Round(TemperatureUnit::Fahrenheit),
    Step::Convert {
        from: TemperatureUnit::Fahrenheit,
        to: TemperatureUnit::Celsius,
    },
    Step::Round(TemperatureUnit::Celsius),
    Step::Convert {
        from: TemperatureUnit::Celsius,
        to: TemperatureUnit::Fahrenheit,
    },
    Step::Round(TemperatureUnit::Fahrenheit),
];

const METAR_STEPS: [Step; 3] = [
    Step::Round(TemperatureUnit::Celsius),
    Step::Convert {
        from: TemperatureUnit::Celsius,
        to: TemperatureUnit::Fahrenheit,
    },
    Step::Round(TemperatureUnit::Fahrenheit),
];

/// Reporting chain variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// Automated Surface Observing System, 5-minute report (F→C→F)
    #[default]
    Asos,
    /// Hourly aviation routine weather report (C→F)
    Metar,
}

impl Pipeline {
    /// Both chains, in declaration order
    pub const ALL: [Pipeline; 2] = [Pipeline::Asos, Pipeline::Metar];

    /// Ordered step list of this chain
    pub fn steps(self) -> &'static [Step] {
        match self {
            Pipeline::Asos => &ASOS_STEPS,
            Pipeline::Metar => &METAR_STEPS,
        }
    }

    /// Unit of the true reading fed into the chain
    pub fn input_unit(self) -> TemperatureUnit {
        match self {
            Pipeline::Asos => TemperatureUnit::Fahrenheit,
            Pipeline::Metar => TemperatureUnit::Celsius,
        }
    }

    /// Unit of the whole-degree intermediate value, if the chain has one
    pub fn intermediate_unit(self) -> Option<TemperatureUnit> {
        match self {
            Pipeline::Asos => Some(TemperatureUnit::Celsius),
            Pipeline::Metar => None,
        }
    }

    /// Unit of the published value (always Fahrenheit)
    pub fn displayed_unit(self) -> TemperatureUnit {
        TemperatureUnit::Fahrenheit
    }

    /// Run the chain on a raw reading, recording every stage
    pub fn simulate(self, input: f64) -> PipelineTrace {
        let mut value = StageValue::Real(input);
        let mut stages = Vec::with_capacity(self.steps().len());
        for &step in self.steps() {
            value = step.apply(value);
            stages.push(Stage { step, value });
        }
        PipelineTrace {
            pipeline: self,
            input,
            displayed: settle(value),
            stages,
        }
    }

    /// Displayed value for a raw reading
    pub fn display_for(self, input: f64) -> i64 {
        self.display_for_rounded_input(round_half_up(input))
    }

    /// Displayed value once the first rounding has produced `rounded_input`
    ///
    /// Every reading in `[rounded_input - 0.5, rounded_input + 0.5)` shares
    /// this result, which is what makes the chain a step function.
    pub fn display_for_rounded_input(self, rounded_input: i64) -> i64 {
        let value = self.steps()[1..]
            .iter()
            .fold(StageValue::Exact(Ratio::integer(rounded_input)), |v, step| {
                step.apply(v)
            });
        settle(value)
    }

    /// Whole-degree intermediate reached from `rounded_input`, if the chain has one
    pub fn intermediate_for_rounded_input(self, rounded_input: i64) -> Option<i64> {
        match self {
            Pipeline::Asos => Some(
                Ratio::integer(rounded_input)
                    .fahrenheit_to_celsius()
                    .round_half_up(),
            ),
            Pipeline::Metar => None,
        }
    }

    /// Displayed value produced by a whole-degree Celsius value entering the
    /// final C→F hop; shared by both chains
    pub fn display_for_celsius(rounded_c: i64) -> i64 {
        Ratio::integer(rounded_c).celsius_to_fahrenheit().round_half_up()
    }
}

/// Final stage of a chain as a whole degree
fn settle(value: StageValue) -> i64 {
    match value {
        StageValue::Real(x) => round_half_up(x),
        StageValue::Exact(r) => r.round_half_up(),
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pipeline::Asos => f.write_str("ASOS"),
            Pipeline::Metar => f.write_str("METAR"),
        }
    }
}

impl FromStr for Pipeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asos" => Ok(Pipeline::Asos),
            "metar" => Ok(Pipeline::Metar),
            other => Err(format!("unknown pipeline '{other}' (expected asos or metar)")),
        }
    }
}

/// One recorded stage of a simulated chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Step that produced this value
    pub step: Step,
    /// Value after the step
    pub value: StageValue,
}

/// Every intermediate value of one simulated reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineTrace {
    /// Chain that was run
    pub pipeline: Pipeline,
    /// Raw reading, in the chain's input unit
    pub input: f64,
    /// Stage values in step order
    pub stages: Vec<Stage>,
    /// Published whole-degree Fahrenheit value
    pub displayed: i64,
}

impl fmt::Display for PipelineTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}{}", self.pipeline, self.input, self.pipeline.input_unit())?;
        for stage in &self.stages {
            let unit = stage.step.output_unit();
            match stage.value.as_integer() {
                Some(n) => write!(f, " -> {n}{unit}")?,
                None => write!(f, " -> {:.2}{unit}", stage.value.to_f64())?,
            }
        }
        Ok(())
    }
}

/// Intermediate values of the ASOS chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsosSteps {
    /// Reading rounded to whole °F
    pub rounded_f: i64,
    /// Exact Celsius equivalent of `rounded_f`
    pub celsius_exact: f64,
    /// `celsius_exact` rounded to whole °C
    pub rounded_c: i64,
    /// Exact Fahrenheit equivalent of `rounded_c`
    pub fahrenheit_exact: f64,
    /// Published value
    pub displayed_f: i64,
}

/// Intermediate values of the METAR chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetarSteps {
    /// Reading rounded to whole °C
    pub rounded_c: i64,
    /// Exact Fahrenheit equivalent of `rounded_c`
    pub fahrenheit_exact: f64,
    /// Published value
    pub displayed_f: i64,
}

/// Run the ASOS chain on a true Fahrenheit reading
///
/// Total over every f64: readings beyond `±ROUNDING_LIMIT` saturate at the
/// limit and NaN is treated as 0°F (see [`round_half_up`]).
pub fn simulate_asos(true_f: f64) -> AsosSteps {
    let rounded_f = round_half_up(true_f);
    let celsius = Ratio::integer(rounded_f).fahrenheit_to_celsius();
    let rounded_c = celsius.round_half_up();
    let fahrenheit = Ratio::integer(rounded_c).celsius_to_fahrenheit();
    AsosSteps {
        rounded_f,
        celsius_exact: celsius.to_f64(),
        rounded_c,
        fahrenheit_exact: fahrenheit.to_f64(),
        displayed_f: fahrenheit.round_half_up(),
    }
}

/// Run the METAR chain on a true Celsius reading
///
/// Saturates like [`simulate_asos`]; NaN is treated as 0°C.
pub fn simulate_metar(true_c: f64) -> MetarSteps {
    let rounded_c = round_half_up(true_c);
    let fahrenheit = Ratio::integer(rounded_c).celsius_to_fahrenheit();
    MetarSteps {
        rounded_c,
        fahrenheit_exact: fahrenheit.to_f64(),
        displayed_f: fahrenheit.round_half_up(),
    }
}
