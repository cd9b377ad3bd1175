//! Operating range and calculator state
//!
//! [`DomainBounds`] is the supported temperature range every public entry
//! point validates against. [`CalculatorConfig`] is the state of the
//! two-tab "what would it print" calculator as a plain value: the engine
//! reads it, never stores it.

use serde::{Deserialize, Serialize};

use crate::core_types::exact::round_half_up;
use crate::core_types::units::{Celsius, Fahrenheit, TemperatureUnit};
use crate::error::{Result, RoundingError};
use crate::pipeline::{Pipeline, PipelineTrace};
use crate::printed::{printed_distribution_around_with, PrintedDistribution};
use crate::range_finder::{RangeFinder, UncertaintyRange};

/// Supported operating range, stored in Fahrenheit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    /// Lowest supported temperature (°F)
    pub min_f: f64,
    /// Highest supported temperature (°F)
    pub max_f: f64,
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self {
            min_f: -50.0,
            max_f: 150.0,
        }
    }
}

impl DomainBounds {
    /// Create bounds from a Fahrenheit range
    pub fn new(min_f: f64, max_f: f64) -> Self {
        Self { min_f, max_f }
    }

    /// Bounds converted to Celsius
    pub fn celsius_bounds(&self) -> (Celsius, Celsius) {
        (
            Fahrenheit::from(self.min_f).to_celsius(),
            Fahrenheit::from(self.max_f).to_celsius(),
        )
    }

    /// Inclusive membership for a Fahrenheit value
    pub fn contains_f(&self, value: f64) -> bool {
        value >= self.min_f && value <= self.max_f
    }

    /// Inclusive membership for a Celsius value
    pub fn contains_c(&self, value: f64) -> bool {
        let (lo, hi) = self.celsius_bounds();
        value >= *lo && value <= *hi
    }

    /// Inclusive membership in either unit
    pub fn contains(&self, value: f64, unit: TemperatureUnit) -> bool {
        match unit {
            TemperatureUnit::Fahrenheit => self.contains_f(value),
            TemperatureUnit::Celsius => self.contains_c(value),
        }
    }

    /// Validate a value before it reaches the engine
    ///
    /// # Errors
    /// [`RoundingError::NonFinite`] for NaN or infinity,
    /// [`RoundingError::OutOfRange`] outside the bounds.
    pub fn check(&self, value: f64, unit: TemperatureUnit) -> Result<()> {
        if !value.is_finite() {
            return Err(RoundingError::NonFinite);
        }
        if self.contains(value, unit) {
            return Ok(());
        }
        let (min, max) = match unit {
            TemperatureUnit::Fahrenheit => (self.min_f, self.max_f),
            TemperatureUnit::Celsius => {
                let (lo, hi) = self.celsius_bounds();
                (*lo, *hi)
            }
        };
        Err(RoundingError::OutOfRange {
            value,
            unit,
            min,
            max,
        })
    }
}

/// What the calculator's entered value means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorMode {
    /// The value is a published whole degree; show the readings behind it
    #[default]
    FromDisplay,
    /// The value is a hypothetical true reading; show what it could print as
    FromReading,
}

/// State of the rounding calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Reporting chain
    pub pipeline: Pipeline,
    /// Meaning of `value`
    pub mode: CalculatorMode,
    /// Unit the value was entered in
    pub entry_unit: TemperatureUnit,
    /// Entered value
    pub value: f64,
    /// Stepper clicks applied on top of `value`
    pub stepper_offset: i32,
    /// Half-width of the hypothetical interval around a reading, in `entry_unit`
    pub tolerance: f64,
    /// Supported operating range
    pub bounds: DomainBounds,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::Asos,
            mode: CalculatorMode::FromDisplay,
            entry_unit: TemperatureUnit::Fahrenheit,
            value: 70.0,
            stepper_offset: 0,
            tolerance: 0.5,
            bounds: DomainBounds::default(),
        }
    }
}

/// Result of evaluating a [`CalculatorConfig`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorReport {
    /// Readings behind the display (display mode only)
    pub range: Option<UncertaintyRange>,
    /// What the interval could print as
    pub distribution: PrintedDistribution,
    /// Chain trace of the interval's centre, in the chain's input unit
    pub trace: PipelineTrace,
}

impl CalculatorConfig {
    /// Degrees moved per stepper click
    pub fn step_size(&self) -> f64 {
        match self.mode {
            CalculatorMode::FromDisplay => 1.0,
            CalculatorMode::FromReading => 0.1,
        }
    }

    /// Entered value with the stepper applied
    pub fn effective_value(&self) -> f64 {
        self.value + f64::from(self.stepper_offset) * self.step_size()
    }

    /// Run the engine on this state
    ///
    /// In display mode the value is rounded to a whole degree; a Fahrenheit
    /// entry is inverted with [`RangeFinder::find_range`] and a Celsius entry
    /// with [`RangeFinder::find_range_from_celsius`]. In reading mode the
    /// value is converted to the chain's input unit and the interval
    /// `value ± tolerance` is re-propagated.
    ///
    /// # Errors
    /// Any error from the underlying range or distribution calculation.
    pub fn evaluate(&self) -> Result<CalculatorReport> {
        let value = self.effective_value();
        self.bounds.check(value, self.entry_unit)?;

        match self.mode {
            CalculatorMode::FromDisplay => {
                let finder = RangeFinder::new(self.bounds);
                let whole = round_half_up(value);
                let range = match self.entry_unit {
                    TemperatureUnit::Fahrenheit => finder.find_range(whole, self.pipeline)?,
                    TemperatureUnit::Celsius => {
                        finder.find_range_from_celsius(whole, self.pipeline)?
                    }
                };
                let distribution = range.printed_distribution()?;
                let trace = self.pipeline.simulate(range.midpoint());
                Ok(CalculatorReport {
                    range: Some(range),
                    distribution,
                    trace,
                })
            }
            CalculatorMode::FromReading => {
                let input_unit = self.pipeline.input_unit();
                let reading = self.entry_unit.convert(value, input_unit);
                let tolerance = match (self.entry_unit, input_unit) {
                    (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => {
                        self.tolerance * 5.0 / 9.0
                    }
                    (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => {
                        self.tolerance * 9.0 / 5.0
                    }
                    _ => self.tolerance,
                };
                let distribution = printed_distribution_around_with(
                    &self.bounds,
                    reading,
                    tolerance,
                    self.pipeline,
                )?;
                Ok(CalculatorReport {
                    range: None,
                    distribution,
                    trace: self.pipeline.simulate(reading),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_bounds() {
        let bounds = DomainBounds::default();
        assert!(bounds.contains_f(-50.0));
        assert!(bounds.contains_f(150.0));
        assert!(!bounds.contains_f(150.1));
        let (lo, hi) = bounds.celsius_bounds();
        assert_relative_eq!(*lo, -45.555_555, epsilon = 1e-5);
        assert_relative_eq!(*hi, 65.555_555, epsilon = 1e-5);
        assert!(bounds.contains_c(65.0));
        assert!(!bounds.contains_c(66.0));
    }

    #[test]
    fn test_check_rejects_non_finite() {
        let bounds = DomainBounds::default();
        assert_eq!(
            bounds.check(f64::NAN, TemperatureUnit::Celsius),
            Err(RoundingError::NonFinite)
        );
        assert!(bounds.check(f64::INFINITY, TemperatureUnit::Fahrenheit).is_err());
    }

    #[test]
    fn test_stepper_offset() {
        let config = CalculatorConfig {
            stepper_offset: -3,
            ..CalculatorConfig::default()
        };
        assert_relative_eq!(config.effective_value(), 67.0);

        let reading = CalculatorConfig {
            mode: CalculatorMode::FromReading,
            value: 69.7,
            stepper_offset: 2,
            ..CalculatorConfig::default()
        };
        assert_relative_eq!(reading.effective_value(), 69.9, epsilon = 1e-9);
    }

    #[test]
    fn test_evaluate_display_mode() {
        let report = CalculatorConfig::default().evaluate().unwrap();
        let range = report.range.unwrap();
        assert_eq!((range.min_true, range.max_true), (68.5, 70.5));
        assert!(!report.distribution.is_split);
        assert_eq!(report.trace.displayed, 70);
    }

    #[test]
    fn test_evaluate_celsius_display_mode() {
        let config = CalculatorConfig {
            pipeline: Pipeline::Metar,
            entry_unit: TemperatureUnit::Celsius,
            value: 21.0,
            ..CalculatorConfig::default()
        };
        let report = config.evaluate().unwrap();
        assert_eq!(report.range.unwrap().displayed_value, 70);
    }

    #[test]
    fn test_evaluate_reading_mode_converts_units() {
        // 69.8°F ± 0.45°F stays inside the 21°C bucket for METAR
        let config = CalculatorConfig {
            pipeline: Pipeline::Metar,
            mode: CalculatorMode::FromReading,
            value: 69.8,
            tolerance: 0.45,
            ..CalculatorConfig::default()
        };
        let report = config.evaluate().unwrap();
        assert!(report.range.is_none());
        assert_eq!(report.distribution.outcomes.len(), 1);
        assert_eq!(report.distribution.outcomes[0].value, 70);
        assert_eq!(report.trace.displayed, 70);
    }

    #[test]
    fn test_evaluate_unreachable_display() {
        let config = CalculatorConfig {
            value: 71.0,
            ..CalculatorConfig::default()
        };
        assert!(matches!(
            config.evaluate(),
            Err(RoundingError::Unreachable { displayed: 71, .. })
        ));
    }

    #[test]
    fn test_partial_config_deserialises_with_defaults() {
        let config: CalculatorConfig =
            serde_json::from_str(r#"{ "pipeline": "metar", "value": 21.0 }"#).unwrap();
        assert_eq!(config.pipeline, Pipeline::Metar);
        assert_eq!(config.mode, CalculatorMode::FromDisplay);
        assert_eq!(config.stepper_offset, 0);
    }
}
