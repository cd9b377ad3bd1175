//! Inversion of a reporting chain
//!
//! Given a published whole-degree value, recover the half-open interval of
//! true readings that publish it.
//!
//! Every rounding step has the preimage `[n - 0.5, n + 0.5)` for an integer
//! output `n`, and conversions between roundings are exact. The only
//! ambiguity is therefore which whole-degree values the chain passed
//! through. The search enumerates those integers in a small window, keeps
//! every candidate that reproduces the display, and widens the survivors'
//! first-rounding buckets into the final interval.
//!
//! # Usage
//! ```
//! use temp_rounding_core::pipeline::Pipeline;
//! use temp_rounding_core::range_finder::find_range;
//!
//! let range = find_range(70, Pipeline::Asos).unwrap();
//! assert_eq!((range.min_true, range.max_true), (68.5, 70.5));
//! assert_eq!(range.intermediate_value(), Some(21));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, trace, warn};

use crate::config::DomainBounds;
use crate::core_types::exact::Ratio;
use crate::core_types::format::{format_range_with_unit, format_uncertainty};
use crate::core_types::units::{Celsius, Fahrenheit, TemperatureUnit};
use crate::error::{Result, RoundingError};
use crate::pipeline::Pipeline;

/// Candidate window half-width around the nearest whole-degree estimate
const SEARCH_WINDOW: i64 = 2;

/// Interval of true readings consistent with one displayed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyRange {
    /// Chain that was inverted
    pub pipeline: Pipeline,
    /// Inclusive lower bound, in `true_unit`
    pub min_true: f64,
    /// Exclusive upper bound, in `true_unit`
    pub max_true: f64,
    /// Unit of the true reading (the chain's input unit)
    pub true_unit: TemperatureUnit,
    /// Published whole-degree value
    pub displayed_value: i64,
    /// Unit of `displayed_value`
    pub displayed_unit: TemperatureUnit,
    /// Whole-degree Celsius values the chain can pass through on the way to
    /// the display (ASOS only)
    pub intermediate_values: Vec<i64>,
    /// Whole-degree results of the first rounding, ascending and contiguous
    pub input_values: Vec<i64>,
}

impl UncertaintyRange {
    /// The single intermediate value, when exactly one survived the search
    pub fn intermediate_value(&self) -> Option<i64> {
        match self.intermediate_values.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// More than one intermediate value reproduces the display
    pub fn is_ambiguous(&self) -> bool {
        self.intermediate_values.len() > 1
    }

    /// Interval length in `true_unit`
    pub fn width(&self) -> f64 {
        self.max_true - self.min_true
    }

    /// Half the interval length, in `true_unit`
    pub fn uncertainty(&self) -> f64 {
        self.width() / 2.0
    }

    /// Centre of the interval, in `true_unit`
    pub fn midpoint(&self) -> f64 {
        self.min_true + self.uncertainty()
    }

    /// Half-open membership test, in `true_unit`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_true && value < self.max_true
    }

    /// Bounds expressed in Fahrenheit for display
    pub fn fahrenheit_bounds(&self) -> (Fahrenheit, Fahrenheit) {
        match self.true_unit {
            TemperatureUnit::Fahrenheit => (self.min_true.into(), self.max_true.into()),
            TemperatureUnit::Celsius => (
                Celsius::from(self.min_true).to_fahrenheit(),
                Celsius::from(self.max_true).to_fahrenheit(),
            ),
        }
    }

    /// Interval length in Fahrenheit degrees
    pub fn width_fahrenheit(&self) -> f64 {
        let (lo, hi) = self.fahrenheit_bounds();
        *hi - *lo
    }
}

impl fmt::Display for UncertaintyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}: true {} ({})",
            self.pipeline,
            self.displayed_value,
            self.displayed_unit,
            format_range_with_unit(self.min_true, self.max_true, self.true_unit),
            format_uncertainty(self.uncertainty()),
        )?;
        if let Some(c) = self.intermediate_value() {
            write!(f, " via {c}°C")?;
        } else if self.is_ambiguous() {
            write!(f, " via one of {:?}°C", self.intermediate_values)?;
        }
        Ok(())
    }
}

/// Inverts reporting chains within a supported operating range
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeFinder {
    /// Supported operating range
    pub bounds: DomainBounds,
}

impl RangeFinder {
    /// Create a finder that rejects values outside `bounds`
    pub fn new(bounds: DomainBounds) -> Self {
        Self { bounds }
    }

    /// Interval of true readings that publish `displayed_f` through `pipeline`.
    ///
    /// The interval is in the chain's input unit: Fahrenheit for ASOS,
    /// Celsius for METAR.
    ///
    /// # Errors
    /// - [`RoundingError::OutOfRange`] if `displayed_f` is outside the bounds
    /// - [`RoundingError::Unreachable`] if the chain never publishes it
    /// - [`RoundingError::Inconsistent`] if the computed range fails verification
    pub fn find_range(&self, displayed_f: i64, pipeline: Pipeline) -> Result<UncertaintyRange> {
        self.bounds
            .check(displayed_f as f64, TemperatureUnit::Fahrenheit)?;

        // Celsius values whose exact Fahrenheit equivalent rounds to the display.
        // Keep all of them; more than one would be a double-boundary coincidence.
        let centre = Ratio::integer(displayed_f)
            .fahrenheit_to_celsius()
            .round_half_up();
        let intermediates: Vec<i64> = (centre - SEARCH_WINDOW..=centre + SEARCH_WINDOW)
            .filter(|&c| {
                let hit = Pipeline::display_for_celsius(c) == displayed_f;
                trace!(candidate_c = c, hit, "intermediate candidate");
                hit
            })
            .collect();

        if intermediates.is_empty() {
            debug!(displayed_f, %pipeline, "no whole-degree Celsius value publishes this display");
            return Err(RoundingError::Unreachable {
                displayed: displayed_f,
                pipeline,
            });
        }

        match pipeline {
            Pipeline::Asos => {
                let inputs = intermediates
                    .iter()
                    .flat_map(|&c| fahrenheit_feeding(c))
                    .collect();
                assemble(pipeline, displayed_f, intermediates, inputs)
            }
            // The Celsius candidates are the first-rounding values themselves
            Pipeline::Metar => assemble(pipeline, displayed_f, Vec::new(), intermediates),
        }
    }

    /// Interval of true readings whose chain passes through the whole-degree
    /// Celsius value `displayed_c`.
    ///
    /// For METAR this is the Celsius bucket itself; for ASOS it is the set of
    /// Fahrenheit readings whose rounded Celsius equivalent is `displayed_c`.
    ///
    /// # Errors
    /// - [`RoundingError::OutOfRange`] if `displayed_c` is outside the bounds
    /// - [`RoundingError::Inconsistent`] if the computed range fails verification
    pub fn find_range_from_celsius(
        &self,
        displayed_c: i64,
        pipeline: Pipeline,
    ) -> Result<UncertaintyRange> {
        self.bounds
            .check(displayed_c as f64, TemperatureUnit::Celsius)?;

        let displayed_f = Pipeline::display_for_celsius(displayed_c);
        match pipeline {
            Pipeline::Asos => assemble(
                pipeline,
                displayed_f,
                vec![displayed_c],
                fahrenheit_feeding(displayed_c),
            ),
            Pipeline::Metar => assemble(pipeline, displayed_f, Vec::new(), vec![displayed_c]),
        }
    }

    /// METAR-style Celsius-first entry point
    ///
    /// # Errors
    /// See [`RangeFinder::find_range_from_celsius`].
    pub fn find_celsius_range(&self, displayed_c: i64) -> Result<UncertaintyRange> {
        self.find_range_from_celsius(displayed_c, Pipeline::Metar)
    }
}

/// Whole-degree Fahrenheit values whose exact Celsius equivalent rounds to `rounded_c`
fn fahrenheit_feeding(rounded_c: i64) -> Vec<i64> {
    let centre = Ratio::integer(rounded_c)
        .celsius_to_fahrenheit()
        .round_half_up();
    (centre - SEARCH_WINDOW..=centre + SEARCH_WINDOW)
        .filter(|&f| Ratio::integer(f).fahrenheit_to_celsius().round_half_up() == rounded_c)
        .collect()
}

/// Build the range from the surviving first-rounding values and verify it
fn assemble(
    pipeline: Pipeline,
    displayed: i64,
    intermediates: Vec<i64>,
    mut inputs: Vec<i64>,
) -> Result<UncertaintyRange> {
    inputs.sort_unstable();
    inputs.dedup();

    let inconsistent = |detail: String| {
        error!(displayed, %pipeline, %detail, "range verification failed");
        RoundingError::Inconsistent {
            displayed,
            pipeline,
            detail,
        }
    };

    let (Some(&lo), Some(&hi)) = (inputs.first(), inputs.last()) else {
        return Err(inconsistent(format!(
            "no whole-degree input feeds intermediates {intermediates:?}"
        )));
    };
    if inputs.windows(2).any(|w| w[1] - w[0] != 1) {
        return Err(inconsistent(format!(
            "input values {inputs:?} are not contiguous"
        )));
    }
    if let Some(&bad) = inputs
        .iter()
        .find(|&&n| pipeline.display_for_rounded_input(n) != displayed)
    {
        return Err(inconsistent(format!(
            "input {bad} publishes {} instead",
            pipeline.display_for_rounded_input(bad)
        )));
    }
    for outside in [lo - 1, hi + 1] {
        if pipeline.display_for_rounded_input(outside) == displayed {
            return Err(inconsistent(format!(
                "input {outside} outside the range also publishes the display"
            )));
        }
    }

    if intermediates.len() > 1 {
        warn!(
            displayed,
            %pipeline,
            ?intermediates,
            "display reachable through more than one intermediate value"
        );
    }

    let range = UncertaintyRange {
        pipeline,
        min_true: lo as f64 - 0.5,
        max_true: hi as f64 + 0.5,
        true_unit: pipeline.input_unit(),
        displayed_value: displayed,
        displayed_unit: pipeline.displayed_unit(),
        intermediate_values: intermediates,
        input_values: inputs,
    };
    debug!(
        displayed,
        %pipeline,
        min_true = range.min_true,
        max_true = range.max_true,
        "found uncertainty range"
    );
    Ok(range)
}

/// [`RangeFinder::find_range`] with the default operating range
///
/// # Errors
/// See [`RangeFinder::find_range`].
pub fn find_range(displayed_f: i64, pipeline: Pipeline) -> Result<UncertaintyRange> {
    RangeFinder::default().find_range(displayed_f, pipeline)
}

/// [`RangeFinder::find_range_from_celsius`] with the default operating range
///
/// # Errors
/// See [`RangeFinder::find_range_from_celsius`].
pub fn find_range_from_celsius(displayed_c: i64, pipeline: Pipeline) -> Result<UncertaintyRange> {
    RangeFinder::default().find_range_from_celsius(displayed_c, pipeline)
}

/// [`RangeFinder::find_celsius_range`] with the default operating range
///
/// # Errors
/// See [`RangeFinder::find_range_from_celsius`].
pub fn find_celsius_range(displayed_c: i64) -> Result<UncertaintyRange> {
    RangeFinder::default().find_celsius_range(displayed_c)
}
