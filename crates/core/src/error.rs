//! Errors raised by the rounding engine

use crate::core_types::units::TemperatureUnit;
use crate::pipeline::Pipeline;

/// Errors that can occur when inverting or re-propagating a reporting chain
#[derive(Debug, Clone, PartialEq)]
pub enum RoundingError {
    /// Input lies outside the supported operating range
    OutOfRange {
        /// Offending value
        value: f64,
        /// Unit of `value`, `min` and `max`
        unit: TemperatureUnit,
        /// Lowest supported value
        min: f64,
        /// Highest supported value
        max: f64,
    },
    /// NaN or infinite input
    NonFinite,
    /// Interval whose lower bound exceeds its upper bound
    InvalidInterval {
        /// Lower bound as given
        min: f64,
        /// Upper bound as given
        max: f64,
    },
    /// The chain can never print this value (e.g. ASOS skips 71°F)
    Unreachable {
        /// Requested displayed value
        displayed: i64,
        /// Chain that was inverted
        pipeline: Pipeline,
    },
    /// A computed range failed its own round-trip verification
    Inconsistent {
        /// Requested displayed value
        displayed: i64,
        /// Chain that was inverted
        pipeline: Pipeline,
        /// What the verification found
        detail: String,
    },
}

impl std::fmt::Display for RoundingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingError::OutOfRange {
                value,
                unit,
                min,
                max,
            } => write!(
                f,
                "Out of range: {value}{unit} is outside the supported {min}{unit} to {max}{unit}"
            ),
            RoundingError::NonFinite => write!(f, "Temperature must be a finite number"),
            RoundingError::InvalidInterval { min, max } => {
                write!(f, "Invalid interval: lower bound {min} exceeds upper bound {max}")
            }
            RoundingError::Unreachable {
                displayed,
                pipeline,
            } => write!(f, "{pipeline} reports never display {displayed}°F"),
            RoundingError::Inconsistent {
                displayed,
                pipeline,
                detail,
            } => write!(
                f,
                "Internal consistency failure inverting {pipeline} display {displayed}°F: {detail}"
            ),
        }
    }
}

impl std::error::Error for RoundingError {}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, RoundingError>;
