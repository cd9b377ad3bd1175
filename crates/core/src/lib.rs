//! Temperature Rounding Uncertainty Engine
//!
//! Official weather stations publish temperatures through a chain of unit
//! conversions and roundings. Each rounding is many-to-one, so a published
//! whole degree stands for a range of true readings, and an uncertain
//! reading can publish as more than one whole degree.
//!
//! ## Components
//!
//! - [`pipeline`]: the ASOS (F→C→F) and METAR (C→F) chains and their
//!   forward simulation
//! - [`range_finder`]: published value → interval of true readings
//! - [`printed`]: interval of true readings → distribution of published values
//! - [`table`]: every display in the operating range, inverted in parallel
//! - [`config`]: operating range and calculator state
//!
//! All operations are pure functions of their arguments and safe to call
//! from any thread.
//!
//! ```
//! use temp_rounding_core::{find_range, printed_distribution, Pipeline};
//!
//! let range = find_range(70, Pipeline::Asos).unwrap();
//! assert_eq!((range.min_true, range.max_true), (68.5, 70.5));
//!
//! let odds = printed_distribution(69.2, 70.8, Pipeline::Asos).unwrap();
//! assert!(odds.is_split);
//! ```

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod error;
pub mod pipeline;
pub mod printed;
pub mod range_finder;
pub mod table;

// Re-export core types
pub use core_types::{format_range, format_range_with_unit, Celsius, Fahrenheit, TemperatureUnit};

// Re-export engine entry points
pub use config::{CalculatorConfig, CalculatorMode, CalculatorReport, DomainBounds};
pub use error::RoundingError;
pub use pipeline::{simulate_asos, simulate_metar, AsosSteps, MetarSteps, Pipeline, PipelineTrace, Step};
pub use printed::{
    printed_distribution, printed_distribution_around, PrintedDistribution, PrintedOutcome,
};
pub use range_finder::{
    find_celsius_range, find_range, find_range_from_celsius, RangeFinder, UncertaintyRange,
};
pub use table::{RangeTable, RangeTableEntry};
