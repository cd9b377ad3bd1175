//! Core types and utilities

pub mod exact;
pub mod format;
pub mod units;

pub use exact::{round_half_up, Ratio, ROUNDING_LIMIT};
pub use format::{format_range, format_range_with_unit, format_uncertainty};
pub use units::*;
