//! Text helpers for presenting ranges

use super::units::TemperatureUnit;

/// One decimal place, with negative zero printed as `0.0`
fn one_decimal(value: f64) -> String {
    let text = format!("{value:.1}");
    if text == "-0.0" {
        "0.0".to_string()
    } else {
        text
    }
}

/// Format a half-open range as `"68.5 to 70.5"`
pub fn format_range(min: f64, max: f64) -> String {
    format!("{} to {}", one_decimal(min), one_decimal(max))
}

/// Format a half-open range with unit symbols, e.g. `"68.5°F to 70.5°F"`
pub fn format_range_with_unit(min: f64, max: f64, unit: TemperatureUnit) -> String {
    let symbol = unit.symbol();
    format!("{}{symbol} to {}{symbol}", one_decimal(min), one_decimal(max))
}

/// Signed half-width, e.g. `"±1.0"`
pub fn format_uncertainty(half_width: f64) -> String {
    format!("±{}", one_decimal(half_width))
}
