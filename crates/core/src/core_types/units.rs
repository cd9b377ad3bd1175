//! Semantic unit types for temperatures
//!
//! Newtype wrappers keep Fahrenheit and Celsius readings from being mixed
//! by accident. Conversions between them are explicit methods.
//!
//! # Design Philosophy
//! - Temperatures are f64 so conversion of a reading does not lose precision
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//! - Serde support for serialization
//! - Exact (rational) conversions of whole-degree values live in
//!   [`crate::core_types::exact`], not here
//!
//! # Usage
//! ```
//! use temp_rounding_core::core_types::units::{Celsius, Fahrenheit};
//!
//! let temp = Celsius::new(21.0);
//! let f: Fahrenheit = temp.into();
//! assert!((*f - 69.8).abs() < 1e-9);
//!
//! let t1 = Fahrenheit::new(70.0);
//! let t2 = Fahrenheit::new(68.5);
//! assert_eq!(t1.min(t2), Fahrenheit::new(68.5));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Sub};
use std::str::FromStr;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Offset between the two scales at the freezing point of water
pub(crate) const FREEZING_F: f64 = 32.0;

/// Unit tag for a temperature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Degrees Fahrenheit
    Fahrenheit,
    /// Degrees Celsius
    Celsius,
}

impl TemperatureUnit {
    /// Degree symbol with unit letter, e.g. `°F`
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Celsius => "°C",
        }
    }

    /// Convert a raw value in this unit into `target`
    pub fn convert(self, value: f64, target: TemperatureUnit) -> f64 {
        match (self, target) {
            (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => {
                *Fahrenheit::from(value).to_celsius()
            }
            (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => {
                *Celsius::from(value).to_fahrenheit()
            }
            _ => value,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "°f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "c" | "°c" | "celsius" => Ok(TemperatureUnit::Celsius),
            other => Err(format!("unknown temperature unit '{other}'")),
        }
    }
}

// ============================================================================
// FAHRENHEIT
// ============================================================================

/// Temperature in degrees Fahrenheit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Fahrenheit(f64);

impl Eq for Fahrenheit {}

impl PartialOrd for Fahrenheit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fahrenheit {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Fahrenheit {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Fahrenheit {
    /// Absolute zero in Fahrenheit
    pub const ABSOLUTE_ZERO: Fahrenheit = Fahrenheit(-459.67);

    /// Water freezing point
    pub const FREEZING: Fahrenheit = Fahrenheit(FREEZING_F);

    /// Create a new Fahrenheit temperature. Asserts value >= absolute zero (-459.67°F).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -459.67,
            "Fahrenheit::new: value is below absolute zero (-459.67°F)"
        );
        Fahrenheit(value)
    }

    /// Convert to Celsius: `C = (F - 32) * 5/9`
    #[inline]
    #[must_use]
    pub fn to_celsius(self) -> Celsius {
        Celsius((self.0 - FREEZING_F) * 5.0 / 9.0)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Fahrenheit {
    fn from(v: f64) -> Self {
        Fahrenheit(v)
    }
}

impl From<Fahrenheit> for f64 {
    fn from(f: Fahrenheit) -> f64 {
        f.0
    }
}

impl From<Celsius> for Fahrenheit {
    fn from(c: Celsius) -> Fahrenheit {
        c.to_fahrenheit()
    }
}

// Fahrenheit + f64 = Fahrenheit (stepping a reading by whole or fractional degrees)
impl Add<f64> for Fahrenheit {
    type Output = Fahrenheit;
    fn add(self, rhs: f64) -> Fahrenheit {
        Fahrenheit(self.0 + rhs)
    }
}

impl Sub<f64> for Fahrenheit {
    type Output = Fahrenheit;
    fn sub(self, rhs: f64) -> Fahrenheit {
        Fahrenheit(self.0 - rhs)
    }
}

impl PartialEq<f64> for Fahrenheit {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<f64> for Fahrenheit {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Fahrenheit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°F", self.0)
    }
}

// ============================================================================
// CELSIUS
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Water freezing point
    pub const FREEZING: Celsius = Celsius(0.0);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -273.15,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Convert to Fahrenheit: `F = C * 9/5 + 32`
    #[inline]
    #[must_use]
    pub fn to_fahrenheit(self) -> Fahrenheit {
        Fahrenheit(self.0 * 9.0 / 5.0 + FREEZING_F)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Celsius {
    fn from(v: f64) -> Self {
        Celsius(v)
    }
}

impl From<Celsius> for f64 {
    fn from(c: Celsius) -> f64 {
        c.0
    }
}

impl From<Fahrenheit> for Celsius {
    fn from(f: Fahrenheit) -> Celsius {
        f.to_celsius()
    }
}

impl Add<f64> for Celsius {
    type Output = Celsius;
    fn add(self, rhs: f64) -> Celsius {
        Celsius(self.0 + rhs)
    }
}

impl Sub<f64> for Celsius {
    type Output = Celsius;
    fn sub(self, rhs: f64) -> Celsius {
        Celsius(self.0 - rhs)
    }
}

impl PartialEq<f64> for Celsius {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<f64> for Celsius {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_celsius_to_fahrenheit() {
        let f = Celsius(21.0).to_fahrenheit();
        assert_relative_eq!(*f, 69.8, epsilon = 1e-9);
    }

    #[test]
    fn test_fahrenheit_to_celsius() {
        let c = Fahrenheit(70.0).to_celsius();
        assert_relative_eq!(*c, 21.111_111, epsilon = 1e-5);
        assert_relative_eq!(*Fahrenheit::FREEZING.to_celsius(), 0.0);
    }

    #[test]
    fn test_unit_convert_is_identity_for_same_unit() {
        let v = TemperatureUnit::Celsius.convert(12.3, TemperatureUnit::Celsius);
        assert_eq!(v, 12.3);
        let v = TemperatureUnit::Celsius.convert(100.0, TemperatureUnit::Fahrenheit);
        assert_relative_eq!(v, 212.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("F".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Fahrenheit));
        assert_eq!("celsius".parse::<TemperatureUnit>(), Ok(TemperatureUnit::Celsius));
        assert!("kelvin".parse::<TemperatureUnit>().is_err());
    }

    #[test]
    fn test_total_ordering() {
        let mut temps = vec![Fahrenheit(70.5), Fahrenheit(-3.0), Fahrenheit(68.5)];
        temps.sort();
        assert_eq!(temps, vec![Fahrenheit(-3.0), Fahrenheit(68.5), Fahrenheit(70.5)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Fahrenheit(69.76).to_string(), "69.8°F");
        assert_eq!(Celsius(-0.04).to_string(), "-0.0°C");
    }

    #[test]
    #[should_panic(expected = "Celsius::new: value is below absolute zero")]
    fn test_celsius_new_panics_below_absolute_zero() {
        let _ = Celsius::new(-300.0);
    }
}
