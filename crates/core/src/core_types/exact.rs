//! Exact rational arithmetic for whole-degree conversions
//!
//! After the first rounding step every value in a reporting chain is a
//! rational number with a small denominator (9 after F→C, 5 after C→F).
//! Holding those as integer fractions keeps every `n + 0.5` decision exact,
//! where binary floating point would land a hair on either side.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::units::TemperatureUnit;

/// Largest whole-degree magnitude [`round_half_up`] produces (2^53)
///
/// Every integer up to here is exact in f64, and the F↔C conversions of
/// [`Ratio`] stay well inside `i64` for numerators of this size.
pub const ROUNDING_LIMIT: i64 = 1 << 53;

/// Round-half-up for a real value: `n + 0.5` rounds to `n + 1`.
///
/// Ties go toward positive infinity for negative values too, so `-0.5`
/// rounds to `0` and `-1.5` rounds to `-1`.
///
/// The result saturates at `±ROUNDING_LIMIT`, so `±∞` map to the limits.
/// NaN maps to `0`; callers that must reject it go through
/// [`DomainBounds::check`](crate::config::DomainBounds::check).
#[inline]
pub fn round_half_up(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    // `value + 0.5` is inexact just below 0.5; the fractional part is not
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    let limit = ROUNDING_LIMIT as f64;
    rounded.clamp(-limit, limit) as i64
}

/// Reduced fraction `num / den` with `den > 0`
///
/// Conversions multiply the numerator by at most 9 and the denominator by
/// 9, so values whose parts stay within [`ROUNDING_LIMIT`] never overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ratio {
    num: i64,
    den: i64,
}

const fn gcd(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Ratio {
    /// Build a reduced fraction. Panics on a zero denominator.
    #[must_use]
    #[track_caller]
    pub const fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "Ratio::new: zero denominator");
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num, den);
        if g > 1 {
            Ratio {
                num: num / g,
                den: den / g,
            }
        } else {
            Ratio { num, den }
        }
    }

    /// Whole number as a fraction
    #[must_use]
    pub const fn integer(n: i64) -> Self {
        Ratio { num: n, den: 1 }
    }

    /// Numerator of the reduced fraction
    pub const fn numer(self) -> i64 {
        self.num
    }

    /// Denominator of the reduced fraction (always positive)
    pub const fn denom(self) -> i64 {
        self.den
    }

    /// True when the fraction is a whole number
    pub const fn is_integer(self) -> bool {
        self.den == 1
    }

    /// Round-half-up computed without leaving integer arithmetic:
    /// `floor(num/den + 1/2) = floor((2·num + den) / (2·den))`
    pub const fn round_half_up(self) -> i64 {
        (2 * self.num + self.den).div_euclid(2 * self.den)
    }

    /// Nearest f64, for display only
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// `C = (F - 32) * 5/9` applied exactly
    #[must_use]
    pub const fn fahrenheit_to_celsius(self) -> Self {
        Ratio::new(5 * (self.num - 32 * self.den), 9 * self.den)
    }

    /// `F = C * 9/5 + 32` applied exactly
    #[must_use]
    pub const fn celsius_to_fahrenheit(self) -> Self {
        Ratio::new(9 * self.num + 160 * self.den, 5 * self.den)
    }

    /// Convert between temperature units exactly
    #[must_use]
    pub const fn convert(self, from: TemperatureUnit, to: TemperatureUnit) -> Self {
        match (from, to) {
            (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => self.fahrenheit_to_celsius(),
            (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => self.celsius_to_fahrenheit(),
            _ => self,
        }
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive so cross-multiplication preserves order
        (i128::from(self.num) * i128::from(other.den))
            .cmp(&(i128::from(other.num) * i128::from(self.den)))
    }
}

impl From<i64> for Ratio {
    fn from(n: i64) -> Self {
        Ratio::integer(n)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
