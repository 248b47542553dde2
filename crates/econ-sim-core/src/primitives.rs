//! Rounding and division policy shared by every model.
//!
//! Models never trap domain violations. A zero or NaN denominator produces
//! `+Infinity`, `-Infinity` or `NaN` exactly as IEEE-754 division does, and
//! callers check [`is_displayable`] before showing a value.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest number of decimal places `Decimal` can hold.
const MAX_DECIMAL_PLACES: u32 = 28;

/// Round `value` half-away-from-zero to `decimal_places` places.
///
/// Rounding goes through `Decimal` so that values such as `1.005` round the
/// way they read rather than the way their binary approximation does. NaN
/// and infinite inputs come back unchanged. Magnitudes `Decimal` cannot
/// represent fall back to scaled `f64` arithmetic.
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let dp = decimal_places.min(MAX_DECIMAL_PLACES);

    // `from_f64` keeps the shortest decimal representation of the input,
    // which is what the user typed.
    if let Some(d) = Decimal::from_f64(value) {
        let rounded = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        if let Some(f) = rounded.to_f64() {
            return f;
        }
    }

    let factor = 10f64.powi(dp as i32);
    let scaled = value * factor;
    // Past 2^53 every f64 is already an integer at this scale.
    if !scaled.is_finite() || scaled.abs() >= 9_007_199_254_740_992.0 {
        return value;
    }
    scaled.round() / factor
}

/// `numerator / denominator` with IEEE-754 semantics for zero and NaN
/// denominators. Never panics.
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator.is_nan() || numerator.is_nan() {
        return f64::NAN;
    }
    if denominator == 0.0 {
        if numerator == 0.0 {
            return f64::NAN;
        }
        // Respect the sign of a negative zero denominator.
        let sign = numerator.signum() * if denominator.is_sign_negative() { -1.0 } else { 1.0 };
        return if sign > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }
    numerator / denominator
}

/// True when a value can be shown to a user as a number.
pub fn is_displayable(value: f64) -> bool {
    value.is_finite()
}

/// Convert a decimal fraction to a percentage (0.05 -> 5.0).
pub fn pct(fraction: f64) -> f64 {
    fraction * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.005, 2), 1.01);
        assert_eq!(round_to(-1.005, 2), -1.01);
        assert_eq!(round_to(3.14159, 2), 3.14);
    }

    #[test]
    fn test_round_non_finite_passthrough() {
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
        assert_eq!(round_to(f64::NEG_INFINITY, 2), f64::NEG_INFINITY);
    }

    #[test]
    fn test_round_huge_value_falls_back() {
        let big = 1.0e30;
        assert_eq!(round_to(big, 2), big);
    }

    #[test]
    fn test_safe_divide_ieee_policy() {
        assert_eq!(safe_divide(10.0, 4.0), 2.5);
        assert_eq!(safe_divide(1.0, 0.0), f64::INFINITY);
        assert_eq!(safe_divide(-1.0, 0.0), f64::NEG_INFINITY);
        assert_eq!(safe_divide(1.0, -0.0), f64::NEG_INFINITY);
        assert!(safe_divide(0.0, 0.0).is_nan());
        assert!(safe_divide(1.0, f64::NAN).is_nan());
    }

    #[test]
    fn test_is_displayable() {
        assert!(is_displayable(0.0));
        assert!(!is_displayable(f64::NAN));
        assert!(!is_displayable(f64::INFINITY));
    }
}
