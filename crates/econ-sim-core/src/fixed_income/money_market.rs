//! Zero-coupon money-market instruments (T-bill style) under simple
//! interest with a configurable day-count basis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput, Money, Rate};
use crate::{EconSimError, EconSimResult};

pub const DEFAULT_DAY_COUNT_BASIS: f64 = 360.0;

/// `face / (1 + yield · days / basis)`.
///
/// A non-positive basis is a domain violation and yields a non-finite or
/// meaningless price rather than an error.
pub fn zero_coupon_price(face_value: Money, yield_rate: Rate, days: f64, day_count_basis: f64) -> Money {
    face_value / (1.0 + yield_rate * days / day_count_basis)
}

/// Simple yield implied by a price; the inverse of [`zero_coupon_price`].
pub fn implied_yield(face_value: Money, price: Money, days: f64, day_count_basis: f64) -> Rate {
    (face_value / price - 1.0) * day_count_basis / days
}

/// Annualized bank discount rate: `(face − price) / face · basis / days`.
pub fn discount_rate(face_value: Money, price: Money, days: f64, day_count_basis: f64) -> Rate {
    (face_value - price) / face_value * day_count_basis / days
}

fn default_basis() -> f64 {
    DEFAULT_DAY_COUNT_BASIS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroCouponInput {
    pub face_value: Money,
    pub yield_rate: Rate,
    /// Days to maturity. Either this or both dates must be given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
    #[serde(default = "default_basis")]
    pub day_count_basis: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroCouponOutput {
    pub days: u32,
    pub price: Money,
    /// Face value minus price
    pub discount: Money,
    pub discount_rate: Rate,
    /// Yield recovered from the computed price
    pub implied_yield: Rate,
}

fn resolve_days(input: &ZeroCouponInput) -> EconSimResult<u32> {
    match (input.days, input.settlement_date, input.maturity_date) {
        (Some(days), _, _) => Ok(days),
        (None, Some(settle), Some(maturity)) => {
            let days = (maturity - settle).num_days();
            u32::try_from(days).map_err(|_| EconSimError::InvalidInput {
                field: "maturity_date".into(),
                reason: "maturity must not precede settlement".into(),
            })
        }
        _ => Err(EconSimError::InsufficientData(
            "Provide days or both settlement_date and maturity_date".into(),
        )),
    }
}

pub fn price_zero_coupon(input: &ZeroCouponInput) -> EconSimResult<ComputationOutput<ZeroCouponOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    require_finite("face_value", input.face_value)?;
    require_finite("yield_rate", input.yield_rate)?;
    require_finite("day_count_basis", input.day_count_basis)?;
    let days = resolve_days(input)?;
    if input.day_count_basis <= 0.0 {
        warnings.push("Day-count basis must be positive; results are not meaningful".into());
    }

    let d = f64::from(days);
    let price = zero_coupon_price(input.face_value, input.yield_rate, d, input.day_count_basis);
    let implied = implied_yield(input.face_value, price, d, input.day_count_basis);
    let disc_rate = discount_rate(input.face_value, price, d, input.day_count_basis);
    warn_non_finite(
        &mut warnings,
        &[("price", price), ("implied_yield", implied), ("discount_rate", disc_rate)],
    );

    let output = ZeroCouponOutput {
        days,
        price,
        discount: input.face_value - price,
        discount_rate: disc_rate,
        implied_yield: implied,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Simple-interest zero-coupon pricing",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cetes_round_trip() {
        let price = zero_coupon_price(10.0, 0.11, 91.0, DEFAULT_DAY_COUNT_BASIS);
        assert!(price < 10.0);
        let y = implied_yield(10.0, price, 91.0, DEFAULT_DAY_COUNT_BASIS);
        assert!((y - 0.11).abs() < 1e-6);
    }

    #[test]
    fn test_zero_days_is_face() {
        assert_eq!(zero_coupon_price(10.0, 0.11, 0.0, 360.0), 10.0);
    }

    #[test]
    fn test_zero_basis_is_non_finite_marker() {
        // yield·days/0 is infinite, so the price collapses to zero
        assert_eq!(zero_coupon_price(10.0, 0.11, 91.0, 0.0), 0.0);
    }

    #[test]
    fn test_dates_resolve_days() {
        let input = ZeroCouponInput {
            face_value: 10.0,
            yield_rate: 0.11,
            days: None,
            settlement_date: NaiveDate::from_ymd_opt(2024, 1, 4),
            maturity_date: NaiveDate::from_ymd_opt(2024, 4, 4),
            day_count_basis: 360.0,
        };
        let out = price_zero_coupon(&input).unwrap();
        assert_eq!(out.result.days, 91);
        assert!((out.result.implied_yield - 0.11).abs() < 1e-9);
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let input = ZeroCouponInput {
            face_value: 10.0,
            yield_rate: 0.11,
            days: None,
            settlement_date: NaiveDate::from_ymd_opt(2024, 4, 4),
            maturity_date: NaiveDate::from_ymd_opt(2024, 1, 4),
            day_count_basis: 360.0,
        };
        assert!(price_zero_coupon(&input).is_err());
    }

    #[test]
    fn test_missing_days_rejected() {
        let input = ZeroCouponInput {
            face_value: 10.0,
            yield_rate: 0.11,
            days: None,
            settlement_date: None,
            maturity_date: None,
            day_count_basis: 360.0,
        };
        assert!(price_zero_coupon(&input).is_err());
    }
}
