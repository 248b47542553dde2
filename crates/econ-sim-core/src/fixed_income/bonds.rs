//! Annual-coupon bond pricing from discounted cash flows.
//!
//! One coupon per whole year, face value repaid with the last coupon. The
//! quoted price is the sum of the schedule's present values, so the two can
//! never disagree.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, CashFlowEntry, ComputationOutput, Money, Rate};
use crate::EconSimResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Price and full cash-flow schedule of a bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPricing {
    pub price: Money,
    pub schedule: Vec<CashFlowEntry>,
}

/// Input parameters for bond pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondInput {
    /// Par / face value
    pub face_value: Money,
    /// Annual coupon rate as a decimal (0.10 = 10%)
    pub coupon_rate: Rate,
    /// Yield to maturity as a decimal
    pub yield_rate: Rate,
    /// Whole years to maturity
    pub years: u32,
}

/// Output of bond pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondOutput {
    pub price: Money,
    pub coupon_amount: Money,
    /// Annual coupon / price
    pub current_yield: Rate,
    pub macaulay_duration: f64,
    pub modified_duration: f64,
    /// "Premium", "Par" or "Discount"
    pub pricing: String,
    pub schedule: Vec<CashFlowEntry>,
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Price a bond as the sum of discounted annual coupons plus the discounted
/// face value. `years = 0` prices at face with an empty schedule.
pub fn bond_price(face_value: Money, coupon_rate: Rate, yield_rate: Rate, years: u32) -> BondPricing {
    if years == 0 {
        return BondPricing {
            price: face_value,
            schedule: Vec::new(),
        };
    }

    let coupon = face_value * coupon_rate;
    let one_plus_y = 1.0 + yield_rate;
    let mut discount = 1.0;

    let schedule: Vec<CashFlowEntry> = (1..=years)
        .map(|period| {
            discount *= one_plus_y;
            let amount = if period == years {
                coupon + face_value
            } else {
                coupon
            };
            CashFlowEntry {
                period,
                amount,
                present_value: amount / discount,
            }
        })
        .collect();

    let price = schedule.iter().map(|cf| cf.present_value).sum();
    BondPricing { price, schedule }
}

/// Macaulay duration in years: PV-weighted average time of the flows.
pub fn macaulay_duration(pricing: &BondPricing) -> f64 {
    if pricing.schedule.is_empty() {
        return 0.0;
    }
    let weighted: f64 = pricing
        .schedule
        .iter()
        .map(|cf| cf.period as f64 * cf.present_value)
        .sum();
    weighted / pricing.price
}

fn classify_pricing(price: Money, face_value: Money) -> String {
    let tolerance = 1e-9 * face_value.abs().max(1.0);
    if (price - face_value).abs() <= tolerance {
        "Par".to_string()
    } else if price > face_value {
        "Premium".to_string()
    } else {
        "Discount".to_string()
    }
}

/// Price a bond and report duration and yield measures.
pub fn price_bond(input: &BondInput) -> EconSimResult<ComputationOutput<BondOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_finite("face_value", input.face_value)?;
    require_finite("coupon_rate", input.coupon_rate)?;
    require_finite("yield_rate", input.yield_rate)?;
    if input.yield_rate <= -1.0 {
        warnings.push("Yield at or below -100%: discount factors are undefined".into());
    }

    let pricing = bond_price(input.face_value, input.coupon_rate, input.yield_rate, input.years);
    let coupon_amount = input.face_value * input.coupon_rate;
    let macaulay = macaulay_duration(&pricing);
    let modified = macaulay / (1.0 + input.yield_rate);
    let current_yield = coupon_amount / pricing.price;
    warn_non_finite(
        &mut warnings,
        &[("price", pricing.price), ("current_yield", current_yield)],
    );

    let output = BondOutput {
        price: pricing.price,
        coupon_amount,
        current_yield,
        macaulay_duration: macaulay,
        modified_duration: modified,
        pricing: classify_pricing(pricing.price, input.face_value),
        schedule: pricing.schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Discounted annual cash flows",
        input,
        warnings,
        elapsed,
        output,
    ))
}
