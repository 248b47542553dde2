use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput, Money, Rate, Years};
use crate::EconSimResult;

/// Cost-of-carry forward price without income.
///
/// `S·e^(rT)` under continuous compounding, `S·(1 + r)^T` otherwise.
pub fn forward_price(spot: Money, rate: Rate, years: Years, continuous_compounding: bool) -> Money {
    if continuous_compounding {
        spot * (rate * years).exp()
    } else {
        spot * (1.0 + rate).powf(years)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardInput {
    pub spot: Money,
    pub rate: Rate,
    pub years: Years,
    #[serde(default)]
    pub continuous_compounding: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardOutput {
    pub forward_price: Money,
    /// Forward minus spot
    pub basis: Money,
}

pub fn price_forward(input: &ForwardInput) -> EconSimResult<ComputationOutput<ForwardOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    require_finite("spot", input.spot)?;
    require_finite("rate", input.rate)?;
    require_finite("years", input.years)?;

    let fwd = forward_price(input.spot, input.rate, input.years, input.continuous_compounding);
    warn_non_finite(&mut warnings, &[("forward_price", fwd)]);

    let output = ForwardOutput {
        forward_price: fwd,
        basis: fwd - input.spot,
    };
    let methodology = if input.continuous_compounding {
        "Cost of carry, continuous compounding"
    } else {
        "Cost of carry, annual compounding"
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_discrete() {
        let f = forward_price(100.0, 0.05, 2.0, false);
        assert!((f - 110.25).abs() < 1e-9);
    }

    #[test]
    fn test_forward_continuous() {
        let f = forward_price(100.0, 0.05, 1.0, true);
        assert!((f - 105.127_109_637_602_4).abs() < 1e-9);
    }

    #[test]
    fn test_forward_zero_years_is_spot() {
        assert_eq!(forward_price(42.0, 0.3, 0.0, true), 42.0);
        assert_eq!(forward_price(42.0, 0.3, 0.0, false), 42.0);
    }
}
