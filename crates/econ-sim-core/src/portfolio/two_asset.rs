//! Two-asset mean-variance portfolio.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput, Rate};
use crate::EconSimResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub expected_return: Rate,
    pub volatility: Rate,
}

/// Expected return and volatility of a two-asset portfolio with `weight1`
/// in asset 1 and `1 − weight1` in asset 2.
///
/// `correlation` is not clamped. Values outside [-1, 1] give a volatility
/// no valid correlation could produce, or NaN when the variance goes
/// negative; callers clamp before calling.
pub fn two_asset_portfolio(
    weight1: f64,
    return1: Rate,
    vol1: Rate,
    return2: Rate,
    vol2: Rate,
    correlation: f64,
) -> PortfolioStats {
    let weight2 = 1.0 - weight1;
    let expected_return = weight1 * return1 + weight2 * return2;
    let variance = weight1 * weight1 * vol1 * vol1
        + weight2 * weight2 * vol2 * vol2
        + 2.0 * weight1 * weight2 * vol1 * vol2 * correlation;
    PortfolioStats {
        expected_return,
        volatility: variance.sqrt(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoAssetInput {
    pub weight1: f64,
    pub return1: Rate,
    pub vol1: Rate,
    pub return2: Rate,
    pub vol2: Rate,
    pub correlation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoAssetOutput {
    pub expected_return: Rate,
    pub volatility: Rate,
    /// Return per unit of volatility
    pub return_to_risk: f64,
    /// Weighted average volatility minus portfolio volatility
    pub diversification_benefit: Rate,
}

pub fn analyze_two_asset(input: &TwoAssetInput) -> EconSimResult<ComputationOutput<TwoAssetOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    require_finite("weight1", input.weight1)?;
    require_finite("return1", input.return1)?;
    require_finite("vol1", input.vol1)?;
    require_finite("return2", input.return2)?;
    require_finite("vol2", input.vol2)?;
    require_finite("correlation", input.correlation)?;
    if !(-1.0..=1.0).contains(&input.correlation) {
        warnings.push(format!(
            "Correlation {} is outside [-1, 1]; volatility is not meaningful",
            input.correlation
        ));
    }

    let stats = two_asset_portfolio(
        input.weight1,
        input.return1,
        input.vol1,
        input.return2,
        input.vol2,
        input.correlation,
    );
    warn_non_finite(&mut warnings, &[("volatility", stats.volatility)]);
    let weighted_vol = input.weight1 * input.vol1 + (1.0 - input.weight1) * input.vol2;

    let output = TwoAssetOutput {
        expected_return: stats.expected_return,
        volatility: stats.volatility,
        return_to_risk: stats.expected_return / stats.volatility,
        diversification_benefit: weighted_vol - stats.volatility,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-asset Markowitz mean-variance",
        input,
        warnings,
        elapsed,
        output,
    ))
}
