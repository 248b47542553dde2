//! Constant-product market maker (Uniswap v2 style, `x·y = k`) pricing,
//! slippage, impermanent loss and fully-diluted valuation.
//!
//! `x` is the risk-asset reserve and `y` the quote-asset reserve. Prices are
//! always quoted in units of the quote asset per unit of the risk asset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput, Money};
use crate::{EconSimError, EconSimResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    /// Pay quote asset, receive risk asset.
    BuyRisk,
    /// Pay risk asset, receive quote asset.
    SellRisk,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::BuyRisk => f.write_str("buy_risk"),
            TradeDirection::SellRisk => f.write_str("sell_risk"),
        }
    }
}

impl FromStr for TradeDirection {
    type Err = EconSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy_risk" | "buy" => Ok(TradeDirection::BuyRisk),
            "sell_risk" | "sell" => Ok(TradeDirection::SellRisk),
            other => Err(EconSimError::InvalidInput {
                field: "direction".into(),
                reason: format!("expected buy_risk or sell_risk, got '{other}'"),
            }),
        }
    }
}

/// Reserves of a two-asset constant-product pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantProductPool {
    pub risk_reserve: f64,
    pub quote_reserve: f64,
    /// Fraction of each input kept by the pool (0.003 = 0.3%).
    #[serde(default)]
    pub fee_rate: f64,
}

/// Outcome of a simulated swap against a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeResult {
    pub direction: TradeDirection,
    pub input_amount: f64,
    pub fee_paid: f64,
    pub output_received: f64,
    /// Quote per risk actually paid or received.
    pub effective_price: f64,
    pub spot_price_before: f64,
    pub spot_price_after: f64,
    pub slippage_pct: f64,
    pub new_risk_reserve: f64,
    pub new_quote_reserve: f64,
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// `y / x`.
pub fn spot_price(risk_reserve: f64, quote_reserve: f64) -> f64 {
    quote_reserve / risk_reserve
}

pub fn fully_diluted_valuation(total_supply: f64, spot: f64) -> Money {
    total_supply * spot
}

/// Loss of an LP position relative to holding, for a relative price change
/// `price_ratio`: `2·√r / (1 + r) − 1`. Always ≤ 0.
pub fn impermanent_loss(price_ratio: f64) -> f64 {
    2.0 * price_ratio.sqrt() / (1.0 + price_ratio) - 1.0
}

impl ConstantProductPool {
    pub fn new(risk_reserve: f64, quote_reserve: f64) -> Self {
        Self {
            risk_reserve,
            quote_reserve,
            fee_rate: 0.0,
        }
    }

    pub fn with_fee(mut self, fee_rate: f64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// `k = x·y`.
    pub fn invariant(&self) -> f64 {
        self.risk_reserve * self.quote_reserve
    }

    pub fn spot_price(&self) -> f64 {
        spot_price(self.risk_reserve, self.quote_reserve)
    }

    /// Swap `input_amount` into the pool.
    ///
    /// A trade with no output (zero input, or an input too small to move
    /// the reserves in f64) leaves the pool unchanged at the spot price
    /// instead of dividing by a zero output.
    pub fn simulate_trade(&self, direction: TradeDirection, input_amount: f64) -> TradeResult {
        let spot = self.spot_price();

        if input_amount == 0.0 {
            return self.unchanged(direction, input_amount);
        }

        let k = self.invariant();
        let fee_paid = input_amount * self.fee_rate;
        let net_input = input_amount - fee_paid;

        let (output_received, effective_price, new_risk, new_quote) = match direction {
            TradeDirection::BuyRisk => {
                let new_quote = self.quote_reserve + net_input;
                let new_risk = k / new_quote;
                let out = self.risk_reserve - new_risk;
                // Fees stay in the pool.
                (out, input_amount / out, new_risk, new_quote + fee_paid)
            }
            TradeDirection::SellRisk => {
                let new_risk = self.risk_reserve + net_input;
                let new_quote = k / new_risk;
                let out = self.quote_reserve - new_quote;
                (out, out / input_amount, new_risk + fee_paid, new_quote)
            }
        };

        if output_received <= 0.0 {
            return self.unchanged(direction, input_amount);
        }

        let slippage_pct = (effective_price - spot).abs() / spot * 100.0;

        TradeResult {
            direction,
            input_amount,
            fee_paid,
            output_received,
            effective_price,
            spot_price_before: spot,
            spot_price_after: spot_price(new_risk, new_quote),
            slippage_pct,
            new_risk_reserve: new_risk,
            new_quote_reserve: new_quote,
        }
    }

    fn unchanged(&self, direction: TradeDirection, input_amount: f64) -> TradeResult {
        let spot = self.spot_price();
        TradeResult {
            direction,
            input_amount,
            fee_paid: 0.0,
            output_received: 0.0,
            effective_price: spot,
            spot_price_before: spot,
            spot_price_after: spot,
            slippage_pct: 0.0,
            new_risk_reserve: self.risk_reserve,
            new_quote_reserve: self.quote_reserve,
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis entry point
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmTradeInput {
    pub pool: ConstantProductPool,
    pub direction: TradeDirection,
    pub input_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circulating_supply: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokenomics {
    pub spot_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_diluted_valuation: Option<Money>,
    /// Circulating / total supply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmTradeOutput {
    pub trade: TradeResult,
    pub invariant: f64,
    /// Relative price change caused by the trade, as IL for an LP.
    pub impermanent_loss: f64,
    pub tokenomics: Tokenomics,
}

pub fn analyze_amm_trade(input: &AmmTradeInput) -> EconSimResult<ComputationOutput<AmmTradeOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    require_finite("risk_reserve", input.pool.risk_reserve)?;
    require_finite("quote_reserve", input.pool.quote_reserve)?;
    require_finite("fee_rate", input.pool.fee_rate)?;
    require_finite("input_amount", input.input_amount)?;
    if input.pool.risk_reserve <= 0.0 || input.pool.quote_reserve <= 0.0 {
        return Err(EconSimError::InvalidInput {
            field: "pool".into(),
            reason: "reserves must be positive".into(),
        });
    }
    if input.input_amount < 0.0 {
        return Err(EconSimError::InvalidInput {
            field: "input_amount".into(),
            reason: "trade size cannot be negative".into(),
        });
    }
    if !(0.0..1.0).contains(&input.pool.fee_rate) {
        return Err(EconSimError::InvalidInput {
            field: "fee_rate".into(),
            reason: "must be in [0, 1)".into(),
        });
    }

    let trade = input.pool.simulate_trade(input.direction, input.input_amount);
    if input.input_amount > 0.0 && trade.output_received == 0.0 {
        warnings.push("Trade is too small to change the pool reserves; no output received".into());
    }
    if trade.slippage_pct > 5.0 {
        warnings.push(format!(
            "Slippage of {:.2}% is high relative to pool depth",
            trade.slippage_pct
        ));
    }
    warn_non_finite(&mut warnings, &[("effective_price", trade.effective_price)]);

    let spot = trade.spot_price_before;
    let fdv = input
        .total_supply
        .map(|supply| fully_diluted_valuation(supply, spot));
    let market_cap = input.circulating_supply.map(|supply| supply * spot);
    let float_ratio = match (input.circulating_supply, input.total_supply) {
        (Some(circ), Some(total)) if total > 0.0 => Some(circ / total),
        _ => None,
    };

    let output = AmmTradeOutput {
        invariant: input.pool.invariant(),
        impermanent_loss: impermanent_loss(trade.spot_price_after / spot),
        tokenomics: Tokenomics {
            spot_price: spot,
            market_cap,
            fully_diluted_valuation: fdv,
            float_ratio,
        },
        trade,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Constant-product AMM (x*y=k)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ConstantProductPool {
        ConstantProductPool::new(1_000.0, 2_000_000.0)
    }

    #[test]
    fn test_spot_price() {
        assert_eq!(pool().spot_price(), 2000.0);
    }

    #[test]
    fn test_zero_trade_is_exact_zero() {
        for direction in [TradeDirection::BuyRisk, TradeDirection::SellRisk] {
            let t = pool().simulate_trade(direction, 0.0);
            assert_eq!(t.output_received, 0.0);
            assert_eq!(t.slippage_pct, 0.0);
            assert_eq!(t.effective_price, 2000.0);
        }
    }

    #[test]
    fn test_dust_trade_leaves_pool_unchanged() {
        for direction in [TradeDirection::BuyRisk, TradeDirection::SellRisk] {
            let t = pool().simulate_trade(direction, 1e-12);
            assert_eq!(t.output_received, 0.0);
            assert_eq!(t.effective_price, 2000.0);
            assert_eq!(t.slippage_pct, 0.0);
            assert_eq!(t.new_risk_reserve, 1_000.0);
            assert_eq!(t.new_quote_reserve, 2_000_000.0);
        }
    }

    #[test]
    fn test_dust_trade_warns() {
        let input = AmmTradeInput {
            pool: pool(),
            direction: TradeDirection::BuyRisk,
            input_amount: 1e-12,
            total_supply: None,
            circulating_supply: None,
        };
        let out = analyze_amm_trade(&input).unwrap();
        assert!(out.result.trade.effective_price.is_finite());
        assert!(out.warnings.iter().any(|w| w.contains("too small")));
    }

    #[test]
    fn test_buy_preserves_invariant() {
        let p = pool();
        let t = p.simulate_trade(TradeDirection::BuyRisk, 100_000.0);
        // y' = 2.1M, x' = 2e9 / 2.1e6 = 952.38..., out = 47.619...
        assert!((t.output_received - 47.619_047_619).abs() < 1e-6);
        let k_after = t.new_risk_reserve * t.new_quote_reserve;
        assert!((k_after - p.invariant()).abs() / p.invariant() < 1e-12);
        assert!(t.effective_price > 2000.0);
        assert!(t.spot_price_after > t.spot_price_before);
        assert!((t.slippage_pct - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_sell_lowers_price() {
        let t = pool().simulate_trade(TradeDirection::SellRisk, 10.0);
        assert!(t.effective_price < 2000.0);
        assert!(t.spot_price_after < 2000.0);
        assert!(t.slippage_pct > 0.0);
    }

    #[test]
    fn test_slippage_grows_with_size() {
        let small = pool().simulate_trade(TradeDirection::BuyRisk, 1_000.0);
        let large = pool().simulate_trade(TradeDirection::BuyRisk, 500_000.0);
        assert!(large.slippage_pct > small.slippage_pct);
    }

    #[test]
    fn test_fee_reduces_output() {
        let no_fee = pool().simulate_trade(TradeDirection::BuyRisk, 10_000.0);
        let fee = pool().with_fee(0.003).simulate_trade(TradeDirection::BuyRisk, 10_000.0);
        assert!(fee.output_received < no_fee.output_received);
        assert!((fee.fee_paid - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_impermanent_loss() {
        assert_eq!(impermanent_loss(1.0), 0.0);
        // 4x price move: 2*2/5 - 1 = -0.2
        assert!((impermanent_loss(4.0) + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_fdv() {
        assert_eq!(fully_diluted_valuation(21_000_000.0, 2000.0), 42_000_000_000.0);
    }

    #[test]
    fn test_analyze_rejects_empty_pool() {
        let input = AmmTradeInput {
            pool: ConstantProductPool::new(0.0, 100.0),
            direction: TradeDirection::BuyRisk,
            input_amount: 1.0,
            total_supply: None,
            circulating_supply: None,
        };
        assert!(analyze_amm_trade(&input).is_err());
    }
}
