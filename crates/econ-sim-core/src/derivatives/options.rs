use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput, Money, Rate, Years};
use crate::{EconSimError, EconSimResult};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = EconSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(EconSimError::InvalidInput {
                field: "option_type".into(),
                reason: format!("expected call or put, got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionInput {
    pub spot: Money,
    pub strike: Money,
    pub years_to_expiry: Years,
    pub risk_free_rate: Rate,
    pub volatility: Rate,
    pub option_type: OptionType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionOutput {
    /// Price of the requested option type
    pub price: Money,
    pub call_price: Money,
    pub put_price: Money,
    pub intrinsic_value: Money,
    pub time_value: Money,
    pub d1: f64,
    pub d2: f64,
    pub delta: f64,
    pub gamma: f64,
    /// Price change per 1.00 change in volatility
    pub vega: f64,
    /// "ITM", "ATM" or "OTM"
    pub moneyness: String,
    /// `C − P − (S − K·e^(−rT))`; zero up to CDF approximation error
    pub parity_residual: f64,
}

// ---------------------------------------------------------------------------
// Normal distribution
// ---------------------------------------------------------------------------

/// Standard normal PDF: phi(x) = exp(-x^2/2) / sqrt(2*pi)
pub fn norm_pdf(x: f64) -> f64 {
    (-(x * x) / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Standard normal CDF using Abramowitz & Stegun 26.2.17.
/// Phi(x) = 1 - phi(x) * (b1*t + b2*t^2 + b3*t^3 + b4*t^4 + b5*t^5)
/// where t = 1 / (1 + 0.2316419 * |x|). Absolute error below 7.5e-8.
/// For x < 0: Phi(x) = 1 - Phi(-x)
pub fn norm_cdf(x: f64) -> f64 {
    let b1 = 0.319381530;
    let b2 = -0.356563782;
    let b3 = 1.781477937;
    let b4 = -1.821255978;
    let b5 = 1.330274429;
    let p = 0.2316419;

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + p * abs_x);
    let poly = t * (b1 + t * (b2 + t * (b3 + t * (b4 + t * b5))));
    let cdf_pos = 1.0 - norm_pdf(abs_x) * poly;

    if x < 0.0 {
        1.0 - cdf_pos
    } else {
        cdf_pos
    }
}

// ---------------------------------------------------------------------------
// Black-Scholes
// ---------------------------------------------------------------------------

/// `(d1, d2)`. `T = 0` or `σ = 0` divides by zero; the result is then
/// infinite or NaN and propagates into every price built from it.
pub fn d1_d2(spot: Money, strike: Money, years: Years, rate: Rate, volatility: Rate) -> (f64, f64) {
    let sigma_sqrt_t = volatility * years.sqrt();
    let d1 = ((spot / strike).ln() + (rate + volatility * volatility / 2.0) * years) / sigma_sqrt_t;
    (d1, d1 - sigma_sqrt_t)
}

/// European option price under Black–Scholes (no dividends).
///
/// Callers guard `years > 0` and `volatility > 0`; degenerate inputs are
/// not special-cased.
pub fn european_option_price(
    spot: Money,
    strike: Money,
    years: Years,
    rate: Rate,
    volatility: Rate,
    option_type: OptionType,
) -> Money {
    let (d1, d2) = d1_d2(spot, strike, years, rate, volatility);
    let discounted_strike = strike * (-rate * years).exp();
    match option_type {
        OptionType::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}

/// `Φ(d1)` for calls, `Φ(d1) − 1` for puts.
pub fn delta(
    spot: Money,
    strike: Money,
    years: Years,
    rate: Rate,
    volatility: Rate,
    option_type: OptionType,
) -> f64 {
    let (d1, _) = d1_d2(spot, strike, years, rate, volatility);
    match option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    }
}

pub fn gamma(spot: Money, strike: Money, years: Years, rate: Rate, volatility: Rate) -> f64 {
    let (d1, _) = d1_d2(spot, strike, years, rate, volatility);
    norm_pdf(d1) / (spot * volatility * years.sqrt())
}

pub fn vega(spot: Money, strike: Money, years: Years, rate: Rate, volatility: Rate) -> f64 {
    let (d1, _) = d1_d2(spot, strike, years, rate, volatility);
    spot * norm_pdf(d1) * years.sqrt()
}

fn intrinsic_value(spot: Money, strike: Money, option_type: OptionType) -> Money {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

fn classify_moneyness(spot: Money, strike: Money, option_type: OptionType) -> String {
    let ratio = spot / strike;
    if (ratio - 1.0).abs() < 0.02 {
        return "ATM".to_string();
    }
    let in_the_money = match option_type {
        OptionType::Call => spot > strike,
        OptionType::Put => spot < strike,
    };
    if in_the_money {
        "ITM".to_string()
    } else {
        "OTM".to_string()
    }
}

// ---------------------------------------------------------------------------
// Public API: price_option
// ---------------------------------------------------------------------------

pub fn price_option(input: &OptionInput) -> EconSimResult<ComputationOutput<OptionOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    require_finite("spot", input.spot)?;
    require_finite("strike", input.strike)?;
    require_finite("years_to_expiry", input.years_to_expiry)?;
    require_finite("risk_free_rate", input.risk_free_rate)?;
    require_finite("volatility", input.volatility)?;
    if input.years_to_expiry <= 0.0 || input.volatility <= 0.0 {
        warnings.push(
            "Black-Scholes needs positive time to expiry and volatility; results may be NaN or infinite"
                .into(),
        );
    }

    let s = input.spot;
    let k = input.strike;
    let t = input.years_to_expiry;
    let r = input.risk_free_rate;
    let sigma = input.volatility;

    let (d1, d2) = d1_d2(s, k, t, r, sigma);
    let call_price = european_option_price(s, k, t, r, sigma, OptionType::Call);
    let put_price = european_option_price(s, k, t, r, sigma, OptionType::Put);
    let price = match input.option_type {
        OptionType::Call => call_price,
        OptionType::Put => put_price,
    };
    let iv = intrinsic_value(s, k, input.option_type);
    let parity_residual = call_price - put_price - (s - k * (-r * t).exp());
    warn_non_finite(&mut warnings, &[("price", price), ("d1", d1)]);

    let output = OptionOutput {
        price,
        call_price,
        put_price,
        intrinsic_value: iv,
        time_value: price - iv,
        d1,
        d2,
        delta: delta(s, k, t, r, sigma, input.option_type),
        gamma: gamma(s, k, t, r, sigma),
        vega: vega(s, k, t, r, sigma),
        moneyness: classify_moneyness(s, k, input.option_type),
        parity_residual,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Black-Scholes (closed-form, A&S normal CDF)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_norm_cdf_basic() {
        assert!(approx_eq(norm_cdf(0.0), 0.5, 1e-7));
        assert!(approx_eq(norm_cdf(1.0), 0.841_344_746, 1e-7));
        assert!(approx_eq(norm_cdf(-1.96), 0.024_997_895, 1e-7));
        assert!(norm_cdf(8.0) > 0.999_999);
        assert!(norm_cdf(-8.0) < 1e-6);
    }

    #[test]
    fn test_call_atm_price() {
        // S=K=100, T=1, r=5%, vol=20%: 10.4506
        let price = european_option_price(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call);
        assert!(approx_eq(price, 10.4506, 1e-3), "ATM call {price}");
    }

    #[test]
    fn test_put_atm_price() {
        let price = european_option_price(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Put);
        assert!(approx_eq(price, 5.5735, 1e-3), "ATM put {price}");
    }

    #[test]
    fn test_put_call_parity() {
        let c = european_option_price(105.0, 95.0, 0.75, 0.03, 0.25, OptionType::Call);
        let p = european_option_price(105.0, 95.0, 0.75, 0.03, 0.25, OptionType::Put);
        let rhs = 105.0 - 95.0 * (-0.03f64 * 0.75).exp();
        assert!(approx_eq(c - p, rhs, 1e-5));
    }

    #[test]
    fn test_more_time_more_value() {
        let long = european_option_price(100.0, 100.0, 1.0, 0.0, 0.2, OptionType::Call);
        let short = european_option_price(100.0, 100.0, 0.01, 0.0, 0.2, OptionType::Call);
        assert!(long > short);
    }

    #[test]
    fn test_delta_ranges() {
        let dc = delta(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call);
        let dp = delta(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Put);
        assert!(dc > 0.0 && dc < 1.0);
        assert!(dp > -1.0 && dp < 0.0);
        assert!(approx_eq(dc - dp, 1.0, 1e-12));
    }

    #[test]
    fn test_degenerate_inputs_are_not_finite() {
        // T = 0 at the money: ln(1)/0 = 0/0
        let p = european_option_price(100.0, 100.0, 0.0, 0.05, 0.2, OptionType::Call);
        assert!(p.is_nan());
        // sigma = 0 at the money with r = 0
        let p = european_option_price(100.0, 100.0, 1.0, 0.0, 0.0, OptionType::Call);
        assert!(p.is_nan());
        // Off the money, d1 is infinite
        let (d1, _) = d1_d2(110.0, 100.0, 0.0, 0.05, 0.2);
        assert!(d1.is_infinite());
    }

    #[test]
    fn test_price_option_envelope() {
        let input = OptionInput {
            spot: 100.0,
            strike: 100.0,
            years_to_expiry: 1.0,
            risk_free_rate: 0.05,
            volatility: 0.2,
            option_type: OptionType::Put,
        };
        let out = price_option(&input).unwrap();
        assert_eq!(out.result.moneyness, "ATM");
        assert_eq!(out.result.price, out.result.put_price);
        assert!(out.result.parity_residual.abs() < 1e-5);
        assert!(out.result.gamma > 0.0);
        assert!(out.result.vega > 0.0);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_option_type_parse() {
        assert_eq!("put".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!("straddle".parse::<OptionType>().is_err());
    }
}
