use econ_sim_core::derivatives::options::{european_option_price, price_option, OptionInput, OptionType};
use econ_sim_core::fixed_income::bonds::{bond_price, price_bond, BondInput};
use econ_sim_core::fixed_income::money_market::{implied_yield, zero_coupon_price, DEFAULT_DAY_COUNT_BASIS};
use econ_sim_core::monetary::policy::{analyze_monetary_policy, taylor_rate, MonetaryPolicyInput, PolicyStance};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Bonds and bills
// ---------------------------------------------------------------------------

#[test]
fn test_bond_at_own_coupon_yield_is_par() {
    let p = bond_price(100.0, 0.10, 0.10, 5);
    assert!((p.price - 100.0).abs() < 1e-9);
}

#[test]
fn test_bond_envelope_echoes_input() {
    let input = BondInput {
        face_value: 1000.0,
        coupon_rate: 0.06,
        yield_rate: 0.08,
        years: 10,
    };
    let out = price_bond(&input).unwrap();
    assert_eq!(out.result.pricing, "Discount");
    assert_eq!(out.assumptions["years"], 10);
    assert_eq!(out.metadata.precision, "ieee754_f64");
}

#[test]
fn test_nan_coupon_rejected_by_entry_point() {
    let input = BondInput {
        face_value: 1000.0,
        coupon_rate: f64::NAN,
        yield_rate: 0.08,
        years: 10,
    };
    assert!(price_bond(&input).is_err());
}

#[test]
fn test_zero_coupon_yield_recovered() {
    let price = zero_coupon_price(10.0, 0.11, 91.0, DEFAULT_DAY_COUNT_BASIS);
    let y = implied_yield(10.0, price, 91.0, DEFAULT_DAY_COUNT_BASIS);
    assert!((y - 0.11).abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[test]
fn test_longer_expiry_is_worth_more() {
    let long = european_option_price(100.0, 100.0, 1.0, 0.0, 0.2, OptionType::Call);
    let short = european_option_price(100.0, 100.0, 0.01, 0.0, 0.2, OptionType::Call);
    assert!(long > short);
    // ATM call with r = 0: 0.4·σ·√T·S is a close approximation
    assert!((long - 7.9656).abs() < 1e-3);
}

#[test]
fn test_degenerate_inputs_are_nan() {
    let at_expiry = european_option_price(100.0, 100.0, 0.0, 0.05, 0.2, OptionType::Call);
    let no_vol = european_option_price(100.0, 100.0, 1.0, 0.0, 0.0, OptionType::Put);
    assert!(at_expiry.is_nan());
    assert!(no_vol.is_nan());
}

#[test]
fn test_put_call_parity_residual_is_small() {
    let input = OptionInput {
        spot: 105.0,
        strike: 100.0,
        years_to_expiry: 0.5,
        risk_free_rate: 0.05,
        volatility: 0.25,
        option_type: OptionType::Put,
    };
    let out = price_option(&input).unwrap();
    assert!(out.result.parity_residual.abs() < 1e-5);
    assert_eq!(out.result.price, out.result.put_price);
}

// ---------------------------------------------------------------------------
// Monetary policy
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn taylor_reduces_to_neutral_plus_target(
        target in -5.0f64..20.0,
        neutral in -2.0f64..6.0,
        alpha in 0.0f64..2.0,
        beta in 0.0f64..2.0,
    ) {
        prop_assert_eq!(taylor_rate(target, target, 0.0, neutral, alpha, beta), neutral + target);
    }
}

#[test]
fn test_restrictive_scenario_narrative() {
    let input = MonetaryPolicyInput {
        nominal_rate: 11.0,
        observed_inflation: 4.5,
        expected_inflation: 3.8,
        target_inflation: 3.0,
        core_inflation: 4.2,
        output_gap: -0.5,
        neutral_real_rate: 2.0,
        alpha: 0.5,
        beta: 0.5,
        policy_stance: PolicyStance::Restrictive,
    };
    let out = analyze_monetary_policy(&input).unwrap();
    // 2 + 3 + 0.5·1.2 + 0.5·(−0.5) = 5.35
    assert_eq!(out.result.indicators.taylor_rate, 5.35);
    assert_eq!(out.result.indicators.real_rate_ex_post, 6.5);
    assert!(!out.result.narrative.is_empty());
}
