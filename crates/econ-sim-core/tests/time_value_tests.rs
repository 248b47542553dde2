use econ_sim_core::time_value::{
    amortization_schedule, analyze_break_even, break_even_quantity, future_value,
    internal_rate_of_return, level_payment, npv, present_value, BreakEvenInput,
    AMORTIZATION_TOLERANCE,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Present / future value
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn pv_inverts_fv(
        principal in 0.01f64..1_000_000.0,
        rate in -0.9f64..1.0,
        periods in 0u32..60,
    ) {
        let n = f64::from(periods);
        let back = present_value(future_value(principal, rate, n), rate, n);
        prop_assert!((back - principal).abs() <= 1e-9 * principal.max(1.0));
    }

    #[test]
    fn amortization_ends_at_zero(
        principal in 1.0f64..1_000_000.0,
        rate in 0.0f64..0.05,
        periods in 1u32..480,
    ) {
        let rows = amortization_schedule(principal, rate, periods);
        prop_assert_eq!(rows.len(), periods as usize);
        let last = rows.last().unwrap();
        prop_assert!(last.remaining_balance.abs() <= AMORTIZATION_TOLERANCE);
        let repaid: f64 = rows.iter().map(|r| r.principal).sum();
        prop_assert!((repaid - principal).abs() <= AMORTIZATION_TOLERANCE);
    }

    #[test]
    fn final_row_follows_the_recurrence(
        principal in 1.0f64..1_000_000.0,
        rate in 0.0f64..0.01,
        periods in 1u32..360,
    ) {
        let payment = level_payment(principal, rate, periods);
        let rows = amortization_schedule(principal, rate, periods);
        let last = rows.last().unwrap();
        let expected = payment - last.interest;
        prop_assert!((last.principal - expected).abs() <= 1e-9 * principal.max(1.0));
    }

    #[test]
    fn level_payments_are_level(
        principal in 100.0f64..100_000.0,
        rate in 0.001f64..0.03,
        periods in 2u32..120,
    ) {
        let rows = amortization_schedule(principal, rate, periods);
        let first = rows[0].payment;
        for row in &rows {
            prop_assert!((row.payment - first).abs() <= 1e-6 * first);
        }
    }
}

#[test]
fn test_zero_periods_is_identity() {
    assert_eq!(future_value(1000.0, 0.07, 0.0), 1000.0);
    assert_eq!(present_value(1000.0, 0.07, 0.0), 1000.0);
}

// ---------------------------------------------------------------------------
// NPV / IRR
// ---------------------------------------------------------------------------

#[test]
fn test_npv_at_irr_is_zero() {
    let flows = [-1000.0, 300.0, 400.0, 500.0];
    let irr = internal_rate_of_return(&flows).unwrap();
    assert!(npv(irr, &flows).abs() < 1e-6);
}

#[test]
fn test_irr_not_found_for_same_sign_flows() {
    assert_eq!(internal_rate_of_return(&[100.0, 200.0, 300.0]), None);
    assert_eq!(internal_rate_of_return(&[-100.0, -200.0]), None);
    assert_eq!(internal_rate_of_return(&[]), None);
}

// ---------------------------------------------------------------------------
// Break-even
// ---------------------------------------------------------------------------

#[test]
fn test_break_even_without_margin_is_infinite() {
    let q = break_even_quantity(50_000.0, 40.0, 40.0);
    assert!(q.is_infinite() && q > 0.0);
    assert!(break_even_quantity(50_000.0, 30.0, 40.0).is_infinite());
}

#[test]
fn test_mortgage_final_principal_matches_level_payment() {
    let payment = level_payment(200_000.0, 0.005, 360);
    let rows = amortization_schedule(200_000.0, 0.005, 360);
    let last = rows.last().unwrap();
    assert!((last.principal - (payment - last.interest)).abs() < 1e-6);
    assert!((last.payment - payment).abs() < 1e-6);
}

#[test]
fn test_break_even_revenue_infinite_at_zero_price() {
    let input = BreakEvenInput {
        fixed_costs: 50_000.0,
        price: 0.0,
        variable_cost_per_unit: 0.0,
    };
    let out = analyze_break_even(&input).unwrap();
    assert!(out.result.quantity.is_infinite());
    assert_eq!(out.result.break_even_revenue, f64::INFINITY);
}

#[test]
fn test_break_even_units() {
    assert_eq!(break_even_quantity(50_000.0, 40.0, 15.0), 2000.0);
}
