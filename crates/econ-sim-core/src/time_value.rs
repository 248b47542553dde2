use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput, Money, Rate};
use crate::{EconSimError, EconSimResult};

const CONVERGENCE_THRESHOLD: f64 = 1e-10;
const MAX_IRR_ITERATIONS: u32 = 100;
const MAX_BISECTION_ITERATIONS: u32 = 200;
const IRR_LOWER_BOUND: f64 = -0.999_999;
const IRR_UPPER_LIMIT: f64 = 1.0e6;

/// Tolerance the amortization terminal balance is held to.
pub const AMORTIZATION_TOLERANCE: f64 = 1e-6;

/// Future value of a single sum: `principal · (1 + rate)^periods`.
///
/// `periods = 0` is the identity. Rates at or below -100% are outside the
/// domain and produce whatever IEEE arithmetic yields.
pub fn future_value(principal: Money, rate: Rate, periods: f64) -> Money {
    principal * (1.0 + rate).powf(periods)
}

/// Present value of a single sum; the inverse of [`future_value`].
pub fn present_value(future: Money, rate: Rate, periods: f64) -> Money {
    future / (1.0 + rate).powf(periods)
}

/// Net Present Value of a series of cash flows. The flow at index 0 is not
/// discounted.
pub fn npv(discount_rate: Rate, cash_flows: &[Money]) -> Money {
    let one_plus_r = 1.0 + discount_rate;
    let mut discount = 1.0;
    let mut result = 0.0;
    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        result += cf / discount;
    }
    result
}

fn npv_derivative(rate: Rate, cash_flows: &[Money]) -> f64 {
    let one_plus_r = 1.0 + rate;
    cash_flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cf)| -(t as f64) * cf / one_plus_r.powi(t as i32 + 1))
        .sum()
}

fn has_sign_change(cash_flows: &[Money]) -> bool {
    let has_pos = cash_flows.iter().any(|cf| *cf > 0.0);
    let has_neg = cash_flows.iter().any(|cf| *cf < 0.0);
    has_pos && has_neg
}

/// Internal Rate of Return.
///
/// Returns `None` when the flows never change sign or when neither Newton
/// iteration nor a bracketed bisection converges. Otherwise the rate is
/// accurate well beyond 4 decimal digits.
pub fn internal_rate_of_return(cash_flows: &[Money]) -> Option<Rate> {
    if cash_flows.len() < 2 || !has_sign_change(cash_flows) {
        return None;
    }
    if cash_flows.iter().any(|cf| !cf.is_finite()) {
        return None;
    }

    if let Some(rate) = irr_newton(cash_flows, 0.1) {
        return Some(rate);
    }
    log::debug!("IRR: Newton did not converge, falling back to bisection");
    irr_bisection(cash_flows)
}

fn irr_newton(cash_flows: &[Money], guess: Rate) -> Option<Rate> {
    let mut rate = guess;
    for i in 0..MAX_IRR_ITERATIONS {
        let value = npv(rate, cash_flows);
        if value.abs() < CONVERGENCE_THRESHOLD {
            log::debug!("IRR: Newton converged in {i} iterations");
            return Some(rate);
        }
        let slope = npv_derivative(rate, cash_flows);
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }
        let next = rate - value / slope;
        if !next.is_finite() || next <= IRR_LOWER_BOUND {
            return None;
        }
        if (next - rate).abs() < CONVERGENCE_THRESHOLD {
            return Some(next);
        }
        rate = next;
    }
    None
}

fn irr_bisection(cash_flows: &[Money]) -> Option<Rate> {
    let mut lo = IRR_LOWER_BOUND;
    let mut hi = 1.0;
    let f_lo = npv(lo, cash_flows);
    let mut f_hi = npv(hi, cash_flows);

    while f_lo.signum() == f_hi.signum() {
        hi *= 2.0;
        if hi > IRR_UPPER_LIMIT {
            return None;
        }
        f_hi = npv(hi, cash_flows);
    }

    let mut f_lo = f_lo;
    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = npv(mid, cash_flows);
        if f_mid.abs() < CONVERGENCE_THRESHOLD || (hi - lo) < CONVERGENCE_THRESHOLD {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// One row of a level-payment (French system) amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub remaining_balance: Money,
}

/// Level payment for `principal` over `periods` at a periodic `rate`.
pub fn level_payment(principal: Money, rate: Rate, periods: u32) -> Money {
    if periods == 0 {
        return 0.0;
    }
    if rate == 0.0 {
        return principal / periods as f64;
    }
    principal * rate / (1.0 - (1.0 + rate).powi(-(periods as i32)))
}

/// Level-payment amortization schedule.
///
/// Each row's interest is `balance · rate` and its principal portion is
/// `payment − interest`. The last row retires whatever balance remains so
/// the schedule always ends at exactly zero.
pub fn amortization_schedule(principal: Money, rate: Rate, periods: u32) -> Vec<AmortizationRow> {
    let payment = level_payment(principal, rate, periods);
    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = principal;

    for period in 1..=periods {
        let interest = balance * rate;
        let (row_payment, principal_part) = if period == periods {
            (balance + interest, balance)
        } else {
            (payment, payment - interest)
        };
        balance = if period == periods {
            0.0
        } else {
            balance - principal_part
        };
        rows.push(AmortizationRow {
            period,
            payment: row_payment,
            interest,
            principal: principal_part,
            remaining_balance: balance,
        });
    }
    rows
}

/// Units needed to cover fixed costs. `+Infinity` when the unit margin is
/// not positive: no finite break-even point exists.
pub fn break_even_quantity(fixed_costs: Money, price: Money, variable_cost_per_unit: Money) -> f64 {
    let margin = price - variable_cost_per_unit;
    if margin <= 0.0 {
        return f64::INFINITY;
    }
    fixed_costs / margin
}

// ---------------------------------------------------------------------------
// Analysis entry points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowInput {
    pub discount_rate: Rate,
    /// Flow at index 0 is at time zero.
    pub cash_flows: Vec<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowOutput {
    pub npv: Money,
    /// `None` when no rate sets NPV to zero.
    pub irr: Option<Rate>,
    pub profitable: bool,
}

pub fn analyze_cash_flows(input: &CashFlowInput) -> EconSimResult<ComputationOutput<CashFlowOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    require_finite("discount_rate", input.discount_rate)?;
    if input.cash_flows.is_empty() {
        return Err(EconSimError::InsufficientData(
            "At least one cash flow is required".into(),
        ));
    }
    for (i, cf) in input.cash_flows.iter().enumerate() {
        require_finite(&format!("cash_flows[{i}]"), *cf)?;
    }

    let value = npv(input.discount_rate, &input.cash_flows);
    let irr = internal_rate_of_return(&input.cash_flows);
    if irr.is_none() {
        warnings.push("No internal rate of return: flows never change sign or search did not converge".into());
    }
    warn_non_finite(&mut warnings, &[("npv", value)]);

    let output = CashFlowOutput {
        npv: value,
        irr,
        profitable: value > 0.0,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Discounted cash flow (NPV) with Newton/bisection IRR",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    /// Periodic (not annual) interest rate.
    pub rate: Rate,
    pub periods: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub payment: Money,
    pub total_interest: Money,
    pub schedule: Vec<AmortizationRow>,
}

pub fn analyze_amortization(
    input: &AmortizationInput,
) -> EconSimResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    require_finite("principal", input.principal)?;
    require_finite("rate", input.rate)?;
    if input.periods == 0 {
        warnings.push("Zero periods: schedule is empty".into());
    }

    let schedule = amortization_schedule(input.principal, input.rate, input.periods);
    let total_interest = schedule.iter().map(|r| r.interest).sum();
    let payment = level_payment(input.principal, input.rate, input.periods);
    warn_non_finite(&mut warnings, &[("payment", payment)]);

    let output = AmortizationOutput {
        payment,
        total_interest,
        schedule,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment (French system) amortization",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub fixed_costs: Money,
    pub price: Money,
    pub variable_cost_per_unit: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenOutput {
    /// `null` in JSON when no finite break-even exists.
    pub quantity: f64,
    pub unit_contribution_margin: Money,
    pub break_even_revenue: Money,
}

pub fn analyze_break_even(input: &BreakEvenInput) -> EconSimResult<ComputationOutput<BreakEvenOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    require_finite("fixed_costs", input.fixed_costs)?;
    require_finite("price", input.price)?;
    require_finite("variable_cost_per_unit", input.variable_cost_per_unit)?;

    let quantity = break_even_quantity(input.fixed_costs, input.price, input.variable_cost_per_unit);
    if quantity.is_infinite() {
        warnings.push("Price does not exceed variable cost: no finite break-even quantity".into());
    }
    let output = BreakEvenOutput {
        quantity,
        unit_contribution_margin: input.price - input.variable_cost_per_unit,
        break_even_revenue: if quantity.is_infinite() {
            f64::INFINITY
        } else {
            quantity * input.price
        },
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Contribution-margin break-even",
        input,
        warnings,
        elapsed,
        output,
    ))
}
