use clap::Args;
use serde_json::Value;

use econ_sim_core::time_value::{self, AmortizationInput, BreakEvenInput, CashFlowInput};

use crate::input;

/// Arguments for NPV / IRR
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CashFlowArgs {
    /// Discount rate per period
    #[arg(long)]
    pub discount_rate: Option<f64>,

    /// Comma-separated flows, first at time zero (e.g. -1000,300,400,500)
    #[arg(long, value_delimiter = ',')]
    pub cash_flows: Vec<f64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a level-payment loan schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<f64>,

    /// Periodic interest rate (monthly loan: annual / 12)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Number of payments
    #[arg(long)]
    pub periods: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for break-even analysis
#[derive(Args)]
pub struct BreakEvenArgs {
    #[arg(long)]
    pub fixed_costs: Option<f64>,

    /// Unit selling price
    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub variable_cost: Option<f64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_cash_flows(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cf_input: CashFlowInput = input::load_or_build(args.input.as_deref(), || {
        Ok(CashFlowInput {
            discount_rate: args
                .discount_rate
                .ok_or("--discount-rate is required (or provide --input)")?,
            cash_flows: args.cash_flows,
        })
    })?;

    let result = time_value::analyze_cash_flows(&cf_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_amortization(args: AmortizationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let am_input: AmortizationInput = input::load_or_build(args.input.as_deref(), || {
        Ok(AmortizationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            periods: args.periods.ok_or("--periods is required (or provide --input)")?,
        })
    })?;

    let result = time_value::analyze_amortization(&am_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_break_even(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let be_input: BreakEvenInput = input::load_or_build(args.input.as_deref(), || {
        Ok(BreakEvenInput {
            fixed_costs: args
                .fixed_costs
                .ok_or("--fixed-costs is required (or provide --input)")?,
            price: args.price.ok_or("--price is required (or provide --input)")?,
            variable_cost_per_unit: args
                .variable_cost
                .ok_or("--variable-cost is required (or provide --input)")?,
        })
    })?;

    let result = time_value::analyze_break_even(&be_input)?;
    Ok(serde_json::to_value(result)?)
}
