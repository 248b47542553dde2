use clap::Args;
use serde_json::Value;

use econ_sim_core::valuation::wacc::{self, WaccInput};

use crate::input;

/// Arguments for WACC calculation
#[derive(Args)]
pub struct WaccArgs {
    /// Market value of equity
    #[arg(long, alias = "equity")]
    pub equity_value: Option<f64>,

    /// Market value of debt
    #[arg(long, alias = "debt")]
    pub debt_value: Option<f64>,

    /// Required return on equity (e.g. 0.12)
    #[arg(long)]
    pub cost_of_equity: Option<f64>,

    /// Pre-tax cost of debt
    #[arg(long)]
    pub cost_of_debt: Option<f64>,

    /// Marginal corporate tax rate
    #[arg(long)]
    pub tax_rate: Option<f64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_wacc(args: WaccArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let wacc_input: WaccInput = input::load_or_build(args.input.as_deref(), || {
        Ok(WaccInput {
            equity_value: args
                .equity_value
                .ok_or("--equity-value is required (or provide --input)")?,
            debt_value: args
                .debt_value
                .ok_or("--debt-value is required (or provide --input)")?,
            cost_of_equity: args
                .cost_of_equity
                .ok_or("--cost-of-equity is required (or provide --input)")?,
            cost_of_debt: args
                .cost_of_debt
                .ok_or("--cost-of-debt is required (or provide --input)")?,
            tax_rate: args
                .tax_rate
                .ok_or("--tax-rate is required (or provide --input)")?,
        })
    })?;

    let result = wacc::calculate_wacc(&wacc_input)?;
    Ok(serde_json::to_value(result)?)
}
