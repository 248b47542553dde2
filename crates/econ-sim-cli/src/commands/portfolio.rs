use clap::Args;
use serde_json::Value;

use econ_sim_core::portfolio::two_asset::{self, TwoAssetInput};

use crate::input;

/// Arguments for a two-asset portfolio
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PortfolioArgs {
    /// Weight of the first asset; the second gets the remainder
    #[arg(long)]
    pub weight1: Option<f64>,

    #[arg(long)]
    pub return1: Option<f64>,

    #[arg(long)]
    pub vol1: Option<f64>,

    #[arg(long)]
    pub return2: Option<f64>,

    #[arg(long)]
    pub vol2: Option<f64>,

    /// Correlation between the two assets
    #[arg(long, default_value = "0")]
    pub correlation: f64,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pf_input: TwoAssetInput = input::load_or_build(args.input.as_deref(), || {
        Ok(TwoAssetInput {
            weight1: args.weight1.ok_or("--weight1 is required (or provide --input)")?,
            return1: args.return1.ok_or("--return1 is required (or provide --input)")?,
            vol1: args.vol1.ok_or("--vol1 is required (or provide --input)")?,
            return2: args.return2.ok_or("--return2 is required (or provide --input)")?,
            vol2: args.vol2.ok_or("--vol2 is required (or provide --input)")?,
            correlation: args.correlation,
        })
    })?;

    let result = two_asset::analyze_two_asset(&pf_input)?;
    Ok(serde_json::to_value(result)?)
}
