use clap::Args;
use serde_json::Value;

use econ_sim_core::monetary::policy::{
    self, MonetaryPolicyInput, PolicyStance, DEFAULT_ALPHA, DEFAULT_BETA,
    DEFAULT_NEUTRAL_REAL_RATE,
};

use crate::input;

/// Arguments for the monetary policy simulator. Rates are in percent.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MonetaryPolicyArgs {
    /// Nominal policy rate (e.g. 11 for 11%)
    #[arg(long)]
    pub nominal_rate: Option<f64>,

    /// Observed headline inflation
    #[arg(long, alias = "inflation")]
    pub observed_inflation: Option<f64>,

    /// Expected inflation proxy (survey median)
    #[arg(long)]
    pub expected_inflation: Option<f64>,

    /// Central bank inflation target
    #[arg(long, alias = "target")]
    pub target_inflation: Option<f64>,

    /// Core inflation
    #[arg(long)]
    pub core_inflation: Option<f64>,

    /// Output gap
    #[arg(long)]
    pub output_gap: Option<f64>,

    /// Neutral real rate
    #[arg(long)]
    pub neutral_real_rate: Option<f64>,

    /// Weight on the core inflation gap
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Weight on the output gap
    #[arg(long)]
    pub beta: Option<f64>,

    /// Declared stance: expansive, neutral or restrictive
    #[arg(long)]
    pub stance: Option<PolicyStance>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_monetary_policy(args: MonetaryPolicyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let policy_input: MonetaryPolicyInput = input::load_or_build(args.input.as_deref(), || {
        Ok(MonetaryPolicyInput {
            nominal_rate: args
                .nominal_rate
                .ok_or("--nominal-rate is required (or provide --input)")?,
            observed_inflation: args
                .observed_inflation
                .ok_or("--observed-inflation is required (or provide --input)")?,
            expected_inflation: args
                .expected_inflation
                .ok_or("--expected-inflation is required (or provide --input)")?,
            target_inflation: args
                .target_inflation
                .ok_or("--target-inflation is required (or provide --input)")?,
            core_inflation: args
                .core_inflation
                .ok_or("--core-inflation is required (or provide --input)")?,
            output_gap: args.output_gap.unwrap_or(0.0),
            neutral_real_rate: args.neutral_real_rate.unwrap_or(DEFAULT_NEUTRAL_REAL_RATE),
            alpha: args.alpha.unwrap_or(DEFAULT_ALPHA),
            beta: args.beta.unwrap_or(DEFAULT_BETA),
            policy_stance: args.stance.unwrap_or_default(),
        })
    })?;

    let result = policy::analyze_monetary_policy(&policy_input)?;
    Ok(serde_json::to_value(result)?)
}
