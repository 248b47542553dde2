use clap::{Args, ValueEnum};
use serde_json::Value;

use econ_sim_core::actuarial::gompertz::{self, GompertzInput, DEFAULT_MAX_AGE};
use econ_sim_core::actuarial::ruin::{
    self, ClaimCountModel, RuinInput, DEFAULT_HORIZON, DEFAULT_NUM_PATHS,
};

use crate::input;

/// Arguments for the Gompertz survival curve
#[derive(Args)]
pub struct GompertzArgs {
    /// Baseline mortality at age 0
    #[arg(long, default_value = "0.0001")]
    pub alpha: f64,

    /// Growth of mortality with age
    #[arg(long, default_value = "0.085")]
    pub beta: f64,

    #[arg(long, default_value_t = DEFAULT_MAX_AGE)]
    pub max_age: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CountModelArg {
    Poisson,
    Perturbed,
}

impl From<CountModelArg> for ClaimCountModel {
    fn from(arg: CountModelArg) -> Self {
        match arg {
            CountModelArg::Poisson => ClaimCountModel::Poisson,
            CountModelArg::Perturbed => ClaimCountModel::Perturbed,
        }
    }
}

/// Arguments for the insurer ruin simulation
#[derive(Args)]
pub struct RuinArgs {
    #[arg(long)]
    pub initial_capital: Option<f64>,

    /// Premium income per period
    #[arg(long)]
    pub premium: Option<f64>,

    /// Mean claims per period (lambda)
    #[arg(long)]
    pub claim_rate: Option<f64>,

    /// Mean claim size
    #[arg(long)]
    pub claim_size: Option<f64>,

    #[arg(long, default_value_t = DEFAULT_NUM_PATHS)]
    pub paths: u32,

    /// Periods per path
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub horizon: u32,

    #[arg(long, value_enum, default_value = "poisson")]
    pub count_model: CountModelArg,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_gompertz(args: GompertzArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let gz_input: GompertzInput = input::load_or_build(args.input.as_deref(), || {
        Ok(GompertzInput {
            alpha: args.alpha,
            beta: args.beta,
            max_age: args.max_age,
        })
    })?;

    let result = gompertz::analyze_gompertz(&gz_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_ruin(args: RuinArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ruin_input: RuinInput = input::load_or_build(args.input.as_deref(), || {
        Ok(RuinInput {
            initial_capital: args
                .initial_capital
                .ok_or("--initial-capital is required (or provide --input)")?,
            premium_rate: args.premium.ok_or("--premium is required (or provide --input)")?,
            claim_rate: args
                .claim_rate
                .ok_or("--claim-rate is required (or provide --input)")?,
            claim_size: args
                .claim_size
                .ok_or("--claim-size is required (or provide --input)")?,
            num_paths: args.paths,
            horizon: args.horizon,
            claim_count_model: args.count_model.into(),
            seed: args.seed,
        })
    })?;

    let result = ruin::analyze_ruin(&ruin_input)?;
    Ok(serde_json::to_value(result)?)
}
