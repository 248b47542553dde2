use clap::Args;
use serde_json::Value;

use econ_sim_core::derivatives::forwards::{self, ForwardInput};
use econ_sim_core::derivatives::options::{self, OptionInput, OptionType};

use crate::input;

/// Arguments for forward pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ForwardArgs {
    #[arg(long)]
    pub spot: Option<f64>,

    /// Financing rate
    #[arg(long)]
    pub rate: Option<f64>,

    /// Years to delivery
    #[arg(long)]
    pub years: Option<f64>,

    /// Use continuous instead of annual compounding
    #[arg(long)]
    pub continuous: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for Black-Scholes option pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct OptionArgs {
    #[arg(long)]
    pub spot: Option<f64>,

    #[arg(long)]
    pub strike: Option<f64>,

    /// Years to expiry
    #[arg(long, alias = "expiry")]
    pub years_to_expiry: Option<f64>,

    /// Continuously compounded risk-free rate
    #[arg(long, default_value = "0")]
    pub risk_free_rate: f64,

    /// Annualized volatility (e.g. 0.2)
    #[arg(long, alias = "vol")]
    pub volatility: Option<f64>,

    /// call or put
    #[arg(long = "type", default_value = "call")]
    pub option_type: OptionType,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_forward(args: ForwardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fwd_input: ForwardInput = input::load_or_build(args.input.as_deref(), || {
        Ok(ForwardInput {
            spot: args.spot.ok_or("--spot is required (or provide --input)")?,
            rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            continuous_compounding: args.continuous,
        })
    })?;

    let result = forwards::price_forward(&fwd_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_option(args: OptionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let opt_input: OptionInput = input::load_or_build(args.input.as_deref(), || {
        Ok(OptionInput {
            spot: args.spot.ok_or("--spot is required (or provide --input)")?,
            strike: args.strike.ok_or("--strike is required (or provide --input)")?,
            years_to_expiry: args
                .years_to_expiry
                .ok_or("--years-to-expiry is required (or provide --input)")?,
            risk_free_rate: args.risk_free_rate,
            volatility: args
                .volatility
                .ok_or("--volatility is required (or provide --input)")?,
            option_type: args.option_type,
        })
    })?;

    let result = options::price_option(&opt_input)?;
    Ok(serde_json::to_value(result)?)
}
