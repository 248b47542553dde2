use clap::Args;
use serde_json::Value;

use econ_sim_core::crypto::amm::{self, AmmTradeInput, ConstantProductPool, TradeDirection};
use econ_sim_core::crypto::emission::{self, EmissionInput};

use crate::input;

/// Arguments for a constant-product pool swap
#[derive(Args)]
pub struct AmmTradeArgs {
    /// Risk-asset reserve (x)
    #[arg(long)]
    pub risk_reserve: Option<f64>,

    /// Quote-asset reserve (y)
    #[arg(long)]
    pub quote_reserve: Option<f64>,

    /// Swap fee as a fraction (0.003 = 0.3%)
    #[arg(long, default_value = "0")]
    pub fee: f64,

    /// buy_risk or sell_risk
    #[arg(long, default_value = "buy_risk")]
    pub direction: TradeDirection,

    /// Amount paid into the pool
    #[arg(long)]
    pub amount: Option<f64>,

    /// Total token supply, for FDV
    #[arg(long)]
    pub total_supply: Option<f64>,

    /// Circulating supply, for market cap
    #[arg(long)]
    pub circulating_supply: Option<f64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a halving emission schedule
#[derive(Args)]
pub struct EmissionArgs {
    #[arg(long, default_value = "50")]
    pub initial_reward: f64,

    #[arg(long, default_value = "210000")]
    pub blocks_per_era: f64,

    #[arg(long, default_value = "33")]
    pub eras: u32,

    #[arg(long, default_value = "600")]
    pub seconds_per_block: f64,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amm_trade(args: AmmTradeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let trade_input: AmmTradeInput = input::load_or_build(args.input.as_deref(), || {
        let pool = ConstantProductPool::new(
            args.risk_reserve
                .ok_or("--risk-reserve is required (or provide --input)")?,
            args.quote_reserve
                .ok_or("--quote-reserve is required (or provide --input)")?,
        )
        .with_fee(args.fee);
        Ok(AmmTradeInput {
            pool,
            direction: args.direction,
            input_amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            total_supply: args.total_supply,
            circulating_supply: args.circulating_supply,
        })
    })?;

    let result = amm::analyze_amm_trade(&trade_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_emission(args: EmissionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let em_input: EmissionInput = input::load_or_build(args.input.as_deref(), || {
        Ok(EmissionInput {
            initial_reward: args.initial_reward,
            blocks_per_era: args.blocks_per_era,
            num_eras: args.eras,
            seconds_per_block: args.seconds_per_block,
        })
    })?;

    let result = emission::analyze_emission(&em_input)?;
    Ok(serde_json::to_value(result)?)
}
