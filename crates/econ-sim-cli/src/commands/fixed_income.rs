use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use econ_sim_core::fixed_income::bonds::{self, BondInput};
use econ_sim_core::fixed_income::money_market::{self, ZeroCouponInput, DEFAULT_DAY_COUNT_BASIS};

use crate::input;

/// Arguments for annual-coupon bond pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BondArgs {
    /// Face (par) value
    #[arg(long, default_value = "1000")]
    pub face_value: f64,

    /// Annual coupon rate (e.g. 0.05 for 5%)
    #[arg(long)]
    pub coupon_rate: Option<f64>,

    /// Yield to maturity
    #[arg(long, alias = "ytm")]
    pub yield_rate: Option<f64>,

    /// Whole years to maturity
    #[arg(long)]
    pub years: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for zero-coupon bill pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ZeroCouponArgs {
    /// Face value
    #[arg(long, default_value = "10")]
    pub face_value: f64,

    /// Annual simple yield
    #[arg(long)]
    pub yield_rate: Option<f64>,

    /// Days to maturity
    #[arg(long)]
    pub days: Option<u32>,

    /// Settlement date (YYYY-MM-DD), used with --maturity-date
    #[arg(long)]
    pub settlement_date: Option<NaiveDate>,

    /// Maturity date (YYYY-MM-DD)
    #[arg(long)]
    pub maturity_date: Option<NaiveDate>,

    /// Day-count basis
    #[arg(long, default_value_t = DEFAULT_DAY_COUNT_BASIS)]
    pub basis: f64,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_bond(args: BondArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bond_input: BondInput = input::load_or_build(args.input.as_deref(), || {
        Ok(BondInput {
            face_value: args.face_value,
            coupon_rate: args
                .coupon_rate
                .ok_or("--coupon-rate is required (or provide --input)")?,
            yield_rate: args
                .yield_rate
                .ok_or("--yield-rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        })
    })?;

    let result = bonds::price_bond(&bond_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_zero_coupon(args: ZeroCouponArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let zc_input: ZeroCouponInput = input::load_or_build(args.input.as_deref(), || {
        Ok(ZeroCouponInput {
            face_value: args.face_value,
            yield_rate: args
                .yield_rate
                .ok_or("--yield-rate is required (or provide --input)")?,
            days: args.days,
            settlement_date: args.settlement_date,
            maturity_date: args.maturity_date,
            day_count_basis: args.basis,
        })
    })?;

    let result = money_market::price_zero_coupon(&zc_input)?;
    Ok(serde_json::to_value(result)?)
}
