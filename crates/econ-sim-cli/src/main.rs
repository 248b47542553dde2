mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::actuarial::{GompertzArgs, RuinArgs};
use commands::crypto::{AmmTradeArgs, EmissionArgs};
use commands::derivatives::{ForwardArgs, OptionArgs};
use commands::fixed_income::{BondArgs, ZeroCouponArgs};
use commands::monetary::MonetaryPolicyArgs;
use commands::portfolio::PortfolioArgs;
use commands::scenarios::{ScenarioDecodeArgs, ScenarioEncodeArgs};
use commands::time_value::{AmortizationArgs, BreakEvenArgs, CashFlowArgs};
use commands::valuation::WaccArgs;

/// Economics and finance simulators from the command line
#[derive(Parser)]
#[command(
    name = "esim",
    version,
    about = "Economics and finance simulators from the command line",
    long_about = "Run the calculation engine behind a set of teaching simulators: \
                  monetary policy and the Taylor rule, bonds and bills, time value \
                  of money, Black-Scholes options, AMM pools and token emission, \
                  Gompertz mortality and insurer ruin. Every command accepts flags, \
                  a JSON file via --input, or JSON on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Real rates, Taylor rule and a policy-stance narrative
    MonetaryPolicy(MonetaryPolicyArgs),
    /// Price an annual-coupon bond
    Bond(BondArgs),
    /// Price a zero-coupon bill under simple interest
    ZeroCoupon(ZeroCouponArgs),
    /// Weighted average cost of capital
    Wacc(WaccArgs),
    /// Forward price under the cost-of-carry model
    Forward(ForwardArgs),
    /// Two-asset portfolio return and volatility
    Portfolio(PortfolioArgs),
    /// NPV and IRR of a cash-flow series
    CashFlows(CashFlowArgs),
    /// Level-payment amortization schedule
    Amortization(AmortizationArgs),
    /// Break-even quantity
    BreakEven(BreakEvenArgs),
    /// Black-Scholes European option price and greeks
    #[command(name = "option")]
    OptionPrice(OptionArgs),
    /// Simulate a swap against a constant-product pool
    AmmTrade(AmmTradeArgs),
    /// Halving emission schedule
    Emission(EmissionArgs),
    /// Gompertz survival curve and life expectancy
    Gompertz(GompertzArgs),
    /// Monte Carlo insurer ruin probability
    Ruin(RuinArgs),
    /// Encode a scenario as a query string
    ScenarioEncode(ScenarioEncodeArgs),
    /// Decode and validate a scenario query string
    ScenarioDecode(ScenarioDecodeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::MonetaryPolicy(args) => commands::monetary::run_monetary_policy(args),
        Commands::Bond(args) => commands::fixed_income::run_bond(args),
        Commands::ZeroCoupon(args) => commands::fixed_income::run_zero_coupon(args),
        Commands::Wacc(args) => commands::valuation::run_wacc(args),
        Commands::Forward(args) => commands::derivatives::run_forward(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::CashFlows(args) => commands::time_value::run_cash_flows(args),
        Commands::Amortization(args) => commands::time_value::run_amortization(args),
        Commands::BreakEven(args) => commands::time_value::run_break_even(args),
        Commands::OptionPrice(args) => commands::derivatives::run_option(args),
        Commands::AmmTrade(args) => commands::crypto::run_amm_trade(args),
        Commands::Emission(args) => commands::crypto::run_emission(args),
        Commands::Gompertz(args) => commands::actuarial::run_gompertz(args),
        Commands::Ruin(args) => commands::actuarial::run_ruin(args),
        Commands::ScenarioEncode(args) => commands::scenarios::run_encode(args),
        Commands::ScenarioDecode(args) => commands::scenarios::run_decode(args),
        Commands::Version => {
            println!("esim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
