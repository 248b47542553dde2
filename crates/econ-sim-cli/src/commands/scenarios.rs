use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use econ_sim_core::scenarios::{BondScenario, MonetaryScenario, OptionScenario, QueryCodec};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScenarioKind {
    Monetary,
    Bond,
    Option,
}

/// Arguments for encoding a scenario JSON as a query string
#[derive(Args)]
pub struct ScenarioEncodeArgs {
    /// Which parameter set the JSON describes
    #[arg(long, value_enum)]
    pub kind: ScenarioKind,

    /// Path to JSON scenario (stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for decoding a query string
#[derive(Args)]
pub struct ScenarioDecodeArgs {
    #[arg(long, value_enum)]
    pub kind: ScenarioKind,

    /// Query string, with or without the leading '?'
    #[arg(long, allow_hyphen_values = true)]
    pub query: String,
}

fn encode<T>(path: Option<&str>) -> Result<String, Box<dyn std::error::Error>>
where
    T: QueryCodec + serde::de::DeserializeOwned,
{
    let scenario: T = input::load_or_build(path, || {
        Err("--input file or JSON on stdin is required".into())
    })?;
    Ok(scenario.encode_query())
}

pub fn run_encode(args: ScenarioEncodeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let path = args.input.as_deref();
    let query = match args.kind {
        ScenarioKind::Monetary => encode::<MonetaryScenario>(path)?,
        ScenarioKind::Bond => encode::<BondScenario>(path)?,
        ScenarioKind::Option => encode::<OptionScenario>(path)?,
    };
    Ok(json!({ "result": { "query": query } }))
}

pub fn run_decode(args: ScenarioDecodeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let decoded = match args.kind {
        ScenarioKind::Monetary => serde_json::to_value(MonetaryScenario::decode_query(&args.query))?,
        ScenarioKind::Bond => serde_json::to_value(BondScenario::decode_query(&args.query))?,
        ScenarioKind::Option => serde_json::to_value(OptionScenario::decode_query(&args.query))?,
    };
    Ok(json!({ "result": decoded }))
}
