use serde::{Deserialize, Serialize};

/// Monetary amounts.
pub type Money = f64;

/// Rates expressed as decimals (0.05 = 5%) unless a field says otherwise.
pub type Rate = f64;

/// Year fractions or counts.
pub type Years = f64;

/// A single row of a cash-flow schedule.
///
/// `period` 0 is a time-zero flow; coupon and amortization schedules start
/// at 1. `present_value` is the discounted contribution of `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub period: u32,
    pub amount: Money,
    pub present_value: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

/// Push a warning (and log it) for every named value that is not finite.
pub(crate) fn warn_non_finite(warnings: &mut Vec<String>, values: &[(&str, f64)]) {
    for (name, value) in values {
        if !value.is_finite() {
            log::warn!("{name} is not finite ({value})");
            warnings.push(format!("{name} is not finite ({value}); check inputs"));
        }
    }
}
