//! Monetary policy identities and a parameterized Taylor rule.
//!
//! Rates in this module are percentages (3.5 = 3.5%), matching how a policy
//! rate is quoted. Derived values are rounded to 2 decimal places before
//! they are reported or used by the narrative rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::require_finite;
use crate::primitives::round_to;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput};
use crate::{EconSimError, EconSimResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_NEUTRAL_REAL_RATE: f64 = 2.0;
pub const DEFAULT_ALPHA: f64 = 0.5;
pub const DEFAULT_BETA: f64 = 0.5;

/// Deviations from the Taylor rate inside this band (percentage points) are
/// not labelled as a stance.
pub const TAYLOR_DEAD_ZONE: f64 = 0.5;

const REPORT_DECIMALS: u32 = 2;

pub const NEUTRAL_PLACEHOLDER: &str =
    "Indicators are balanced: no significant gap or deviation from the Taylor rule was detected.";

// ---------------------------------------------------------------------------
// Policy stance
// ---------------------------------------------------------------------------

/// Declared stance of the central bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyStance {
    Expansive,
    #[default]
    Neutral,
    Restrictive,
}

impl PolicyStance {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStance::Expansive => "expansive",
            PolicyStance::Neutral => "neutral",
            PolicyStance::Restrictive => "restrictive",
        }
    }
}

impl fmt::Display for PolicyStance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStance {
    type Err = EconSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expansive" => Ok(PolicyStance::Expansive),
            "neutral" => Ok(PolicyStance::Neutral),
            "restrictive" => Ok(PolicyStance::Restrictive),
            other => Err(EconSimError::InvalidInput {
                field: "policy_stance".into(),
                reason: format!("expected expansive, neutral or restrictive, got '{other}'"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

pub fn real_rate_ex_post(nominal_rate: f64, observed_inflation: f64) -> f64 {
    nominal_rate - observed_inflation
}

pub fn real_rate_ex_ante(nominal_rate: f64, expected_inflation_proxy: f64) -> f64 {
    nominal_rate - expected_inflation_proxy
}

pub fn inflation_gap(observed_inflation: f64, target_inflation: f64) -> f64 {
    observed_inflation - target_inflation
}

/// Taylor rule: `r* + π* + α(π_core − π*) + β·gap`.
///
/// With `core_inflation == target_inflation` and a zero output gap this is
/// exactly `neutral_real_rate + target_inflation`.
pub fn taylor_rate(
    target_inflation: f64,
    core_inflation: f64,
    output_gap: f64,
    neutral_real_rate: f64,
    alpha: f64,
    beta: f64,
) -> f64 {
    neutral_real_rate
        + target_inflation
        + alpha * (core_inflation - target_inflation)
        + beta * output_gap
}

// ---------------------------------------------------------------------------
// Narrative
// ---------------------------------------------------------------------------

/// Derived values the narrative rules read. All fields are rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyIndicators {
    pub real_rate_ex_post: f64,
    pub real_rate_ex_ante: f64,
    pub inflation_gap: f64,
    pub core_inflation_gap: f64,
    pub taylor_rate: f64,
    /// Nominal rate minus the Taylor rate.
    pub taylor_deviation: f64,
}

/// Ordered diagnostic sentences for a set of indicators and a declared
/// stance. Falls back to [`NEUTRAL_PLACEHOLDER`] when no rule fires.
pub fn policy_stance_narrative(indicators: &PolicyIndicators, stance: PolicyStance) -> Vec<String> {
    let mut lines = Vec::new();

    let ex_post = indicators.real_rate_ex_post;
    if ex_post > 0.0 {
        lines.push(format!(
            "The ex-post real rate is positive ({ex_post:.2}%): money is earning more than observed inflation."
        ));
    } else if ex_post < 0.0 {
        lines.push(format!(
            "The ex-post real rate is negative ({ex_post:.2}%): observed inflation is eroding the nominal return."
        ));
    }

    let gap = indicators.inflation_gap;
    if gap > 0.0 {
        lines.push(format!(
            "Inflation is {gap:.2} percentage points above target."
        ));
    } else if gap < 0.0 {
        lines.push(format!(
            "Inflation is {:.2} percentage points below target.",
            gap.abs()
        ));
    }

    let core_gap = indicators.core_inflation_gap;
    if core_gap > 0.0 {
        lines.push(format!(
            "Core inflation exceeds the target by {core_gap:.2} points, signalling persistent price pressure."
        ));
    }

    let deviation = indicators.taylor_deviation;
    let relative = if deviation > TAYLOR_DEAD_ZONE {
        lines.push(format!(
            "The policy rate is {deviation:.2} points above the Taylor rate ({:.2}%): policy is more restrictive than Taylor.",
            indicators.taylor_rate
        ));
        Some(PolicyStance::Restrictive)
    } else if deviation < -TAYLOR_DEAD_ZONE {
        lines.push(format!(
            "The policy rate is {:.2} points below the Taylor rate ({:.2}%): policy is more expansive than Taylor.",
            deviation.abs(),
            indicators.taylor_rate
        ));
        Some(PolicyStance::Expansive)
    } else {
        None
    };

    if let Some(relative) = relative {
        if stance != PolicyStance::Neutral && stance != relative {
            lines.push(format!(
                "The declared {stance} stance contradicts the position relative to the Taylor rule."
            ));
        }
    }

    if lines.is_empty() {
        lines.push(NEUTRAL_PLACEHOLDER.to_string());
    }
    lines
}

// ---------------------------------------------------------------------------
// Analysis entry point
// ---------------------------------------------------------------------------

fn default_neutral_real_rate() -> f64 {
    DEFAULT_NEUTRAL_REAL_RATE
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_beta() -> f64 {
    DEFAULT_BETA
}

/// Parameters of the monetary policy simulator (percent units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryPolicyInput {
    /// Nominal policy rate.
    pub nominal_rate: f64,
    /// Observed (headline) inflation.
    pub observed_inflation: f64,
    /// Expected inflation proxy, e.g. a survey median.
    pub expected_inflation: f64,
    /// Central bank inflation target.
    pub target_inflation: f64,
    pub core_inflation: f64,
    pub output_gap: f64,
    #[serde(default = "default_neutral_real_rate")]
    pub neutral_real_rate: f64,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default)]
    pub policy_stance: PolicyStance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonetaryPolicyOutput {
    pub indicators: PolicyIndicators,
    pub policy_stance: PolicyStance,
    pub narrative: Vec<String>,
}

/// Compute the rounded indicators for an input.
pub fn compute_indicators(input: &MonetaryPolicyInput) -> PolicyIndicators {
    let taylor = taylor_rate(
        input.target_inflation,
        input.core_inflation,
        input.output_gap,
        input.neutral_real_rate,
        input.alpha,
        input.beta,
    );
    let taylor_rounded = round_to(taylor, REPORT_DECIMALS);
    PolicyIndicators {
        real_rate_ex_post: round_to(
            real_rate_ex_post(input.nominal_rate, input.observed_inflation),
            REPORT_DECIMALS,
        ),
        real_rate_ex_ante: round_to(
            real_rate_ex_ante(input.nominal_rate, input.expected_inflation),
            REPORT_DECIMALS,
        ),
        inflation_gap: round_to(
            inflation_gap(input.observed_inflation, input.target_inflation),
            REPORT_DECIMALS,
        ),
        core_inflation_gap: round_to(
            inflation_gap(input.core_inflation, input.target_inflation),
            REPORT_DECIMALS,
        ),
        taylor_rate: taylor_rounded,
        taylor_deviation: round_to(input.nominal_rate - taylor, REPORT_DECIMALS),
    }
}

fn validate_input(input: &MonetaryPolicyInput) -> EconSimResult<Vec<String>> {
    require_finite("nominal_rate", input.nominal_rate)?;
    require_finite("observed_inflation", input.observed_inflation)?;
    require_finite("expected_inflation", input.expected_inflation)?;
    require_finite("target_inflation", input.target_inflation)?;
    require_finite("core_inflation", input.core_inflation)?;
    require_finite("output_gap", input.output_gap)?;
    require_finite("neutral_real_rate", input.neutral_real_rate)?;
    require_finite("alpha", input.alpha)?;
    require_finite("beta", input.beta)?;

    let mut warnings = Vec::new();
    if input.nominal_rate < 0.0 || input.nominal_rate > 100.0 {
        warnings.push(format!(
            "Nominal rate {}% is outside the usual [0, 100] range.",
            input.nominal_rate
        ));
    }
    if input.alpha < 0.0 || input.beta < 0.0 {
        warnings.push("Negative Taylor weights invert the rule's response.".into());
    }
    Ok(warnings)
}

/// Run the monetary policy simulator: indicators plus narrative.
pub fn analyze_monetary_policy(
    input: &MonetaryPolicyInput,
) -> EconSimResult<ComputationOutput<MonetaryPolicyOutput>> {
    let start = Instant::now();
    let mut warnings = validate_input(input)?;

    let indicators = compute_indicators(input);
    warn_non_finite(&mut warnings, &[("taylor_rate", indicators.taylor_rate)]);
    let narrative = policy_stance_narrative(&indicators, input.policy_stance);
    log::debug!(
        "monetary policy: taylor={} deviation={} lines={}",
        indicators.taylor_rate,
        indicators.taylor_deviation,
        narrative.len()
    );

    let output = MonetaryPolicyOutput {
        indicators,
        policy_stance: input.policy_stance,
        narrative,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fisher real-rate identities and Taylor (1993) rule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> MonetaryPolicyInput {
        MonetaryPolicyInput {
            nominal_rate: 11.0,
            observed_inflation: 4.5,
            expected_inflation: 3.8,
            target_inflation: 3.0,
            core_inflation: 4.2,
            output_gap: -0.5,
            neutral_real_rate: DEFAULT_NEUTRAL_REAL_RATE,
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            policy_stance: PolicyStance::Restrictive,
        }
    }

    #[test]
    fn test_real_rates() {
        assert_eq!(real_rate_ex_post(11.0, 4.5), 6.5);
        assert_eq!(real_rate_ex_ante(11.0, 3.8), 7.2);
        assert_eq!(inflation_gap(4.5, 3.0), 1.5);
    }

    #[test]
    fn test_taylor_reduces_to_neutral_plus_target() {
        let rate = taylor_rate(3.0, 3.0, 0.0, 2.0, 0.5, 0.5);
        assert_eq!(rate, 5.0);
        let rate = taylor_rate(2.37, 2.37, 0.0, 1.13, 0.9, 0.1);
        assert_eq!(rate, 1.13 + 2.37);
    }

    #[test]
    fn test_taylor_weights() {
        // 2 + 3 + 0.5*1.2 + 0.5*(-0.5) = 5.35
        let rate = taylor_rate(3.0, 4.2, -0.5, 2.0, 0.5, 0.5);
        assert!((rate - 5.35).abs() < 1e-12);
    }

    #[test]
    fn test_indicators_rounded() {
        let ind = compute_indicators(&base_input());
        assert_eq!(ind.taylor_rate, 5.35);
        assert_eq!(ind.taylor_deviation, 5.65);
        assert_eq!(ind.core_inflation_gap, 1.2);
    }

    #[test]
    fn test_narrative_order_and_labels() {
        let ind = compute_indicators(&base_input());
        let lines = policy_stance_narrative(&ind, PolicyStance::Restrictive);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("ex-post real rate is positive"));
        assert!(lines[1].contains("above target"));
        assert!(lines[2].contains("Core inflation"));
        assert!(lines[3].contains("more restrictive than Taylor"));
    }

    #[test]
    fn test_narrative_dead_zone_placeholder() {
        let ind = PolicyIndicators {
            real_rate_ex_post: 0.0,
            real_rate_ex_ante: 0.0,
            inflation_gap: 0.0,
            core_inflation_gap: -0.3,
            taylor_rate: 5.0,
            taylor_deviation: 0.5,
        };
        let lines = policy_stance_narrative(&ind, PolicyStance::Neutral);
        assert_eq!(lines, vec![NEUTRAL_PLACEHOLDER.to_string()]);
    }

    #[test]
    fn test_narrative_expansive_deviation_and_contradiction() {
        let ind = PolicyIndicators {
            real_rate_ex_post: 0.0,
            real_rate_ex_ante: 0.0,
            inflation_gap: 0.0,
            core_inflation_gap: 0.0,
            taylor_rate: 6.0,
            taylor_deviation: -1.0,
        };
        let lines = policy_stance_narrative(&ind, PolicyStance::Restrictive);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("more expansive than Taylor"));
        assert!(lines[1].contains("contradicts"));
    }

    #[test]
    fn test_stance_parse() {
        assert_eq!("expansive".parse::<PolicyStance>().unwrap(), PolicyStance::Expansive);
        assert!("hawkish".parse::<PolicyStance>().is_err());
        assert_eq!(PolicyStance::Restrictive.to_string(), "restrictive");
    }

    #[test]
    fn test_analyze_rejects_non_finite() {
        let mut input = base_input();
        input.core_inflation = f64::NAN;
        assert!(analyze_monetary_policy(&input).is_err());
    }

    #[test]
    fn test_analyze_envelope() {
        let out = analyze_monetary_policy(&base_input()).unwrap();
        assert_eq!(out.metadata.precision, "ieee754_f64");
        assert_eq!(out.result.policy_stance, PolicyStance::Restrictive);
        assert!(!out.result.narrative.is_empty());
    }
}
