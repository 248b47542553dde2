//! Query keys of the shareable parameter sets.

use super::codec::{format_number, QueryCodec, QueryFields};
use crate::derivatives::options::{OptionInput, OptionType};
use crate::fixed_income::bonds::BondInput;
use crate::monetary::policy::{MonetaryPolicyInput, PolicyStance};
use crate::{EconSimError, EconSimResult};

pub type MonetaryScenario = MonetaryPolicyInput;
pub type BondScenario = BondInput;
pub type OptionScenario = OptionInput;

// ---------------------------------------------------------------------------
// Monetary policy
// ---------------------------------------------------------------------------

impl QueryCodec for MonetaryPolicyInput {
    const KEYS: &'static [&'static str] = &[
        "nom", "inf", "exi", "tgt", "cor", "gap", "rnr", "alp", "bet", "stn",
    ];

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("nom", format_number(self.nominal_rate)),
            ("inf", format_number(self.observed_inflation)),
            ("exi", format_number(self.expected_inflation)),
            ("tgt", format_number(self.target_inflation)),
            ("cor", format_number(self.core_inflation)),
            ("gap", format_number(self.output_gap)),
            ("rnr", format_number(self.neutral_real_rate)),
            ("alp", format_number(self.alpha)),
            ("bet", format_number(self.beta)),
            ("stn", self.policy_stance.as_str().to_string()),
        ]
    }

    fn from_fields(fields: &QueryFields) -> EconSimResult<Self> {
        Ok(MonetaryPolicyInput {
            nominal_rate: fields.number("nom")?,
            observed_inflation: fields.number("inf")?,
            expected_inflation: fields.number("exi")?,
            target_inflation: fields.number("tgt")?,
            core_inflation: fields.number("cor")?,
            output_gap: fields.number("gap")?,
            neutral_real_rate: fields.number("rnr")?,
            alpha: fields.number("alp")?,
            beta: fields.number("bet")?,
            policy_stance: fields.literal::<PolicyStance>("stn")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Bond
// ---------------------------------------------------------------------------

impl QueryCodec for BondInput {
    const KEYS: &'static [&'static str] = &["fac", "cpn", "yld", "yrs"];

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fac", format_number(self.face_value)),
            ("cpn", format_number(self.coupon_rate)),
            ("yld", format_number(self.yield_rate)),
            ("yrs", self.years.to_string()),
        ]
    }

    fn from_fields(fields: &QueryFields) -> EconSimResult<Self> {
        let input = BondInput {
            face_value: fields.number("fac")?,
            coupon_rate: fields.number("cpn")?,
            yield_rate: fields.number("yld")?,
            years: fields.whole_number("yrs")?,
        };
        if input.yield_rate <= -1.0 {
            return Err(EconSimError::InvalidScenario(
                "'yld' must be greater than -1".into(),
            ));
        }
        Ok(input)
    }
}

// ---------------------------------------------------------------------------
// Option
// ---------------------------------------------------------------------------

impl QueryCodec for OptionInput {
    const KEYS: &'static [&'static str] = &["spt", "stk", "ttm", "rfr", "vol", "typ"];

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("spt", format_number(self.spot)),
            ("stk", format_number(self.strike)),
            ("ttm", format_number(self.years_to_expiry)),
            ("rfr", format_number(self.risk_free_rate)),
            ("vol", format_number(self.volatility)),
            ("typ", self.option_type.as_str().to_string()),
        ]
    }

    fn from_fields(fields: &QueryFields) -> EconSimResult<Self> {
        let input = OptionInput {
            spot: fields.number("spt")?,
            strike: fields.number("stk")?,
            years_to_expiry: fields.number("ttm")?,
            risk_free_rate: fields.number("rfr")?,
            volatility: fields.number("vol")?,
            option_type: fields.literal::<OptionType>("typ")?,
        };
        for (key, value) in [("ttm", input.years_to_expiry), ("vol", input.volatility)] {
            if value < 0.0 {
                return Err(EconSimError::InvalidScenario(format!(
                    "'{key}' cannot be negative"
                )));
            }
        }
        Ok(input)
    }
}
