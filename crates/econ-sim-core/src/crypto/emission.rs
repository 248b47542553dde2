//! Halving emission schedules (Bitcoin style): the block reward halves at
//! the end of every era, so supply converges to a geometric-series cap.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput};
use crate::{EconSimError, EconSimResult};

pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

/// Beyond this the reward is zero in f64 for any finite initial reward.
pub const MAX_ERAS: u32 = 2048;

/// Share of the maximum supply used for the summary milestone.
const SUPPLY_MILESTONE: f64 = 0.99;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionEra {
    /// Zero-based era index
    pub era: u32,
    pub block_reward: f64,
    pub incremental_supply: f64,
    pub cumulative_supply: f64,
    /// Share of the theoretical maximum issued by the end of the era
    pub pct_of_max_supply: f64,
    /// Annualized issuance over cumulative supply, in percent
    pub annual_inflation_pct: f64,
    /// Cumulative supply over annualized issuance; infinite once issuance stops
    pub stock_to_flow: f64,
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Closed form of `Σ reward/2^i · blocks`: `2 · blocks · reward`.
pub fn max_supply(initial_reward: f64, blocks_per_era: f64) -> f64 {
    2.0 * blocks_per_era * initial_reward
}

/// Per-era issuance, cumulative supply, inflation and stock-to-flow.
///
/// Once the reward underflows to zero, inflation reports 0 and stock-to-flow
/// reports `+∞` instead of NaN.
pub fn emission_schedule(
    initial_reward: f64,
    blocks_per_era: f64,
    num_eras: u32,
    seconds_per_block: f64,
) -> Vec<EmissionEra> {
    let cap = max_supply(initial_reward, blocks_per_era);
    let seconds_per_era = blocks_per_era * seconds_per_block;
    let mut reward = initial_reward;
    let mut cumulative = 0.0;

    (0..num_eras)
        .map(|era| {
            let incremental = reward * blocks_per_era;
            cumulative += incremental;

            let annual_issuance = if incremental == 0.0 {
                0.0
            } else {
                incremental / seconds_per_era * SECONDS_PER_YEAR
            };
            let annual_inflation_pct = if annual_issuance == 0.0 {
                0.0
            } else {
                annual_issuance / cumulative * 100.0
            };
            let stock_to_flow = if annual_issuance == 0.0 {
                f64::INFINITY
            } else {
                cumulative / annual_issuance
            };

            let row = EmissionEra {
                era,
                block_reward: reward,
                incremental_supply: incremental,
                cumulative_supply: cumulative,
                pct_of_max_supply: cumulative / cap * 100.0,
                annual_inflation_pct,
                stock_to_flow,
            };
            reward /= 2.0;
            row
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Analysis entry point
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionInput {
    pub initial_reward: f64,
    pub blocks_per_era: f64,
    pub num_eras: u32,
    pub seconds_per_block: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionOutput {
    pub max_supply: f64,
    pub blocks_per_year: f64,
    pub years_per_era: f64,
    /// First era whose cumulative supply reaches 99% of the cap
    pub era_reaching_99pct: Option<u32>,
    pub final_cumulative_supply: f64,
    pub schedule: Vec<EmissionEra>,
}

pub fn analyze_emission(input: &EmissionInput) -> EconSimResult<ComputationOutput<EmissionOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    require_finite("initial_reward", input.initial_reward)?;
    require_finite("blocks_per_era", input.blocks_per_era)?;
    require_finite("seconds_per_block", input.seconds_per_block)?;
    if input.num_eras > MAX_ERAS {
        return Err(EconSimError::InvalidInput {
            field: "num_eras".into(),
            reason: format!("at most {MAX_ERAS} eras are supported"),
        });
    }
    if input.seconds_per_block <= 0.0 {
        warnings.push("Non-positive block time: inflation figures are not meaningful".into());
    }

    let schedule = emission_schedule(
        input.initial_reward,
        input.blocks_per_era,
        input.num_eras,
        input.seconds_per_block,
    );
    let cap = max_supply(input.initial_reward, input.blocks_per_era);
    let era_reaching_99pct = schedule
        .iter()
        .find(|row| row.cumulative_supply >= SUPPLY_MILESTONE * cap)
        .map(|row| row.era);
    let final_cumulative_supply = schedule.last().map_or(0.0, |row| row.cumulative_supply);

    let blocks_per_year = SECONDS_PER_YEAR / input.seconds_per_block;
    let years_per_era = input.blocks_per_era / blocks_per_year;
    warn_non_finite(
        &mut warnings,
        &[("max_supply", cap), ("blocks_per_year", blocks_per_year)],
    );
    log::debug!(
        "emission schedule: {} eras, final supply {final_cumulative_supply}",
        schedule.len()
    );

    let output = EmissionOutput {
        max_supply: cap,
        blocks_per_year,
        years_per_era,
        era_reaching_99pct,
        final_cumulative_supply,
        schedule,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Halving emission schedule (geometric series)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BTC_REWARD: f64 = 50.0;
    const BTC_BLOCKS: f64 = 210_000.0;
    const BTC_BLOCK_TIME: f64 = 600.0;

    #[test]
    fn test_bitcoin_cap() {
        assert_eq!(max_supply(BTC_REWARD, BTC_BLOCKS), 21_000_000.0);
    }

    #[test]
    fn test_first_eras() {
        let s = emission_schedule(BTC_REWARD, BTC_BLOCKS, 3, BTC_BLOCK_TIME);
        assert_eq!(s[0].block_reward, 50.0);
        assert_eq!(s[1].block_reward, 25.0);
        assert_eq!(s[0].cumulative_supply, 10_500_000.0);
        assert_eq!(s[1].cumulative_supply, 15_750_000.0);
        assert_eq!(s[0].pct_of_max_supply, 50.0);
    }

    #[test]
    fn test_first_era_inflation() {
        let s = emission_schedule(BTC_REWARD, BTC_BLOCKS, 1, BTC_BLOCK_TIME);
        // 52,560 blocks/year · 50 = 2,628,000 per year over 10.5M
        assert!((s[0].annual_inflation_pct - 25.028_571).abs() < 1e-5);
        assert!((s[0].stock_to_flow - 10_500_000.0 / 2_628_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_64_eras_stay_finite_and_capped() {
        let cap = max_supply(BTC_REWARD, BTC_BLOCKS);
        let s = emission_schedule(BTC_REWARD, BTC_BLOCKS, 64, BTC_BLOCK_TIME);
        assert_eq!(s.len(), 64);
        for row in &s {
            assert!(row.block_reward.is_finite());
            assert!(row.cumulative_supply.is_finite());
            assert!(row.annual_inflation_pct.is_finite());
            assert!(row.cumulative_supply <= cap);
        }
        for pair in s.windows(2) {
            assert!(pair[1].cumulative_supply >= pair[0].cumulative_supply);
        }
    }

    #[test]
    fn test_underflowed_reward_reports_zero_inflation() {
        let s = emission_schedule(BTC_REWARD, BTC_BLOCKS, 1200, BTC_BLOCK_TIME);
        let last = s.last().unwrap();
        assert_eq!(last.block_reward, 0.0);
        assert_eq!(last.annual_inflation_pct, 0.0);
        assert!(last.stock_to_flow.is_infinite());
    }

    #[test]
    fn test_analysis_milestone() {
        let input = EmissionInput {
            initial_reward: BTC_REWARD,
            blocks_per_era: BTC_BLOCKS,
            num_eras: 33,
            seconds_per_block: BTC_BLOCK_TIME,
        };
        let out = analyze_emission(&input).unwrap();
        // 1 - 2^-(i+1) >= 0.99 first holds at i = 6
        assert_eq!(out.result.era_reaching_99pct, Some(6));
        assert_eq!(out.result.blocks_per_year, 52_560.0);
    }

    #[test]
    fn test_too_many_eras_rejected() {
        let input = EmissionInput {
            initial_reward: BTC_REWARD,
            blocks_per_era: BTC_BLOCKS,
            num_eras: MAX_ERAS + 1,
            seconds_per_block: BTC_BLOCK_TIME,
        };
        assert!(analyze_emission(&input).is_err());
    }
}
