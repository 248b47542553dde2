//! Monte Carlo estimate of an insurer's probability of ruin.
//!
//! Each path starts solvent and, every period, collects the premium and pays
//! a random number of exponentially distributed claims. The first time
//! capital reaches zero the path is ruined for good and reports zero
//! capital for every later period.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Exp, Poisson};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput};
use crate::{EconSimError, EconSimResult};

pub const DEFAULT_NUM_PATHS: u32 = 20;
pub const DEFAULT_HORIZON: u32 = 50;

/// Largest accepted mean claim count per period. Each claim is drawn
/// individually, so λ bounds the work done per simulated period.
pub const MAX_CLAIM_RATE: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the number of claims in a period is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCountModel {
    /// Poisson arrivals with mean λ.
    #[default]
    Poisson,
    /// λ plus symmetric uniform noise with the same variance as the Poisson,
    /// rounded and clamped at zero.
    Perturbed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathState {
    Solvent(f64),
    Ruined,
}

impl PathState {
    pub fn capital(&self) -> f64 {
        match self {
            PathState::Solvent(capital) => *capital,
            PathState::Ruined => 0.0,
        }
    }

    /// One period of premium income and claims. `Ruined` is absorbing.
    pub fn step(self, premium: f64, losses: f64) -> PathState {
        match self {
            PathState::Solvent(capital) => {
                let next = capital + premium - losses;
                if next <= 0.0 {
                    PathState::Ruined
                } else {
                    PathState::Solvent(next)
                }
            }
            PathState::Ruined => PathState::Ruined,
        }
    }
}

fn default_num_paths() -> u32 {
    DEFAULT_NUM_PATHS
}

fn default_horizon() -> u32 {
    DEFAULT_HORIZON
}

/// Parameters of a ruin simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuinInput {
    pub initial_capital: f64,
    /// Premium collected per period
    pub premium_rate: f64,
    /// Mean number of claims per period (λ)
    pub claim_rate: f64,
    /// Mean size of a single claim
    pub claim_size: f64,
    #[serde(default = "default_num_paths")]
    pub num_paths: u32,
    /// Number of periods per path
    #[serde(default = "default_horizon")]
    pub horizon: u32,
    #[serde(default)]
    pub claim_count_model: ClaimCountModel,
    /// Fixed seed for reproducible runs; omitted means a fresh entropy seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuinPath {
    /// Capital at period 0 (initial) through `horizon`
    pub capital: Vec<f64>,
    pub ruined: bool,
    /// First period at which capital reached zero
    pub ruin_period: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuinOutput {
    pub ruin_probability: f64,
    pub ruined_paths: u32,
    pub num_paths: u32,
    pub safety_loading: f64,
    /// Mean terminal capital over paths that never ruined
    pub mean_surviving_capital: Option<f64>,
    /// Mean ruin period over ruined paths
    pub mean_time_to_ruin: Option<f64>,
    pub paths: Vec<RuinPath>,
}

// ---------------------------------------------------------------------------
// Claim process
// ---------------------------------------------------------------------------

/// `θ = premium / (λ · claim_size) − 1`.
pub fn safety_loading(premium_rate: f64, claim_rate: f64, claim_size: f64) -> f64 {
    premium_rate / (claim_rate * claim_size) - 1.0
}

enum CountSampler {
    Zero,
    Poisson(Poisson),
    Perturbed { mean: f64, noise: Uniform<f64> },
}

/// Claim count and severity distributions for one parameter set.
pub struct ClaimProcess {
    counts: CountSampler,
    severity: Option<Exp>,
}

impl ClaimProcess {
    pub fn new(claim_rate: f64, claim_size: f64, model: ClaimCountModel) -> EconSimResult<Self> {
        if !(claim_rate >= 0.0 && claim_rate.is_finite()) {
            return Err(EconSimError::InvalidInput {
                field: "claim_rate".into(),
                reason: "must be a non-negative finite number".into(),
            });
        }
        if claim_rate > MAX_CLAIM_RATE {
            return Err(EconSimError::InvalidInput {
                field: "claim_rate".into(),
                reason: format!("at most {MAX_CLAIM_RATE} claims per period are simulated"),
            });
        }
        if !(claim_size >= 0.0 && claim_size.is_finite()) {
            return Err(EconSimError::InvalidInput {
                field: "claim_size".into(),
                reason: "must be a non-negative finite number".into(),
            });
        }

        let counts = if claim_rate == 0.0 {
            CountSampler::Zero
        } else {
            match model {
                ClaimCountModel::Poisson => {
                    let poisson = Poisson::new(claim_rate).map_err(|e| EconSimError::InvalidInput {
                        field: "claim_rate".into(),
                        reason: e.to_string(),
                    })?;
                    CountSampler::Poisson(poisson)
                }
                ClaimCountModel::Perturbed => {
                    let amplitude = (3.0 * claim_rate).sqrt();
                    if !amplitude.is_finite() {
                        return Err(EconSimError::InvalidInput {
                            field: "claim_rate".into(),
                            reason: "perturbation amplitude is not finite".into(),
                        });
                    }
                    CountSampler::Perturbed {
                        mean: claim_rate,
                        noise: Uniform::new_inclusive(-amplitude, amplitude),
                    }
                }
            }
        };

        let severity = if claim_size == 0.0 {
            None
        } else {
            Some(Exp::new(1.0 / claim_size).map_err(|e| EconSimError::InvalidInput {
                field: "claim_size".into(),
                reason: e.to_string(),
            })?)
        };

        Ok(Self { counts, severity })
    }

    pub fn claim_count<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match &self.counts {
            CountSampler::Zero => 0,
            CountSampler::Poisson(poisson) => {
                let draw: f64 = poisson.sample(rng);
                draw as u64
            }
            CountSampler::Perturbed { mean, noise } => {
                (mean + noise.sample(rng)).round().max(0.0) as u64
            }
        }
    }

    /// Total losses of one period.
    pub fn period_losses<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let count = self.claim_count(rng);
        match &self.severity {
            Some(exp) => (0..count).map(|_| -> f64 { exp.sample(rng) }).sum(),
            None => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

pub fn simulate_path<R: Rng + ?Sized>(
    process: &ClaimProcess,
    initial_capital: f64,
    premium_rate: f64,
    horizon: u32,
    rng: &mut R,
) -> RuinPath {
    let mut state = if initial_capital <= 0.0 {
        PathState::Ruined
    } else {
        PathState::Solvent(initial_capital)
    };
    let mut ruin_period = matches!(state, PathState::Ruined).then_some(0);
    let mut capital = Vec::with_capacity(horizon as usize + 1);
    capital.push(state.capital());

    for period in 1..=horizon {
        if let PathState::Solvent(_) = state {
            let losses = process.period_losses(rng);
            state = state.step(premium_rate, losses);
            if state == PathState::Ruined {
                ruin_period = Some(period);
            }
        }
        capital.push(state.capital());
    }

    RuinPath {
        capital,
        ruined: ruin_period.is_some(),
        ruin_period,
    }
}

/// Run the whole ensemble with the given random source.
pub fn simulate_ruin<R: Rng + ?Sized>(input: &RuinInput, rng: &mut R) -> EconSimResult<RuinOutput> {
    let process = ClaimProcess::new(input.claim_rate, input.claim_size, input.claim_count_model)?;

    let paths: Vec<RuinPath> = (0..input.num_paths)
        .map(|_| {
            simulate_path(
                &process,
                input.initial_capital,
                input.premium_rate,
                input.horizon,
                rng,
            )
        })
        .collect();

    let ruined: Vec<u32> = paths.iter().filter_map(|p| p.ruin_period).collect();
    let surviving: Vec<f64> = paths
        .iter()
        .filter(|p| !p.ruined)
        .filter_map(|p| p.capital.last().copied())
        .collect();

    let ruined_paths = ruined.len() as u32;
    let ruin_probability = if input.num_paths == 0 {
        0.0
    } else {
        f64::from(ruined_paths) / f64::from(input.num_paths)
    };
    let mean_time_to_ruin = (!ruined.is_empty())
        .then(|| ruined.iter().map(|&p| f64::from(p)).sum::<f64>() / ruined.len() as f64);
    let mean_surviving_capital =
        (!surviving.is_empty()).then(|| surviving.iter().sum::<f64>() / surviving.len() as f64);

    Ok(RuinOutput {
        ruin_probability,
        ruined_paths,
        num_paths: input.num_paths,
        safety_loading: safety_loading(input.premium_rate, input.claim_rate, input.claim_size),
        mean_surviving_capital,
        mean_time_to_ruin,
        paths,
    })
}

// ---------------------------------------------------------------------------
// Analysis entry point
// ---------------------------------------------------------------------------

/// Seeds from `input.seed` when present, otherwise from OS entropy, so
/// unseeded runs are not reproducible.
pub fn analyze_ruin(input: &RuinInput) -> EconSimResult<ComputationOutput<RuinOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    require_finite("initial_capital", input.initial_capital)?;
    require_finite("premium_rate", input.premium_rate)?;
    require_finite("claim_rate", input.claim_rate)?;
    require_finite("claim_size", input.claim_size)?;
    if input.num_paths == 0 {
        return Err(EconSimError::InvalidInput {
            field: "num_paths".into(),
            reason: "at least one path is required".into(),
        });
    }

    let mut rng = match input.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    log::debug!(
        "ruin simulation: {} paths x {} periods, model {:?}",
        input.num_paths,
        input.horizon,
        input.claim_count_model
    );

    let output = simulate_ruin(input, &mut rng)?;

    if output.safety_loading <= 0.0 {
        warnings.push(format!(
            "Safety loading {:.4} is not positive: ruin is certain over a long enough horizon",
            output.safety_loading
        ));
    }
    if input.num_paths < 100 {
        warnings.push(format!(
            "Only {} paths simulated: ruin probability is a noisy estimate",
            input.num_paths
        ));
    }
    warn_non_finite(&mut warnings, &[("safety_loading", output.safety_loading)]);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monte Carlo ruin simulation (compound claim process)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> RuinInput {
        RuinInput {
            initial_capital: 100.0,
            premium_rate: 12.0,
            claim_rate: 2.0,
            claim_size: 5.0,
            num_paths: 20,
            horizon: 50,
            claim_count_model: ClaimCountModel::Poisson,
            seed: Some(42),
        }
    }

    #[test]
    fn test_safety_loading() {
        assert!((safety_loading(12.0, 2.0, 5.0) - 0.2).abs() < 1e-12);
        assert_eq!(safety_loading(10.0, 2.0, 5.0), 0.0);
    }

    #[test]
    fn test_ruined_is_absorbing() {
        let state = PathState::Solvent(5.0).step(1.0, 10.0);
        assert_eq!(state, PathState::Ruined);
        assert_eq!(state.step(1_000.0, 0.0), PathState::Ruined);
        assert_eq!(state.capital(), 0.0);
    }

    #[test]
    fn test_capital_stays_zero_after_ruin() {
        let mut input = base_input();
        input.initial_capital = 1.0;
        input.premium_rate = 1.0;
        input.num_paths = 50;
        let mut rng = StdRng::seed_from_u64(7);
        let out = simulate_ruin(&input, &mut rng).unwrap();
        assert!(out.ruined_paths > 0);
        for path in out.paths.iter().filter(|p| p.ruined) {
            let at = path.ruin_period.unwrap() as usize;
            assert!(path.capital[at..].iter().all(|&c| c == 0.0));
            assert!(path.capital[..at].iter().all(|&c| c > 0.0));
        }
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let a = analyze_ruin(&base_input()).unwrap();
        let b = analyze_ruin(&base_input()).unwrap();
        assert_eq!(a.result.paths, b.result.paths);
        assert_eq!(a.result.ruin_probability, b.result.ruin_probability);
    }

    #[test]
    fn test_path_length_includes_initial_period() {
        let out = analyze_ruin(&base_input()).unwrap();
        assert_eq!(out.result.paths.len(), 20);
        assert!(out.result.paths.iter().all(|p| p.capital.len() == 51));
        assert!(out.result.paths.iter().all(|p| p.capital[0] == 100.0));
    }

    #[test]
    fn test_no_claims_never_ruins() {
        let mut input = base_input();
        input.claim_rate = 0.0;
        let out = analyze_ruin(&input).unwrap();
        assert_eq!(out.result.ruin_probability, 0.0);
        assert_eq!(out.result.mean_surviving_capital, Some(100.0 + 12.0 * 50.0));
    }

    #[test]
    fn test_negative_loading_warns() {
        let mut input = base_input();
        input.premium_rate = 5.0;
        let out = analyze_ruin(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Safety loading")));
    }

    #[test]
    fn test_perturbed_counts_are_non_negative_near_mean() {
        let process = ClaimProcess::new(0.5, 1.0, ClaimCountModel::Perturbed).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let draws: Vec<u64> = (0..10_000).map(|_| process.claim_count(&mut rng)).collect();
        let mean = draws.iter().sum::<u64>() as f64 / draws.len() as f64;
        assert!(draws.iter().all(|&c| c <= 2));
        assert!(mean > 0.3 && mean < 0.8);
    }

    #[test]
    fn test_huge_claim_rate_rejected_for_both_models() {
        for model in [ClaimCountModel::Poisson, ClaimCountModel::Perturbed] {
            let mut input = base_input();
            input.claim_count_model = model;
            for rate in [1e308, 1e12, MAX_CLAIM_RATE * 2.0] {
                input.claim_rate = rate;
                let result = std::panic::catch_unwind(|| analyze_ruin(&input));
                assert!(matches!(result, Ok(Err(EconSimError::InvalidInput { .. }))), "{model:?} {rate}");
            }
        }
    }

    #[test]
    fn test_claim_rate_at_bound_accepted() {
        let process = ClaimProcess::new(MAX_CLAIM_RATE, 1.0, ClaimCountModel::Perturbed).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let count = process.claim_count(&mut rng);
        assert!(count > 9_000 && count < 11_000);
    }

    #[test]
    fn test_zero_paths_rejected() {
        let mut input = base_input();
        input.num_paths = 0;
        assert!(analyze_ruin(&input).is_err());
    }
}
