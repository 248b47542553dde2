//! Gompertz mortality: the force of mortality grows exponentially with age,
//! `μ(x) = α·e^(β·x)`. Survival is rolled forward one year at a time.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput};
use crate::{EconSimError, EconSimResult};

pub const DEFAULT_MAX_AGE: u32 = 110;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalPoint {
    pub age: u32,
    /// Force of mortality at this age
    pub mortality_force: f64,
    /// Probability of surviving from birth to this age
    pub survival: f64,
    /// Probability of dying within the next year given alive at this age
    pub death_probability: f64,
}

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

pub fn mortality_force(alpha: f64, beta: f64, age: f64) -> f64 {
    alpha * (beta * age).exp()
}

/// Survival curve for integer ages `0..=max_age`, `S(0) = 1` and
/// `S(x+1) = S(x)·e^(−μ(x))`.
pub fn survival_curve(alpha: f64, beta: f64, max_age: u32) -> Vec<SurvivalPoint> {
    let mut survival = 1.0;
    (0..=max_age)
        .map(|age| {
            let mu = mortality_force(alpha, beta, f64::from(age));
            let year_survival = (-mu).exp();
            let point = SurvivalPoint {
                age,
                mortality_force: mu,
                survival,
                death_probability: 1.0 - year_survival,
            };
            survival *= year_survival;
            point
        })
        .collect()
}

/// Discrete life-table expectation at birth: `Σ S(x)` over the modeled ages.
pub fn life_expectancy(curve: &[SurvivalPoint]) -> f64 {
    curve.iter().map(|p| p.survival).sum()
}

/// First age at which fewer than half of the cohort remain.
pub fn median_age_at_death(curve: &[SurvivalPoint]) -> Option<u32> {
    curve.iter().find(|p| p.survival < 0.5).map(|p| p.age)
}

/// Age with the largest share of deaths, `S(x)·q(x)`.
pub fn modal_age_at_death(curve: &[SurvivalPoint]) -> Option<u32> {
    curve
        .iter()
        .map(|p| (p.age, p.survival * p.death_probability))
        .fold(None, |best: Option<(u32, f64)>, (age, deaths)| match best {
            Some((_, most)) if most >= deaths => best,
            _ => Some((age, deaths)),
        })
        .map(|(age, _)| age)
}

// ---------------------------------------------------------------------------
// Analysis entry point
// ---------------------------------------------------------------------------

fn default_max_age() -> u32 {
    DEFAULT_MAX_AGE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GompertzInput {
    /// Baseline mortality at age 0
    pub alpha: f64,
    /// Rate at which mortality grows with age
    pub beta: f64,
    #[serde(default = "default_max_age")]
    pub max_age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GompertzOutput {
    pub life_expectancy: f64,
    pub median_age_at_death: Option<u32>,
    pub modal_age_at_death: Option<u32>,
    /// Survival at the last modeled age
    pub terminal_survival: f64,
    pub curve: Vec<SurvivalPoint>,
}

pub fn analyze_gompertz(input: &GompertzInput) -> EconSimResult<ComputationOutput<GompertzOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    require_finite("alpha", input.alpha)?;
    require_finite("beta", input.beta)?;
    if input.alpha <= 0.0 {
        return Err(EconSimError::InvalidInput {
            field: "alpha".into(),
            reason: "baseline mortality must be positive".into(),
        });
    }
    if input.beta <= 0.0 {
        warnings.push("Non-positive beta: mortality does not increase with age".into());
    }

    let curve = survival_curve(input.alpha, input.beta, input.max_age);
    let e0 = life_expectancy(&curve);
    let terminal_survival = curve.last().map_or(1.0, |p| p.survival);
    if terminal_survival > 0.01 {
        warnings.push(format!(
            "{:.1}% of the cohort is still alive at age {}; life expectancy is truncated",
            terminal_survival * 100.0,
            input.max_age
        ));
    }
    warn_non_finite(&mut warnings, &[("life_expectancy", e0)]);

    let output = GompertzOutput {
        life_expectancy: e0,
        median_age_at_death: median_age_at_death(&curve),
        modal_age_at_death: modal_age_at_death(&curve),
        terminal_survival,
        curve,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Gompertz survival (discrete life table)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHA: f64 = 0.0001;
    const BETA: f64 = 0.085;

    #[test]
    fn test_curve_shape() {
        let curve = survival_curve(ALPHA, BETA, DEFAULT_MAX_AGE);
        assert_eq!(curve.len(), 111);
        assert_eq!(curve[0].survival, 1.0);
        for pair in curve.windows(2) {
            assert!(pair[1].survival <= pair[0].survival);
            assert!(pair[1].mortality_force > pair[0].mortality_force);
        }
        assert!(curve.iter().all(|p| (0.0..=1.0).contains(&p.survival)));
    }

    #[test]
    fn test_life_expectancy_is_discrete_sum() {
        let curve = survival_curve(ALPHA, BETA, DEFAULT_MAX_AGE);
        let mut s = 1.0;
        let mut expected = 0.0;
        for age in 0..=DEFAULT_MAX_AGE {
            expected += s;
            s *= (-ALPHA * (BETA * f64::from(age)).exp()).exp();
        }
        assert_eq!(life_expectancy(&curve), expected);
    }

    #[test]
    fn test_median_before_mode_region() {
        let curve = survival_curve(ALPHA, BETA, DEFAULT_MAX_AGE);
        let median = median_age_at_death(&curve).unwrap();
        let mode = modal_age_at_death(&curve).unwrap();
        assert!(median > 60 && median < 100);
        assert!(mode > 60 && mode < 100);
        assert!(curve[median as usize].survival < 0.5);
        assert!(curve[median as usize - 1].survival >= 0.5);
    }

    #[test]
    fn test_death_probability_matches_ratio() {
        let curve = survival_curve(ALPHA, BETA, 50);
        for pair in curve.windows(2) {
            let q = 1.0 - pair[1].survival / pair[0].survival;
            assert!((q - pair[0].death_probability).abs() < 1e-12);
        }
    }

    #[test]
    fn test_analysis_rejects_non_positive_alpha() {
        let input = GompertzInput {
            alpha: 0.0,
            beta: BETA,
            max_age: DEFAULT_MAX_AGE,
        };
        assert!(analyze_gompertz(&input).is_err());
    }

    #[test]
    fn test_truncation_warning() {
        let input = GompertzInput {
            alpha: ALPHA,
            beta: BETA,
            max_age: 40,
        };
        let out = analyze_gompertz(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("truncated")));
    }
}
