use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::require_finite;
use crate::types::{warn_non_finite, with_metadata, ComputationOutput, Money, Rate};
use crate::EconSimResult;

/// Weighted Average Cost of Capital from market values.
///
/// `WACC = E/(E+D)·Re + D/(E+D)·Rd·(1 − Tc)`. An empty capital structure
/// (`E + D = 0`) is defined as a WACC of 0.
pub fn wacc(
    equity_value: Money,
    debt_value: Money,
    cost_of_equity: Rate,
    cost_of_debt: Rate,
    tax_rate: Rate,
) -> Rate {
    let total = equity_value + debt_value;
    if total == 0.0 {
        return 0.0;
    }
    let equity_weight = equity_value / total;
    let debt_weight = debt_value / total;
    equity_weight * cost_of_equity + debt_weight * cost_of_debt * (1.0 - tax_rate)
}

/// Input parameters for Weighted Average Cost of Capital calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaccInput {
    /// Market value of equity
    pub equity_value: Money,
    /// Market value of debt
    pub debt_value: Money,
    /// Required return on equity
    pub cost_of_equity: Rate,
    /// Pre-tax cost of debt
    pub cost_of_debt: Rate,
    /// Marginal corporate tax rate
    pub tax_rate: Rate,
}

/// Output of the WACC calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaccOutput {
    pub wacc: Rate,
    pub equity_weight: Rate,
    pub debt_weight: Rate,
    pub after_tax_cost_of_debt: Rate,
}

pub fn calculate_wacc(input: &WaccInput) -> EconSimResult<ComputationOutput<WaccOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_finite("equity_value", input.equity_value)?;
    require_finite("debt_value", input.debt_value)?;
    require_finite("cost_of_equity", input.cost_of_equity)?;
    require_finite("cost_of_debt", input.cost_of_debt)?;
    require_finite("tax_rate", input.tax_rate)?;

    let total = input.equity_value + input.debt_value;
    let (equity_weight, debt_weight) = if total == 0.0 {
        warnings.push("Capital structure is empty; WACC defined as 0".into());
        (0.0, 0.0)
    } else {
        (input.equity_value / total, input.debt_value / total)
    };

    let result = wacc(
        input.equity_value,
        input.debt_value,
        input.cost_of_equity,
        input.cost_of_debt,
        input.tax_rate,
    );
    if result > 0.20 {
        warnings.push(format!(
            "WACC of {result} exceeds 20%; appropriate for high-risk situations only"
        ));
    }
    warn_non_finite(&mut warnings, &[("wacc", result)]);

    let output = WaccOutput {
        wacc: result,
        equity_weight,
        debt_weight,
        after_tax_cost_of_debt: input.cost_of_debt * (1.0 - input.tax_rate),
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "WACC from market-value weights",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wacc_basic() {
        // 60/40 split, Re 12%, Rd 8%, tax 30% -> 0.6*0.12 + 0.4*0.08*0.7 = 0.0944
        let r = wacc(600.0, 400.0, 0.12, 0.08, 0.30);
        assert!((r - 0.0944).abs() < 1e-12);
    }

    #[test]
    fn test_wacc_empty_structure_is_zero() {
        assert_eq!(wacc(0.0, 0.0, 0.12, 0.08, 0.30), 0.0);
    }

    #[test]
    fn test_wacc_all_equity() {
        assert_eq!(wacc(1000.0, 0.0, 0.11, 0.07, 0.25), 0.11);
    }

    #[test]
    fn test_calculate_wacc_envelope() {
        let input = WaccInput {
            equity_value: 0.0,
            debt_value: 0.0,
            cost_of_equity: 0.1,
            cost_of_debt: 0.05,
            tax_rate: 0.3,
        };
        let out = calculate_wacc(&input).unwrap();
        assert_eq!(out.result.wacc, 0.0);
        assert_eq!(out.warnings.len(), 1);
    }
}
