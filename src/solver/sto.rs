use nalgebra::DVector;

use crate::data::model::{EndMemberSet, Spectrum};
use crate::error::UnmixError;

use super::eliminate::{run_elimination, WorkingSet};
use super::numeric::invert_gram;
use super::result::AbundanceResult;
use super::weights::WeightMatrix;
use super::{finalize, validate_inputs, SolveOptions};

/// Tolerated drift of the final abundance sum from 1 before the normalized
/// vector is rescaled. The constraint holds exactly per iteration, so drift
/// beyond this is pure floating-point accumulation.
const SUM_DRIFT_TOLERANCE: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Sum-to-one constrained least squares
// ---------------------------------------------------------------------------

/// Weighted-least-squares unmixing under the closure constraint
/// `sum(a) = 1`.
///
/// Uses the closed-form Lagrange-multiplier correction to the unconstrained
/// estimate:
///
/// ```text
/// a_sto = a_wls + C⁻¹·1 · (1 − 1ᵀ·a_wls) / (1ᵀ·C⁻¹·1)
/// ```
///
/// the minimum-weighted-norm adjustment that enforces the constraint
/// exactly. Each elimination repair recomputes the *constrained* solution on
/// the reduced subset, so the sum-to-one property survives every removal.
/// Standard errors use the unconstrained covariance `C⁻¹` of the final
/// subset, same as WLS.
pub fn solve_sum_to_one(
    endmembers: &EndMemberSet,
    mixed: &Spectrum,
    weights: &WeightMatrix,
    options: &SolveOptions,
) -> Result<AbundanceResult, UnmixError> {
    validate_inputs(endmembers, mixed, weights)?;
    let m = DVector::from_column_slice(&mixed.values);

    let (working, abundances) =
        run_elimination(endmembers, options.negative_precision, |ws| {
            sto_abundances(ws, weights, &m)
        })?;

    let normalized = normalize(&abundances);
    finalize(&working, &abundances, weights, &m, Some(normalized))
}

/// One constrained solve over the current subset.
fn sto_abundances(
    ws: &WorkingSet,
    weights: &WeightMatrix,
    m: &DVector<f64>,
) -> Result<DVector<f64>, UnmixError> {
    let ew = weights.scale_columns(&ws.matrix);
    let c_inv = invert_gram(&ew * ws.matrix.transpose(), &ws.names)?;
    let a_wls = &c_inv * (&ew * m);

    let ones = DVector::from_element(ws.len(), 1.0);
    let c_inv_ones = &c_inv * &ones;
    // 1ᵀ·C⁻¹·1 – the squared weighted norm of the constraint direction.
    let scale = ones.dot(&c_inv_ones);
    if !scale.is_finite() || scale.abs() < f64::EPSILON {
        return Err(UnmixError::DegenerateConstraint {
            members: ws.names.clone(),
        });
    }

    let deficit = 1.0 - a_wls.sum();
    Ok(a_wls + c_inv_ones * (deficit / scale))
}

/// Abundances rescaled so they sum to exactly 1. By construction the raw sum
/// is already 1; rescaling only kicks in on floating-point drift.
fn normalize(abundances: &DVector<f64>) -> Vec<f64> {
    let sum = abundances.sum();
    if (sum - 1.0).abs() > SUM_DRIFT_TOLERANCE && sum != 0.0 {
        abundances.iter().map(|a| a / sum).collect()
    } else {
        abundances.iter().copied().collect()
    }
}
