use nalgebra::DVector;

use crate::data::model::{EndMemberSet, Spectrum};
use crate::error::UnmixError;

use super::eliminate::{run_elimination, WorkingSet};
use super::numeric::invert_gram;
use super::result::AbundanceResult;
use super::weights::WeightMatrix;
use super::{finalize, validate_inputs, SolveOptions};

// ---------------------------------------------------------------------------
// Weighted least squares (unconstrained)
// ---------------------------------------------------------------------------

/// Unconstrained weighted-least-squares unmixing.
///
/// Minimizes `(m − Eᵀa)ᵀ·W·(m − Eᵀa)` in closed form,
/// `a = (E·W·Eᵀ)⁻¹·E·W·m`, then repairs infeasible (negative) abundances by
/// removing the offending end-members and re-solving until every surviving
/// abundance is non-negative.
pub fn solve_wls(
    endmembers: &EndMemberSet,
    mixed: &Spectrum,
    weights: &WeightMatrix,
    options: &SolveOptions,
) -> Result<AbundanceResult, UnmixError> {
    validate_inputs(endmembers, mixed, weights)?;
    let m = DVector::from_column_slice(&mixed.values);

    let (working, abundances) =
        run_elimination(endmembers, options.negative_precision, |ws| {
            wls_abundances(ws, weights, &m)
        })?;

    finalize(&working, &abundances, weights, &m, None)
}

/// One unconstrained solve over the current subset:
/// `a = C⁻¹·E·W·m` with `C = E·W·Eᵀ`.
fn wls_abundances(
    ws: &WorkingSet,
    weights: &WeightMatrix,
    m: &DVector<f64>,
) -> Result<DVector<f64>, UnmixError> {
    let ew = weights.scale_columns(&ws.matrix);
    let c = &ew * ws.matrix.transpose();
    let c_inv = invert_gram(c, &ws.names)?;
    Ok(&c_inv * (&ew * m))
}
