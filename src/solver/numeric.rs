use nalgebra::{Cholesky, DMatrix, DVector};

use crate::error::UnmixError;

use super::weights::WeightMatrix;

// ---------------------------------------------------------------------------
// Shared numerical primitives
// ---------------------------------------------------------------------------
//
// Both solvers go through these so that, given the same surviving subset,
// WLS and STO report identical Gram inverses, RMS values, and standard
// errors.

/// Gram matrix `C = E·W·Eᵀ` of the current end-member subset.
/// `E` has one row per end-member, one column per spectral channel.
pub(crate) fn gram_matrix(e: &DMatrix<f64>, weights: &WeightMatrix) -> DMatrix<f64> {
    let ew = weights.scale_columns(e);
    &ew * e.transpose()
}

/// Invert the Gram matrix via Cholesky.
///
/// `C` must be symmetric positive-definite; anything else (collinear or
/// duplicate end-members, more end-members than channels) makes the
/// factorization fail and is fatal for this solve attempt. `members` names
/// the subset active at the point of failure for the error report.
pub(crate) fn invert_gram(
    c: DMatrix<f64>,
    members: &[String],
) -> Result<DMatrix<f64>, UnmixError> {
    Cholesky::new(c)
        .map(|ch| ch.inverse())
        .ok_or_else(|| UnmixError::SingularSystem {
            members: members.to_vec(),
        })
}

/// Root-mean-square of a residual vector. Zero iff the residual is zero.
pub fn rms(residual: &DVector<f64>) -> f64 {
    if residual.is_empty() {
        return 0.0;
    }
    (residual.norm_squared() / residual.len() as f64).sqrt()
}

/// Per-abundance standard error under the weighted-least-squares covariance
/// model: `sqrt(diag(C⁻¹))`.
pub(crate) fn standard_errors(c_inv: &DMatrix<f64>) -> Vec<f64> {
    c_inv.diagonal().iter().map(|v| v.sqrt()).collect()
}
