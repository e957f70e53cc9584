mod eliminate;
mod numeric;
pub mod result;
mod sto;
pub mod weights;
mod wls;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::data::model::{EndMemberSet, Spectrum};
use crate::error::UnmixError;

use eliminate::WorkingSet;
use numeric::{gram_matrix, invert_gram, standard_errors};
use result::AbundanceResult;
use weights::WeightMatrix;

pub use numeric::rms;
pub use sto::solve_sum_to_one;
pub use wls::solve_wls;

// ---------------------------------------------------------------------------
// Caller-facing configuration
// ---------------------------------------------------------------------------

/// Which closed-form solver to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// Unconstrained weighted least squares.
    Wls,
    /// Weighted least squares under the constraint `sum(abundances) = 1`.
    SumToOne,
}

/// Solver tuning supplied by the caller; the solvers hold no state of their
/// own.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOptions {
    /// Decimal precision abundances are rounded to before the negative test
    /// in the elimination loop, so values within noise of zero are not
    /// treated as infeasible.
    pub negative_precision: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            negative_precision: 1e-4,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run one unmixing solve with the chosen algorithm.
///
/// All inputs are read-only and must share one channel count; the result is
/// freshly allocated, so concurrent solves over shared inputs need no
/// coordination.
pub fn unmix(
    endmembers: &EndMemberSet,
    mixed: &Spectrum,
    weights: &WeightMatrix,
    algorithm: Algorithm,
    options: &SolveOptions,
) -> Result<AbundanceResult, UnmixError> {
    match algorithm {
        Algorithm::Wls => solve_wls(endmembers, mixed, weights, options),
        Algorithm::SumToOne => solve_sum_to_one(endmembers, mixed, weights, options),
    }
}

// ---------------------------------------------------------------------------
// Shared pre- and post-processing
// ---------------------------------------------------------------------------

fn validate_inputs(
    endmembers: &EndMemberSet,
    mixed: &Spectrum,
    weights: &WeightMatrix,
) -> Result<(), UnmixError> {
    if endmembers.is_empty() {
        return Err(UnmixError::EmptyEndMemberSet);
    }
    let channels = endmembers.channels();
    if mixed.len() != channels {
        return Err(UnmixError::ChannelMismatch {
            context: "mixed spectrum",
            expected: channels,
            got: mixed.len(),
        });
    }
    if weights.len() != channels {
        return Err(UnmixError::ChannelMismatch {
            context: "weight matrix",
            expected: channels,
            got: weights.len(),
        });
    }
    Ok(())
}

/// Fit, residual, RMS, and standard errors for the converged subset — the
/// one code path both solvers report through.
fn finalize(
    working: &WorkingSet,
    abundances: &DVector<f64>,
    weights: &WeightMatrix,
    m: &DVector<f64>,
    normalized: Option<Vec<f64>>,
) -> Result<AbundanceResult, UnmixError> {
    let fit = working.matrix.transpose() * abundances;
    let residual = m - &fit;
    let rms = numeric::rms(&residual);
    let c_inv = invert_gram(gram_matrix(&working.matrix, weights), &working.names)?;

    Ok(AbundanceResult {
        fit: fit.iter().copied().collect(),
        residual: residual.iter().copied().collect(),
        endmembers: working.names.clone(),
        abundances: abundances.iter().copied().collect(),
        errors: standard_errors(&c_inv),
        rms,
        normalized,
    })
}
