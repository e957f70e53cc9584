use nalgebra::{DMatrix, DVector};

use crate::data::model::Spectrum;
use crate::error::UnmixError;

// ---------------------------------------------------------------------------
// WeightMatrix – per-channel inverse-variance weights
// ---------------------------------------------------------------------------

/// Diagonal weight matrix for the least-squares objective: one strictly
/// positive finite entry per spectral channel.
///
/// Built from measurement uncertainties as `1/σ²`. A channel whose σ is
/// zero, negative, or non-finite cannot yield a usable weight, so it is
/// given a caller-supplied fallback (commonly 1.0, i.e. unweighted) instead
/// of producing an infinite or zero entry.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    diag: DVector<f64>,
}

impl WeightMatrix {
    /// Unit weights for `channels` channels (unweighted fit).
    pub fn uniform(channels: usize) -> Self {
        WeightMatrix {
            diag: DVector::from_element(channels, 1.0),
        }
    }

    /// `1/σ²` per channel; unusable σ entries resolve to `fallback`.
    pub fn from_uncertainties(sigma: &[f64], fallback: f64) -> Result<Self, UnmixError> {
        if !fallback.is_finite() || fallback <= 0.0 {
            return Err(UnmixError::InvalidFallbackWeight { value: fallback });
        }
        let diag = DVector::from_iterator(
            sigma.len(),
            sigma.iter().map(|s| {
                let w = 1.0 / (s * s);
                if w.is_finite() && w > 0.0 {
                    w
                } else {
                    fallback
                }
            }),
        );
        Ok(WeightMatrix { diag })
    }

    /// Weights taken from a spectrum's own uncertainty array, or unit
    /// weights when it carries none.
    pub fn from_spectrum(sp: &Spectrum, fallback: f64) -> Result<Self, UnmixError> {
        match &sp.uncertainty {
            Some(sigma) => Self::from_uncertainties(sigma, fallback),
            None => {
                if !fallback.is_finite() || fallback <= 0.0 {
                    return Err(UnmixError::InvalidFallbackWeight { value: fallback });
                }
                Ok(Self::uniform(sp.len()))
            }
        }
    }

    /// Explicit per-channel weights; every entry must be finite and > 0.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, UnmixError> {
        if let Some(ch) = weights.iter().position(|w| !w.is_finite() || *w <= 0.0) {
            return Err(UnmixError::InvalidWeight {
                channel: ch,
                value: weights[ch],
            });
        }
        Ok(WeightMatrix {
            diag: DVector::from_vec(weights),
        })
    }

    /// Number of spectral channels.
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    /// Whether the matrix covers no channels.
    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// `E·W` for a row-per-end-member matrix `E`: scales column `j` by the
    /// j-th diagonal entry. Avoids materializing the n×n diagonal.
    pub(crate) fn scale_columns(&self, e: &DMatrix<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(e.nrows(), e.ncols(), |i, j| e[(i, j)] * self.diag[j])
    }
}
