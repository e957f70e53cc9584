use serde::{Deserialize, Serialize};

use crate::error::UnmixError;

// ---------------------------------------------------------------------------
// Spectrum – one emissivity measurement on a wavenumber grid
// ---------------------------------------------------------------------------

/// A single emissivity spectrum on a strictly increasing wavenumber grid.
///
/// All spectra participating in one solve (every end-member plus the mixed
/// spectrum) must share the same grid; the solver checks channel counts but
/// grid *alignment* is the importer's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Wavenumber axis (cm⁻¹), strictly increasing.
    pub wavenumber: Vec<f64>,
    /// Emissivity values – same length as `wavenumber`.
    pub values: Vec<f64>,
    /// Optional per-channel measurement uncertainty (1σ), same length.
    /// Entries must be ≥ 0; zero entries resolve to a fallback weight when
    /// the weight matrix is built.
    pub uncertainty: Option<Vec<f64>>,
}

impl Spectrum {
    /// Build a spectrum, validating the grid and array lengths.
    pub fn new(
        wavenumber: Vec<f64>,
        values: Vec<f64>,
        uncertainty: Option<Vec<f64>>,
    ) -> Result<Self, UnmixError> {
        if values.len() != wavenumber.len() {
            return Err(UnmixError::InvalidSpectrum {
                reason: format!(
                    "{} values for {} wavenumbers",
                    values.len(),
                    wavenumber.len()
                ),
            });
        }
        if let Some(sigma) = &uncertainty {
            if sigma.len() != wavenumber.len() {
                return Err(UnmixError::InvalidSpectrum {
                    reason: format!(
                        "{} uncertainty entries for {} wavenumbers",
                        sigma.len(),
                        wavenumber.len()
                    ),
                });
            }
            if let Some(ch) = sigma.iter().position(|s| *s < 0.0) {
                return Err(UnmixError::InvalidSpectrum {
                    reason: format!("negative uncertainty {} at channel {ch}", sigma[ch]),
                });
            }
        }
        if let Some(ch) = wavenumber.windows(2).position(|w| w[1] <= w[0]) {
            return Err(UnmixError::InvalidSpectrum {
                reason: format!(
                    "wavenumber grid not strictly increasing at channel {}",
                    ch + 1
                ),
            });
        }

        Ok(Spectrum {
            wavenumber,
            values,
            uncertainty,
        })
    }

    /// Number of spectral channels.
    pub fn len(&self) -> usize {
        self.wavenumber.len()
    }

    /// Whether the spectrum has no channels.
    pub fn is_empty(&self) -> bool {
        self.wavenumber.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EndMember – a named pure-material reference spectrum
// ---------------------------------------------------------------------------

/// One pure-material reference spectrum from the spectral library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndMember {
    /// Library name, e.g. `"Quartz"` – carried through to the result.
    pub name: String,
    pub spectrum: Spectrum,
}

impl EndMember {
    pub fn new(name: impl Into<String>, spectrum: Spectrum) -> Self {
        EndMember {
            name: name.into(),
            spectrum,
        }
    }
}

// ---------------------------------------------------------------------------
// EndMemberSet – the ordered library subset offered to one solve
// ---------------------------------------------------------------------------

/// An ordered collection of end-members sharing one wavenumber grid.
///
/// Order is significant: abundance outputs align with it. The solver never
/// mutates a caller's set – elimination works on its own reduced copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndMemberSet {
    pub members: Vec<EndMember>,
}

impl EndMemberSet {
    /// Build a set, checking that all members agree on channel count.
    pub fn new(members: Vec<EndMember>) -> Result<Self, UnmixError> {
        if let Some(first) = members.first() {
            let expected = first.spectrum.len();
            for em in &members[1..] {
                if em.spectrum.len() != expected {
                    return Err(UnmixError::ChannelMismatch {
                        context: "end-member",
                        expected,
                        got: em.spectrum.len(),
                    });
                }
            }
        }
        Ok(EndMemberSet { members })
    }

    /// Number of end-members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the set holds no end-members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Channel count of the shared grid (0 for an empty set).
    pub fn channels(&self) -> usize {
        self.members.first().map_or(0, |em| em.spectrum.len())
    }

    /// Member names in set order.
    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|em| em.name.clone()).collect()
    }
}
