use serde::Serialize;

// ---------------------------------------------------------------------------
// AbundanceResult – everything one solve reports back
// ---------------------------------------------------------------------------

/// Outcome of a single unmixing solve. Immutable once returned and owned by
/// the caller; rendering, export formatting, and unit display are the
/// results collaborator's business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbundanceResult {
    /// Fitted spectrum `Eᵀ·a` over the input grid.
    pub fit: Vec<f64>,
    /// Residual `mixed − fit`, channel by channel.
    pub residual: Vec<f64>,
    /// Names of the end-members that survived elimination, in input order.
    pub endmembers: Vec<String>,
    /// Estimated abundance per surviving end-member, aligned with
    /// `endmembers`.
    pub abundances: Vec<f64>,
    /// Standard error per abundance, `sqrt(diag(C⁻¹))` of the final subset.
    pub errors: Vec<f64>,
    /// Root-mean-square residual of the final fit.
    pub rms: f64,
    /// Sum-to-one solves only: abundances rescaled so they sum to exactly 1.
    pub normalized: Option<Vec<f64>>,
}
