use thiserror::Error;

// ---------------------------------------------------------------------------
// UnmixError – every way a solve can fail
// ---------------------------------------------------------------------------

/// Errors produced by the unmixing solvers and their input builders.
///
/// Every variant is terminal for the solve call that raised it. The
/// negative-abundance elimination loop's repair iterations are part of the
/// algorithm, not error recovery — once one of these surfaces, the call is
/// over and the caller decides what to show the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnmixError {
    /// A spectrum failed construction-time validation (mismatched array
    /// lengths, non-increasing wavenumber grid, negative uncertainty).
    #[error("invalid spectrum: {reason}")]
    InvalidSpectrum { reason: String },

    /// Channel counts disagree between the end-member set, the mixed
    /// spectrum, or the weight matrix.
    #[error("channel count mismatch: {context} has {got} channels, expected {expected}")]
    ChannelMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    /// The end-member set was empty at call time.
    #[error("end-member set is empty")]
    EmptyEndMemberSet,

    /// A directly supplied weight entry is not a finite positive number.
    #[error("invalid weight {value} at channel {channel}: weights must be finite and > 0")]
    InvalidWeight { channel: usize, value: f64 },

    /// The fallback weight substituted for unusable uncertainties is itself
    /// not a finite positive number.
    #[error("invalid fallback weight {value}: must be finite and > 0")]
    InvalidFallbackWeight { value: f64 },

    /// The Gram matrix `E·W·Eᵀ` of the active end-member subset is singular
    /// or not positive-definite (collinear or duplicate end-members, or more
    /// end-members than spectral channels).
    #[error("singular Gram matrix for end-members {members:?}")]
    SingularSystem { members: Vec<String> },

    /// Sum-to-one only: the constraint scalar `1ᵀ·C⁻¹·1` is zero or
    /// non-finite, so the closed-form correction has no defined direction.
    #[error("degenerate sum-to-one constraint for end-members {members:?}")]
    DegenerateConstraint { members: Vec<String> },

    /// The elimination loop removed every end-member: no non-negative
    /// solution exists over any subset of the supplied library.
    #[error("elimination removed every end-member (removal order: {removed:?})")]
    InfeasibleElimination { removed: Vec<String> },

    /// Channel preparation masked out every spectral channel.
    #[error("no valid spectral channels remain after masking")]
    NoValidChannels,
}
