//! Uncertainty-weighted linear unmixing of mineral emissivity spectra.
//!
//! Given a library of pure end-member spectra and a mixed spectrum measured
//! on the same wavenumber grid, the solvers estimate how much of each
//! end-member the mixture contains. Two closed-form algorithms are
//! available:
//!
//! * [`solve_wls`] – unconstrained weighted least squares
//! * [`solve_sum_to_one`] – the same objective under `sum(abundances) = 1`
//!
//! Both wrap the solve in an elimination loop that evicts end-members whose
//! estimated abundance comes out negative and re-solves on the reduced set.
//! The solvers are pure functions: caller-owned read-only inputs in, a
//! freshly allocated [`AbundanceResult`] out, no shared state between calls.
//!
//! ```
//! use spectral_unmix::{
//!     solve_wls, EndMember, EndMemberSet, SolveOptions, Spectrum, WeightMatrix,
//! };
//!
//! let grid = vec![400.0, 600.0, 800.0];
//! let set = EndMemberSet::new(vec![
//!     EndMember::new("A", Spectrum::new(grid.clone(), vec![1.0, 0.0, 0.0], None).unwrap()),
//!     EndMember::new("B", Spectrum::new(grid.clone(), vec![0.0, 1.0, 1.0], None).unwrap()),
//! ])
//! .unwrap();
//! let mixed = Spectrum::new(grid, vec![0.4, 0.6, 0.6], None).unwrap();
//!
//! let result = solve_wls(
//!     &set,
//!     &mixed,
//!     &WeightMatrix::uniform(3),
//!     &SolveOptions::default(),
//! )
//! .unwrap();
//! assert!((result.abundances[0] - 0.4).abs() < 1e-9);
//! ```

mod error;

pub mod data;
pub mod solver;

pub use data::model::{EndMember, EndMemberSet, Spectrum};
pub use data::prepare::{apply_wavelength_cutoff, mask_invalid_channels};
pub use error::UnmixError;
pub use solver::result::AbundanceResult;
pub use solver::weights::WeightMatrix;
pub use solver::{rms, solve_sum_to_one, solve_wls, unmix, Algorithm, SolveOptions};
