use crate::error::UnmixError;

use super::model::{EndMember, EndMemberSet, Spectrum};

// ---------------------------------------------------------------------------
// Channel masking applied before a solve
// ---------------------------------------------------------------------------
//
// Upstream interpolation can leave NaN channels where the mixed spectrum's
// wavenumber range extends beyond an end-member's own. Those channels must be
// dropped from *all* spectra before the solver sees them, or the Gram matrix
// is poisoned. Masking selects channels on the already-aligned grid; it never
// resamples.

/// Drop every channel where the mixed spectrum or any end-member is
/// non-finite. Returns reduced copies; inputs are untouched.
pub fn mask_invalid_channels(
    endmembers: &EndMemberSet,
    mixed: &Spectrum,
) -> Result<(EndMemberSet, Spectrum), UnmixError> {
    check_channels(endmembers, mixed)?;

    let keep: Vec<bool> = (0..mixed.len())
        .map(|ch| {
            mixed.values[ch].is_finite()
                && endmembers
                    .members
                    .iter()
                    .all(|em| em.spectrum.values[ch].is_finite())
        })
        .collect();

    apply_mask(endmembers, mixed, &keep)
}

/// Keep only channels whose wavelength (10000 / wavenumber, µm) is at or
/// below `max_wavelength`. Returns reduced copies; inputs are untouched.
pub fn apply_wavelength_cutoff(
    endmembers: &EndMemberSet,
    mixed: &Spectrum,
    max_wavelength: f64,
) -> Result<(EndMemberSet, Spectrum), UnmixError> {
    check_channels(endmembers, mixed)?;

    let keep: Vec<bool> = mixed
        .wavenumber
        .iter()
        .map(|&wn| wn > 0.0 && 10_000.0 / wn <= max_wavelength)
        .collect();

    apply_mask(endmembers, mixed, &keep)
}

fn check_channels(endmembers: &EndMemberSet, mixed: &Spectrum) -> Result<(), UnmixError> {
    if !endmembers.is_empty() && endmembers.channels() != mixed.len() {
        return Err(UnmixError::ChannelMismatch {
            context: "mixed spectrum",
            expected: endmembers.channels(),
            got: mixed.len(),
        });
    }
    Ok(())
}

fn apply_mask(
    endmembers: &EndMemberSet,
    mixed: &Spectrum,
    keep: &[bool],
) -> Result<(EndMemberSet, Spectrum), UnmixError> {
    if !keep.iter().any(|&k| k) {
        return Err(UnmixError::NoValidChannels);
    }

    let members = endmembers
        .members
        .iter()
        .map(|em| EndMember {
            name: em.name.clone(),
            spectrum: retain_channels(&em.spectrum, keep),
        })
        .collect();

    Ok((
        EndMemberSet { members },
        retain_channels(mixed, keep),
    ))
}

/// Copy a spectrum keeping only the channels flagged in `keep`.
fn retain_channels(sp: &Spectrum, keep: &[bool]) -> Spectrum {
    let pick = |v: &[f64]| -> Vec<f64> {
        v.iter()
            .zip(keep)
            .filter(|(_, &k)| k)
            .map(|(x, _)| *x)
            .collect()
    };
    Spectrum {
        wavenumber: pick(&sp.wavenumber),
        values: pick(&sp.values),
        uncertainty: sp.uncertainty.as_deref().map(pick),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(wn: &[f64], values: &[f64]) -> Spectrum {
        Spectrum::new(wn.to_vec(), values.to_vec(), None).unwrap()
    }

    #[test]
    fn masks_nan_channels_in_any_spectrum() {
        let grid = [400.0, 500.0, 600.0, 700.0];
        let em = EndMember::new("A", spectrum(&grid, &[1.0, f64::NAN, 1.0, 1.0]));
        let set = EndMemberSet::new(vec![em]).unwrap();
        let mixed = spectrum(&grid, &[0.5, 0.5, f64::NAN, 0.5]);

        let (set, mixed) = mask_invalid_channels(&set, &mixed).unwrap();
        assert_eq!(mixed.wavenumber, vec![400.0, 700.0]);
        assert_eq!(set.members[0].spectrum.values, vec![1.0, 1.0]);
    }

    #[test]
    fn mask_keeps_uncertainty_aligned() {
        let grid = [400.0, 500.0, 600.0];
        let em = EndMember::new("A", spectrum(&grid, &[1.0, 1.0, 1.0]));
        let set = EndMemberSet::new(vec![em]).unwrap();
        let mixed = Spectrum::new(
            grid.to_vec(),
            vec![0.5, f64::NAN, 0.7],
            Some(vec![0.01, 0.02, 0.03]),
        )
        .unwrap();

        let (_, mixed) = mask_invalid_channels(&set, &mixed).unwrap();
        assert_eq!(mixed.uncertainty, Some(vec![0.01, 0.03]));
    }

    #[test]
    fn all_channels_invalid_is_an_error() {
        let grid = [400.0, 500.0];
        let em = EndMember::new("A", spectrum(&grid, &[f64::NAN, f64::NAN]));
        let set = EndMemberSet::new(vec![em]).unwrap();
        let mixed = spectrum(&grid, &[0.5, 0.5]);

        let err = mask_invalid_channels(&set, &mixed).unwrap_err();
        assert_eq!(err, UnmixError::NoValidChannels);
    }

    #[test]
    fn wavelength_cutoff_drops_long_wavelength_channels() {
        // 10000/400 = 25 µm, 10000/1000 = 10 µm, 10000/2000 = 5 µm
        let grid = [400.0, 1000.0, 2000.0];
        let em = EndMember::new("A", spectrum(&grid, &[1.0, 2.0, 3.0]));
        let set = EndMemberSet::new(vec![em]).unwrap();
        let mixed = spectrum(&grid, &[0.1, 0.2, 0.3]);

        let (set, mixed) = apply_wavelength_cutoff(&set, &mixed, 12.0).unwrap();
        assert_eq!(mixed.wavenumber, vec![1000.0, 2000.0]);
        assert_eq!(set.members[0].spectrum.values, vec![2.0, 3.0]);
    }
}
