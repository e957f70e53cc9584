use nalgebra::{DMatrix, DVector};

use crate::data::model::EndMemberSet;
use crate::error::UnmixError;

// ---------------------------------------------------------------------------
// WorkingSet – the solver's private, shrinking copy of the end-member set
// ---------------------------------------------------------------------------

/// The end-member subset a solve is currently operating on: member names in
/// original order plus the row-per-member spectral matrix. Built once from
/// the caller's set, then only ever *reduced*; the caller's set is never
/// touched.
#[derive(Debug, Clone)]
pub(crate) struct WorkingSet {
    pub names: Vec<String>,
    /// k×n matrix: one row per end-member, one column per channel.
    pub matrix: DMatrix<f64>,
}

impl WorkingSet {
    pub fn from_set(set: &EndMemberSet) -> Self {
        let k = set.len();
        let n = set.channels();
        let matrix =
            DMatrix::from_fn(k, n, |i, j| set.members[i].spectrum.values[j]);
        WorkingSet {
            names: set.names(),
            matrix,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// A reduced copy without the rows at the given (sorted) positions.
    fn without(&self, drop: &[usize]) -> Self {
        let keep: Vec<usize> = (0..self.len()).filter(|i| !drop.contains(i)).collect();
        WorkingSet {
            names: keep.iter().map(|&i| self.names[i].clone()).collect(),
            matrix: self.matrix.select_rows(keep.iter()),
        }
    }
}

// ---------------------------------------------------------------------------
// Negative-abundance elimination loop
// ---------------------------------------------------------------------------

/// Outcome of inspecting one iteration's abundances.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// No rounded abundance is negative – the subset is feasible.
    Converged,
    /// Positions (within the working set) of every member whose rounded
    /// abundance is negative; all are removed in one step.
    Remove(Vec<usize>),
}

/// Decide whether the subset is feasible, rounding each abundance to the
/// given decimal `precision` first so floating-point noise just below zero
/// does not evict a member whose true abundance is zero.
pub(crate) fn eliminate_step(abundances: &DVector<f64>, precision: f64) -> Step {
    let negatives: Vec<usize> = abundances
        .iter()
        .enumerate()
        .filter(|(_, &a)| round_to(a, precision) < 0.0)
        .map(|(i, _)| i)
        .collect();
    if negatives.is_empty() {
        Step::Converged
    } else {
        Step::Remove(negatives)
    }
}

fn round_to(value: f64, precision: f64) -> f64 {
    (value / precision).round() * precision
}

/// Run `solve_step` over progressively smaller subsets until every rounded
/// abundance is non-negative, per iteration removing *all* members that went
/// negative. The member count strictly decreases, so the loop performs at
/// most `set.len()` iterations; emptying the set is `InfeasibleElimination`.
pub(crate) fn run_elimination<F>(
    set: &EndMemberSet,
    precision: f64,
    mut solve_step: F,
) -> Result<(WorkingSet, DVector<f64>), UnmixError>
where
    F: FnMut(&WorkingSet) -> Result<DVector<f64>, UnmixError>,
{
    let mut working = WorkingSet::from_set(set);
    let mut removed: Vec<String> = Vec::new();

    loop {
        let abundances = solve_step(&working)?;
        match eliminate_step(&abundances, precision) {
            Step::Converged => {
                log::debug!(
                    "elimination converged with {} of {} end-members",
                    working.len(),
                    set.len()
                );
                return Ok((working, abundances));
            }
            Step::Remove(drop) => {
                let dropped: Vec<&String> = drop.iter().map(|&i| &working.names[i]).collect();
                log::debug!("removing end-members with negative abundance: {dropped:?}");
                removed.extend(dropped.into_iter().cloned());
                working = working.without(&drop);
                if working.is_empty() {
                    return Err(UnmixError::InfeasibleElimination { removed });
                }
            }
        }
    }
}
