//! Direction clustering of sequence candidates.
//!
//! A clean grid produces two dense groups in (angle, spacing) space, one per
//! axis, each holding both trace directions of every line. Bins are gathered
//! greedily: the first unclassified candidate seeds a bin, everything close
//! to its running mean joins. Small bins are outliers; exactly two large bins
//! must survive.

use log::debug;
use nalgebra::Vector2;

use crate::candidates::{CandidateSequence, Classification, Orientation};
use crate::error::GridError;
use crate::params::{BinFitParams, GRID_N};
use crate::point::spacing_angle_deg;

/// Minimal bin population: both trace directions of `GRID_N` lines.
pub const MIN_AXIS_BIN: usize = 2 * GRID_N;

/// Accumulated direction of one bin.
///
/// Members are summed with a consistent sign so that forward and backward
/// traces of a line reinforce instead of cancelling.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassificationBin {
    pub delta_sum: Vector2<f64>,
    pub count: usize,
}

impl ClassificationBin {
    pub fn mean_delta(&self) -> Option<Vector2<f64>> {
        (self.count > 0).then(|| self.delta_sum / self.count as f64)
    }

    /// Undirected angle of the accumulated direction, degrees in `[0, 180)`.
    pub fn angle_deg(&self) -> f64 {
        spacing_angle_deg(&self.delta_sum)
    }

    fn fits(&self, candidate: &CandidateSequence, max_length_error: f64, max_angle_error: f64) -> bool {
        let Some(mean) = self.mean_delta() else {
            return true;
        };

        let length_error = candidate.spacing_length - mean.norm();
        if length_error.abs() > max_length_error {
            return false;
        }

        let angle_error = fold_half_turn(candidate.spacing_angle - spacing_angle_deg(&mean));
        angle_error.abs() <= max_angle_error
    }

    fn push(&mut self, candidate: &mut CandidateSequence, bin_index: usize) {
        if self.delta_sum.dot(&candidate.mean_delta) >= 0.0 {
            self.delta_sum += candidate.mean_delta;
        } else {
            self.delta_sum -= candidate.mean_delta;
        }
        self.count += 1;
        candidate.class = Classification::PendingBin(bin_index);
    }
}

/// Wrap an angle difference in degrees to `[-90, 90]`.
fn fold_half_turn(diff: f64) -> f64 {
    let r = diff.rem_euclid(180.0);
    if r > 90.0 {
        r - 180.0
    } else {
        r
    }
}

/// Fill a fresh bin from the unclassified candidates.
///
/// Returns the bin and the number of unclassified candidates that did not fit.
fn gather_unclassified(
    candidates: &mut [CandidateSequence],
    bin_index: usize,
    params: &BinFitParams,
) -> (ClassificationBin, usize) {
    let max_length_error = params.max_length_error_fixed();
    let mut bin = ClassificationBin::default();
    let mut remaining = 0usize;

    for candidate in candidates
        .iter_mut()
        .filter(|c| c.class == Classification::Unclassified)
    {
        if bin.fits(candidate, max_length_error, params.max_angle_error_deg) {
            bin.push(candidate, bin_index);
        } else {
            remaining += 1;
        }
    }

    (bin, remaining)
}

fn mark_bin_outliers(candidates: &mut [CandidateSequence], bin_index: usize) {
    for c in candidates
        .iter_mut()
        .filter(|c| c.class == Classification::PendingBin(bin_index))
    {
        c.class = Classification::Outlier;
    }
}

fn mark_unclassified_outliers(candidates: &mut [CandidateSequence]) {
    for c in candidates
        .iter_mut()
        .filter(|c| c.class == Classification::Unclassified)
    {
        c.class = Classification::Outlier;
    }
}

/// Partition candidates into exactly two axis bins.
///
/// On success the members of the two bins are tagged `PendingBin(0)` and
/// `PendingBin(1)`, everything else `Outlier`.
pub fn cluster_candidates(
    candidates: &mut [CandidateSequence],
    params: &BinFitParams,
) -> Result<[ClassificationBin; 2], GridError> {
    if candidates.is_empty() {
        return Err(GridError::NoCandidates);
    }

    let mut axis_bins: Vec<ClassificationBin> = Vec::with_capacity(2);
    loop {
        let bin_index = axis_bins.len();
        let (bin, remaining) = gather_unclassified(candidates, bin_index, params);

        if bin.count < MIN_AXIS_BIN {
            debug!(
                "discarding bin of {} candidates at {:.1} deg, {} unclassified left",
                bin.count,
                bin.angle_deg(),
                remaining
            );
            mark_bin_outliers(candidates, bin_index);
            if axis_bins.len() == 2 && remaining < MIN_AXIS_BIN {
                mark_unclassified_outliers(candidates);
                break;
            }
            if remaining == 0 {
                return Err(GridError::NotEnoughAxisBins {
                    found: axis_bins.len(),
                });
            }
            continue;
        }

        if axis_bins.len() == 2 {
            return Err(GridError::TooManyAxisBins);
        }

        debug!(
            "axis bin {bin_index}: {} candidates at {:.1} deg",
            bin.count,
            bin.angle_deg()
        );
        axis_bins.push(bin);

        if remaining < MIN_AXIS_BIN {
            if axis_bins.len() < 2 {
                return Err(GridError::NotEnoughAxisBins {
                    found: axis_bins.len(),
                });
            }
            mark_unclassified_outliers(candidates);
            break;
        }
    }

    match <[ClassificationBin; 2]>::try_from(axis_bins) {
        Ok(bins) => Ok(bins),
        Err(bins) => Err(GridError::NotEnoughAxisBins { found: bins.len() }),
    }
}

/// Axis label for an accumulated bin direction.
///
/// Directions strictly between 45° and 135° are vertical. A grid seen at
/// close to 45° has no natural labeling; which axis comes out horizontal
/// there is arbitrary.
pub fn orientation_of(angle_deg: f64) -> Orientation {
    if angle_deg > 45.0 && angle_deg < 135.0 {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

/// Label the two axis bins and retag their members.
pub fn resolve_orientations(
    candidates: &mut [CandidateSequence],
    bins: &[ClassificationBin; 2],
) -> Result<[Orientation; 2], GridError> {
    let labels = [
        orientation_of(bins[0].angle_deg()),
        orientation_of(bins[1].angle_deg()),
    ];
    if labels[0] == labels[1] {
        return Err(GridError::SameOrientation {
            orientation: labels[0],
        });
    }

    for c in candidates.iter_mut() {
        if let Classification::PendingBin(k) = c.class {
            if let Some(label) = labels.get(k) {
                c.class = (*label).into();
            }
        }
    }
    Ok(labels)
}
