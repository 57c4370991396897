//! Ordering, cross-validation and output of the accepted sequences.

use std::cmp::Ordering;

use nalgebra::Point2;

use crate::candidates::{CandidateSequence, Classification, Orientation};
use crate::error::GridError;
use crate::params::GRID_N;
use crate::point::{from_fixed, FixedPoint};

fn class_rank(class: Classification) -> u8 {
    match class {
        Classification::Horizontal => 0,
        Classification::Vertical => 1,
        _ => 2,
    }
}

/// Sort horizontal sequences first (by start y), then vertical ones (by start x).
///
/// Everything else trails in its original relative order.
pub fn sort_candidates(candidates: &mut [CandidateSequence], points: &[FixedPoint]) {
    candidates.sort_by(|a, b| {
        class_rank(a.class)
            .cmp(&class_rank(b.class))
            .then_with(|| match a.class.orientation() {
                Some(Orientation::Horizontal) => points[a.start()].y.cmp(&points[b.start()].y),
                Some(Orientation::Vertical) => points[a.start()].x.cmp(&points[b.start()].x),
                None => Ordering::Equal,
            })
    });
}

fn first_of(candidates: &[CandidateSequence], class: Classification) -> Option<usize> {
    candidates.iter().position(|c| c.class == class)
}

/// Check that the first sequence of `orientation` is made of the start points
/// of the first `GRID_N` sequences of the other orientation, in order.
///
/// Expects `candidates` sorted with [`sort_candidates`].
pub fn check_bounds(
    candidates: &[CandidateSequence],
    orientation: Orientation,
) -> Result<(), GridError> {
    let other = Classification::from(orientation.other());
    let incomplete = |found| GridError::IncompleteBounds { orientation, found };

    let reference = first_of(candidates, orientation.into()).ok_or(incomplete(0))?;
    let first_other = first_of(candidates, other).ok_or(incomplete(0))?;
    let reference = &candidates[reference];

    let crossing = candidates[first_other..]
        .iter()
        .take_while(|c| c.class == other)
        .take(GRID_N);

    let mut found = 0usize;
    for (position, (expected, seq)) in reference.indices.iter().zip(crossing).enumerate() {
        if seq.start() != *expected {
            return Err(GridError::BoundsMismatch {
                orientation,
                position,
            });
        }
        found += 1;
    }

    if found == GRID_N {
        Ok(())
    } else {
        Err(incomplete(found))
    }
}

/// Require exactly `GRID_N` horizontal and `GRID_N` vertical sequences.
pub fn validate_counts(candidates: &[CandidateSequence]) -> Result<(), GridError> {
    let horizontal = candidates
        .iter()
        .filter(|c| c.class == Classification::Horizontal)
        .count();
    let vertical = candidates
        .iter()
        .filter(|c| c.class == Classification::Vertical)
        .count();

    if horizontal != GRID_N || vertical != GRID_N {
        return Err(GridError::CountMismatch {
            horizontal,
            vertical,
            expected: GRID_N,
        });
    }
    Ok(())
}

/// Index lists of the accepted sequences of one orientation, in sorted order.
pub fn sequences_of(
    candidates: &[CandidateSequence],
    orientation: Orientation,
) -> Vec<[usize; GRID_N]> {
    let class = Classification::from(orientation);
    candidates
        .iter()
        .filter(|c| c.class == class)
        .map(|c| c.indices)
        .collect()
}

/// Every row must cross every column at a shared input point.
pub fn check_lattice(rows: &[[usize; GRID_N]], columns: &[[usize; GRID_N]]) -> Result<(), GridError> {
    for (row, row_indices) in rows.iter().enumerate() {
        for (col, col_indices) in columns.iter().enumerate() {
            if row_indices[col] != col_indices[row] {
                return Err(GridError::LatticeMismatch { row, col });
            }
        }
    }
    Ok(())
}

/// Row-major output points in original units.
pub fn emit_rows(rows: &[[usize; GRID_N]], points: &[FixedPoint]) -> Vec<Point2<f64>> {
    rows.iter()
        .flat_map(|row| row.iter().map(|&i| from_fixed(&points[i])))
        .collect()
}
