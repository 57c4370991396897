use crate::candidates::{CandidateSequence, Classification, Orientation};

/// Does the sequence run in the canonical direction of its axis (+x or +y)?
fn has_canonical_direction(candidate: &CandidateSequence, orientation: Orientation) -> bool {
    match orientation {
        Orientation::Horizontal => candidate.mean_delta.x > 0.0,
        Orientation::Vertical => candidate.mean_delta.y > 0.0,
    }
}

/// Collapse forward/backward traces of the same line into one sequence.
///
/// Every real line is traced from both ends, so a sequence without its exact
/// reverse among the later candidates is spurious and becomes an outlier.
/// Of a matched pair, the canonical-direction trace takes the earlier slot
/// and the other one is dropped. Returns the number of surviving sequences.
pub fn filter_bidirectional(candidates: &mut [CandidateSequence], orientation: Orientation) -> usize {
    let class = Classification::from(orientation);
    let mut kept = 0usize;

    for i in 0..candidates.len() {
        if candidates[i].class != class {
            continue;
        }

        let partner = (i + 1..candidates.len()).find(|&j| {
            candidates[j].class == class && candidates[j].is_reverse_of(&candidates[i])
        });

        match partner {
            Some(j) => {
                if !has_canonical_direction(&candidates[i], orientation) {
                    candidates.swap(i, j);
                }
                candidates[j].class = Classification::Outlier;
                kept += 1;
            }
            None => candidates[i].class = Classification::Outlier,
        }
    }

    kept
}
