use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::adjacency::PlanarAdjacency;
use crate::params::{TraceParams, GRID_N};
use crate::point::{spacing_angle_deg, FixedPoint};
use crate::trace::trace_sequence;

/// Grid axis a sequence runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The other axis.
    pub fn other(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Lifecycle tag of a [`CandidateSequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    Unclassified,
    Horizontal,
    Vertical,
    Outlier,
    /// Member of the direction bin with this index, orientation not yet resolved.
    PendingBin(usize),
}

impl Classification {
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            Classification::Horizontal => Some(Orientation::Horizontal),
            Classification::Vertical => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

impl From<Orientation> for Classification {
    fn from(o: Orientation) -> Self {
        match o {
            Orientation::Horizontal => Classification::Horizontal,
            Orientation::Vertical => Classification::Vertical,
        }
    }
}

/// A traced run of [`GRID_N`] points with its summary statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateSequence {
    /// Input indices in trace order; `indices[0]` is the start point.
    pub indices: [usize; GRID_N],
    /// Mean step vector in fixed-point units.
    pub mean_delta: Vector2<f64>,
    /// Undirected angle of `mean_delta` in degrees, `[0, 180)`.
    pub spacing_angle: f64,
    /// Length of `mean_delta` in fixed-point units.
    pub spacing_length: f64,
    pub class: Classification,
}

impl CandidateSequence {
    pub fn new(indices: [usize; GRID_N], mean_delta: Vector2<f64>) -> Self {
        Self {
            indices,
            mean_delta,
            spacing_angle: spacing_angle_deg(&mean_delta),
            spacing_length: mean_delta.norm(),
            class: Classification::Unclassified,
        }
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.indices[0]
    }

    #[inline]
    pub fn second(&self) -> usize {
        self.indices[1]
    }

    /// True if `other` visits the same points in the opposite order.
    pub fn is_reverse_of(&self, other: &CandidateSequence) -> bool {
        self.indices.iter().eq(other.indices.iter().rev())
    }
}

/// Trace a candidate from every directed edge of the graph.
///
/// Each real grid line shows up twice, once per direction.
pub fn generate_candidates<A: PlanarAdjacency + ?Sized>(
    graph: &A,
    points: &[FixedPoint],
    params: &TraceParams,
) -> Vec<CandidateSequence> {
    let mut candidates = Vec::new();
    for start in 0..graph.len() {
        for &second in graph.neighbors(start) {
            if let Some(seq) = trace_sequence(graph, points, start, second, params) {
                candidates.push(CandidateSequence::new(seq.indices, seq.mean_delta));
            }
        }
    }
    candidates
}
