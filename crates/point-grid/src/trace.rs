//! Greedy tracing of straight, geometrically spaced point sequences.
//!
//! The points of one grid row are projections of equidistant collinear
//! points, so successive steps keep their direction while their lengths vary
//! roughly geometrically (or stay constant, which is the same thing with
//! ratio 1).

use nalgebra::Vector2;

use crate::adjacency::PlanarAdjacency;
use crate::params::{TraceParams, GRID_N};
use crate::point::{delta, delta_length, FixedPoint};

/// Running statistics of one trace.
#[derive(Clone, Debug)]
pub struct TraceState {
    last_delta: Vector2<i32>,
    ratio_sum: f64,
    ratio_count: usize,
}

impl TraceState {
    /// Start a trace whose previous step was `initial`.
    pub fn new(initial: Vector2<i32>) -> Self {
        Self {
            last_delta: initial,
            ratio_sum: 0.0,
            ratio_count: 0,
        }
    }

    /// Most recently accepted step.
    pub fn last_delta(&self) -> Vector2<i32> {
        self.last_delta
    }

    /// Mean of the accepted length ratios, if any were observed.
    pub fn mean_ratio(&self) -> Option<f64> {
        (self.ratio_count > 0).then(|| self.ratio_sum / self.ratio_count as f64)
    }

    fn accept(&mut self, step: Vector2<i32>, ratio: f64) {
        self.ratio_sum += ratio;
        self.ratio_count += 1;
        self.last_delta = step;
    }
}

/// Pick the neighbor of `node` that continues the sequence described by `state`.
///
/// Neighbors are scanned in graph order and the first one passing every
/// test wins; ambiguous configurations are not disambiguated. On success the
/// state advances to the accepted step.
pub fn next_along_sequence<A: PlanarAdjacency + ?Sized>(
    state: &mut TraceState,
    node: usize,
    points: &[FixedPoint],
    graph: &A,
    params: &TraceParams,
) -> Option<usize> {
    let last = state.last_delta;
    let last_length = delta_length(&last);
    if last_length <= 0.0 {
        return None;
    }
    let max_length_error = params.max_step_length_error_fixed();
    let origin = &points[node];

    for &candidate in graph.neighbors(node) {
        let step = delta(origin, &points[candidate]);
        let length = delta_length(&step);
        if length <= 0.0 {
            continue;
        }

        let cos = (f64::from(last.x) * f64::from(step.x) + f64::from(last.y) * f64::from(step.y))
            / (last_length * length);
        if cos < params.min_step_cos {
            continue;
        }

        if (last_length - length).abs() > max_length_error {
            continue;
        }

        let ratio = length / last_length;
        if ratio < params.min_length_ratio || ratio > params.max_length_ratio {
            continue;
        }

        // The first few ratios are too noisy to form a mean; the reverse
        // trace of the same row covers that end.
        if state.ratio_count >= params.min_ratio_samples {
            let mean = state.ratio_sum / state.ratio_count as f64;
            if (ratio - mean).abs() > params.max_ratio_deviation {
                continue;
            }
        }

        state.accept(step, ratio);
        return Some(candidate);
    }

    None
}

/// A complete run of [`GRID_N`] points.
#[derive(Clone, Debug, PartialEq)]
pub struct TracedSequence {
    /// Input indices, in trace order.
    pub indices: [usize; GRID_N],
    /// Mean of the `GRID_N - 1` steps, in fixed-point units.
    pub mean_delta: Vector2<f64>,
}

/// Trace a full sequence seeded by the edge `start -> second`.
///
/// Returns `None` as soon as any step fails to find a continuation.
pub fn trace_sequence<A: PlanarAdjacency + ?Sized>(
    graph: &A,
    points: &[FixedPoint],
    start: usize,
    second: usize,
    params: &TraceParams,
) -> Option<TracedSequence> {
    let seed = delta(&points[start], &points[second]);
    let mut indices = [start; GRID_N];
    indices[1] = second;

    let mut sum = seed.cast::<f64>();
    let mut state = TraceState::new(seed);
    let mut current = second;
    for slot in indices.iter_mut().skip(2) {
        let next = next_along_sequence(&mut state, current, points, graph, params)?;
        *slot = next;
        sum += state.last_delta().cast::<f64>();
        current = next;
    }

    Some(TracedSequence {
        indices,
        mean_delta: sum / (GRID_N - 1) as f64,
    })
}
