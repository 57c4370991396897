use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::adjacency::{PlanarAdjacency, ProximityGraph};
use crate::assemble::{
    check_bounds, check_lattice, emit_rows, sequences_of, sort_candidates, validate_counts,
};
use crate::candidates::{generate_candidates, CandidateSequence, Orientation};
use crate::clustering::{cluster_candidates, resolve_orientations};
use crate::dedup::filter_bidirectional;
use crate::error::GridError;
use crate::params::{GridFinderParams, GRID_N};
use crate::point::{from_fixed, FixedPoint, FIXED_POINT_SCALE};

/// A recovered grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridDetection {
    /// `GRID_N * GRID_N` points in original units, row-major.
    pub points: Vec<Point2<f64>>,
    /// Input indices of each row, top to bottom.
    pub rows: Vec<[usize; GRID_N]>,
    /// Input indices of each column, left to right.
    pub columns: Vec<[usize; GRID_N]>,
}

/// Grid search over an unordered point cloud.
///
/// Holds only parameters; one finder can serve any number of threads.
#[derive(Clone, Debug, Default)]
pub struct GridFinder {
    params: GridFinderParams,
}

impl GridFinder {
    pub fn new(params: GridFinderParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &GridFinderParams {
        &self.params
    }

    /// Find the grid using the Delaunay proximity graph of `points`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, points), fields(num_points = points.len()))
    )]
    pub fn detect(&self, points: &[FixedPoint]) -> Result<GridDetection, GridError> {
        let need = GRID_N * GRID_N;
        if points.len() < need {
            debug!("{} points, need at least {need}", points.len());
            return Err(GridError::TooFewPoints {
                got: points.len(),
                need,
            });
        }

        let graph = ProximityGraph::build(points);
        debug!(
            "proximity graph: {} nodes, {} edges",
            graph.len(),
            graph.edge_count()
        );
        self.detect_with_adjacency(points, &graph)
    }

    /// Find the grid using a caller-provided adjacency over `points`.
    ///
    /// `graph` must have one node per point and only refer to indices below
    /// `points.len()`; a node count mismatch is rejected up front.
    pub fn detect_with_adjacency<A: PlanarAdjacency + ?Sized>(
        &self,
        points: &[FixedPoint],
        graph: &A,
    ) -> Result<GridDetection, GridError> {
        if graph.len() != points.len() {
            return Err(GridError::AdjacencyMismatch {
                nodes: graph.len(),
                points: points.len(),
            });
        }

        let mut candidates = generate_candidates(graph, points, &self.params.trace);
        debug!("traced {} sequence candidates", candidates.len());

        let result = self.classify(points, &mut candidates);
        if self.params.debug {
            dump_candidates(&candidates, points);
        }
        if let Err(err) = &result {
            debug!("no grid: {err}");
        }
        result
    }

    fn classify(
        &self,
        points: &[FixedPoint],
        candidates: &mut [CandidateSequence],
    ) -> Result<GridDetection, GridError> {
        let bins = cluster_candidates(candidates, &self.params.bin_fit)?;
        resolve_orientations(candidates, &bins)?;

        let rows = filter_bidirectional(candidates, Orientation::Horizontal);
        let columns = filter_bidirectional(candidates, Orientation::Vertical);
        debug!("{rows} rows and {columns} columns after pairing opposite traces");

        sort_candidates(candidates, points);
        check_bounds(candidates, Orientation::Horizontal)?;
        check_bounds(candidates, Orientation::Vertical)?;
        validate_counts(candidates)?;

        let rows = sequences_of(candidates, Orientation::Horizontal);
        let columns = sequences_of(candidates, Orientation::Vertical);
        if self.params.strict_lattice {
            check_lattice(&rows, &columns)?;
        }

        Ok(GridDetection {
            points: emit_rows(&rows, points),
            rows,
            columns,
        })
    }
}

fn dump_candidates(candidates: &[CandidateSequence], points: &[FixedPoint]) {
    let scale = f64::from(FIXED_POINT_SCALE);
    for (i, c) in candidates.iter().enumerate() {
        let from = from_fixed(&points[c.start()]);
        debug!(
            "candidate {i}: from {:.3} {:.3} delta_mean {:.3} {:.3} len {:.3} angle {:.2} class {:?}",
            from.x,
            from.y,
            c.mean_delta.x / scale,
            c.mean_delta.y / scale,
            c.spacing_length / scale,
            c.spacing_angle,
            c.class
        );
    }
}

/// Find a `GRID_N`×`GRID_N` grid in `points`.
///
/// Returns the grid points in original units, row-major (rows by increasing
/// y, points within a row by increasing x), or `None` if the points do not
/// form a clean grid.
pub fn find_grid(points: &[FixedPoint]) -> Option<Vec<Point2<f64>>> {
    find_grid_with_debug(points, false)
}

/// [`find_grid`] with optional per-candidate diagnostics on the `log` channel.
pub fn find_grid_with_debug(points: &[FixedPoint], debug: bool) -> Option<Vec<Point2<f64>>> {
    let finder = GridFinder::new(GridFinderParams {
        debug,
        ..GridFinderParams::default()
    });
    finder.detect(points).ok().map(|d| d.points)
}
