//! Recover an ordered `GRID_N`×`GRID_N` grid from unordered 2D detections.
//!
//! ## Quickstart
//!
//! ```
//! use point_grid::{find_grid, to_fixed, GRID_N};
//!
//! let points: Vec<_> = (0..GRID_N)
//!     .flat_map(|y| (0..GRID_N).map(move |x| to_fixed(x as f64 * 25.0, y as f64 * 25.0)))
//!     .collect();
//!
//! let grid = find_grid(&points).expect("clean lattice");
//! assert_eq!(grid.len(), GRID_N * GRID_N);
//! assert_eq!(grid[GRID_N].y, 25.0);
//! ```
//!
//! Algorithm:
//! 1. Build a Delaunay proximity graph over the fixed-point input.
//! 2. From every directed edge, trace a run of `GRID_N` points that keeps its
//!    direction (≈5°) and varies its spacing at most geometrically.
//! 3. Cluster the runs by (angle, spacing); exactly two dense bins must
//!    survive, one per grid axis.
//! 4. Label the bins horizontal/vertical by angle.
//! 5. Pair every run with its reverse trace and keep the one pointing along
//!    +x (rows) or +y (columns).
//! 6. Sort rows by y and columns by x, check that the first row is made of
//!    the column starts and vice versa, and require `GRID_N` of each.
//! 7. Emit the rows, row-major, in original units.
//!
//! The search is deterministic and keeps no global state, so independent
//! calls can run on separate threads.
//!
//! ## Known limitation
//!
//! Axis labels come from the absolute angle of each bin. A grid observed at
//! close to 45° has no natural labeling and may be rejected or labeled either
//! way.

mod adjacency;
mod assemble;
mod candidates;
mod clustering;
mod dedup;
mod error;
mod finder;
mod logger;
mod params;
mod point;
mod trace;

pub use adjacency::{PlanarAdjacency, ProximityGraph};
pub use assemble::{check_bounds, check_lattice, emit_rows, sort_candidates, validate_counts};
pub use candidates::{generate_candidates, CandidateSequence, Classification, Orientation};
pub use clustering::{
    cluster_candidates, orientation_of, resolve_orientations, ClassificationBin, MIN_AXIS_BIN,
};
pub use dedup::filter_bidirectional;
pub use error::GridError;
pub use finder::{find_grid, find_grid_with_debug, GridDetection, GridFinder};
pub use params::{BinFitParams, GridFinderParams, TraceParams, GRID_N};
pub use point::{from_fixed, to_fixed, FixedPoint, FIXED_POINT_SCALE};
pub use trace::{next_along_sequence, trace_sequence, TraceState, TracedSequence};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
