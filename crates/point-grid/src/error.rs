use crate::candidates::Orientation;

/// Reasons a point set was rejected.
///
/// [`find_grid`](crate::find_grid) collapses all of them into `None`; the
/// detailed variants are available through [`GridFinder::detect`](crate::GridFinder::detect).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("got {got} points, need {need} points")]
    TooFewPoints { got: usize, need: usize },

    #[error("adjacency has {nodes} nodes for {points} points")]
    AdjacencyMismatch { nodes: usize, points: usize },

    #[error("no sequence candidates could be traced")]
    NoCandidates,

    #[error("expected two direction bins, found {found}")]
    NotEnoughAxisBins { found: usize },

    #[error("more than two direction bins qualify as grid axes")]
    TooManyAxisBins,

    #[error("both direction bins resolve to {orientation:?}")]
    SameOrientation { orientation: Orientation },

    #[error("first {orientation:?} sequence disagrees with the other family at position {position}")]
    BoundsMismatch {
        orientation: Orientation,
        position: usize,
    },

    #[error("only {found} sequences cross the first {orientation:?} sequence")]
    IncompleteBounds {
        orientation: Orientation,
        found: usize,
    },

    #[error("expected {expected} horizontal and vertical sequences, got {horizontal} and {vertical}")]
    CountMismatch {
        horizontal: usize,
        vertical: usize,
        expected: usize,
    },

    #[error("row {row} and column {col} do not cross at a shared point")]
    LatticeMismatch { row: usize, col: usize },
}
