//! Planar proximity graph over the input points.
//!
//! Neighbors are the points sharing a Delaunay edge, i.e. the points whose
//! Voronoi cells share a boundary. The graph is built once and only read
//! afterwards; each node keeps its neighbors in counter-clockwise order.

use delaunator::{next_halfedge, triangulate, Point as DelaunayPoint, EMPTY};

use crate::point::FixedPoint;

/// Read-only access to "neighbors of point `i`".
///
/// The grid search only relies on this capability; any Voronoi/Delaunay
/// implementation can stand behind it.
pub trait PlanarAdjacency {
    /// Number of nodes (equal to the number of input points).
    fn len(&self) -> usize;

    /// Neighbors of `node`, in a fixed cyclic order.
    fn neighbors(&self, node: usize) -> &[usize];

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Delaunay-based proximity graph with per-node neighbor lists.
#[derive(Clone, Debug, Default)]
pub struct ProximityGraph {
    neighbors: Vec<Vec<usize>>,
}

impl ProximityGraph {
    /// Triangulate `points` and materialize the adjacency.
    ///
    /// Fewer than two points give a graph without edges. Duplicate points are
    /// left unconnected by the triangulation. Fully collinear input has no
    /// triangles; consecutive hull points are linked instead.
    pub fn build(points: &[FixedPoint]) -> Self {
        let mut neighbors = vec![Vec::new(); points.len()];
        if points.len() < 2 {
            return Self { neighbors };
        }

        let coords: Vec<DelaunayPoint> = points
            .iter()
            .map(|p| DelaunayPoint {
                x: f64::from(p.x),
                y: f64::from(p.y),
            })
            .collect();
        let triangulation = triangulate(&coords);

        if triangulation.triangles.is_empty() {
            for pair in triangulation.hull.windows(2) {
                link(&mut neighbors, pair[0], pair[1]);
            }
        } else {
            for e in 0..triangulation.triangles.len() {
                let twin = triangulation.halfedges[e];
                // Interior edges show up twice; take each once.
                if twin != EMPTY && twin < e {
                    continue;
                }
                let a = triangulation.triangles[e];
                let b = triangulation.triangles[next_halfedge(e)];
                link(&mut neighbors, a, b);
            }
        }

        for (node, list) in neighbors.iter_mut().enumerate() {
            sort_counter_clockwise(points, node, list);
        }

        Self { neighbors }
    }

    /// Build a graph from explicit neighbor lists.
    ///
    /// Lists are used as given; callers are responsible for symmetry.
    pub fn from_neighbor_lists(neighbors: Vec<Vec<usize>>) -> Self {
        Self { neighbors }
    }

    /// Total number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }
}

impl PlanarAdjacency for ProximityGraph {
    fn len(&self) -> usize {
        self.neighbors.len()
    }

    fn neighbors(&self, node: usize) -> &[usize] {
        &self.neighbors[node]
    }
}

fn link(neighbors: &mut [Vec<usize>], a: usize, b: usize) {
    if a == b {
        return;
    }
    if !neighbors[a].contains(&b) {
        neighbors[a].push(b);
    }
    if !neighbors[b].contains(&a) {
        neighbors[b].push(a);
    }
}

/// Order neighbors by the angle of `neighbor - node`, starting at +x.
///
/// Voronoi edges around a cell come in this order, and it makes the lists
/// independent of the input order.
fn sort_counter_clockwise(points: &[FixedPoint], node: usize, list: &mut [usize]) {
    let origin = points[node];
    list.sort_by(|&a, &b| {
        let da = points[a] - origin;
        let db = points[b] - origin;
        let ta = f64::from(da.y).atan2(f64::from(da.x)).rem_euclid(std::f64::consts::TAU);
        let tb = f64::from(db.y).atan2(f64::from(db.x)).rem_euclid(std::f64::consts::TAU);
        ta.total_cmp(&tb).then(a.cmp(&b))
    });
}
