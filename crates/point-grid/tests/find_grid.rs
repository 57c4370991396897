use approx::assert_abs_diff_eq;
use nalgebra::Point2;
use point_grid::{
    find_grid, find_grid_with_debug, from_fixed, to_fixed, FixedPoint, GridError, GridFinder,
    GridFinderParams, ProximityGraph, GRID_N,
};

/// Half a fixed-point unit plus slack: the largest rounding error of `to_fixed`.
const ROUNDING_EPS: f64 = 0.05 + 1e-9;

/// Real-valued grid positions, row-major (`v` outer, `u` inner).
fn grid_positions(f: impl Fn(usize, usize) -> (f64, f64)) -> Vec<(f64, f64)> {
    (0..GRID_N)
        .flat_map(|v| (0..GRID_N).map(move |u| (u, v)))
        .map(|(u, v)| f(u, v))
        .collect()
}

fn to_fixed_all(positions: &[(f64, f64)]) -> Vec<FixedPoint> {
    positions.iter().map(|&(x, y)| to_fixed(x, y)).collect()
}

fn expected_from(points: &[FixedPoint]) -> Vec<Point2<f64>> {
    points.iter().map(from_fixed).collect()
}

fn assert_close_to(found: &[Point2<f64>], positions: &[(f64, f64)]) {
    assert_eq!(found.len(), positions.len());
    for (p, &(x, y)) in found.iter().zip(positions) {
        assert_abs_diff_eq!(p.x, x, epsilon = ROUNDING_EPS);
        assert_abs_diff_eq!(p.y, y, epsilon = ROUNDING_EPS);
    }
}

/// Cumulative positions of a row whose gaps grow by `ratio` each step.
fn geometric_offsets(first_gap: f64, ratio: f64) -> Vec<f64> {
    let mut out = vec![0.0];
    let mut gap = first_gap;
    for _ in 1..GRID_N {
        let last = *out.last().unwrap_or(&0.0);
        out.push(last + gap);
        gap *= ratio;
    }
    out
}

#[test]
fn integer_lattice_comes_back_row_major() {
    let points = to_fixed_all(&grid_positions(|u, v| (u as f64, v as f64)));
    let grid = find_grid(&points).expect("10x10 integer lattice");

    assert_eq!(grid.len(), GRID_N * GRID_N);
    for (k, p) in grid.iter().enumerate() {
        assert_eq!(*p, Point2::new((k % GRID_N) as f64, (k / GRID_N) as f64));
    }
}

#[test]
fn perfect_grid_reproduces_input_positions() {
    let points = to_fixed_all(&grid_positions(|u, v| {
        (120.0 + 37.5 * u as f64, 80.0 + 37.5 * v as f64)
    }));
    let grid = find_grid(&points).expect("perfect grid");
    assert_eq!(grid, expected_from(&points));
}

#[test]
fn repeated_runs_are_identical() {
    let points = to_fixed_all(&grid_positions(|u, v| {
        let t = 12f64.to_radians();
        let (x, y) = (24.0 * u as f64, 24.0 * v as f64);
        (300.0 + x * t.cos() - y * t.sin(), 200.0 + x * t.sin() + y * t.cos())
    }));
    let first = find_grid(&points).expect("rotated grid");
    let second = find_grid(&points).expect("rotated grid");
    assert_eq!(first, second);
}

#[test]
fn input_order_does_not_matter() {
    let points = to_fixed_all(&grid_positions(|u, v| {
        (15.0 + 22.0 * u as f64, 40.0 + 22.0 * v as f64)
    }));
    let reference = find_grid(&points).expect("grid");

    let reversed: Vec<FixedPoint> = points.iter().rev().copied().collect();
    assert_eq!(find_grid(&reversed).as_ref(), Some(&reference));

    // 37 is coprime to 100, so this visits every point once.
    let n = points.len();
    let strided: Vec<FixedPoint> = (0..n).map(|i| points[(i * 37) % n]).collect();
    assert_eq!(find_grid(&strided).as_ref(), Some(&reference));
}

#[test]
fn geometrically_growing_spacing_is_accepted() {
    let offsets = geometric_offsets(30.0, 1.05);
    let positions = grid_positions(|u, v| (50.0 + offsets[u], 20.0 + offsets[v]));
    let points = to_fixed_all(&positions);

    let grid = find_grid(&points).expect("geometric spacing");
    assert_eq!(grid, expected_from(&points));
}

#[test]
fn mild_homography_is_accepted() {
    let positions = grid_positions(|u, v| {
        let x = 50.0 + 30.0 * u as f64;
        let y = 40.0 + 30.0 * v as f64;
        let w = 1.0 + 0.0004 * x + 0.0002 * y;
        (x / w, y / w)
    });
    let points = to_fixed_all(&positions);

    let grid = find_grid(&points).expect("perspective grid");
    assert_close_to(&grid, &positions);
}

#[test]
fn thirty_degree_rotation_keeps_axis_labels() {
    let t = 30f64.to_radians();
    let positions = grid_positions(|u, v| {
        let (x, y) = (20.0 * u as f64, 20.0 * v as f64);
        (100.0 + x * t.cos() - y * t.sin(), 50.0 + x * t.sin() + y * t.cos())
    });
    let points = to_fixed_all(&positions);

    let detection = GridFinder::default()
        .detect(&points)
        .expect("30 degree grid");
    assert_close_to(&detection.points, &positions);

    // rows run along +u, columns along +v
    let idx = |u: usize, v: usize| v * GRID_N + u;
    assert_eq!(detection.rows[0][1], idx(1, 0));
    assert_eq!(detection.columns[0][1], idx(0, 1));
}

#[test]
fn missing_interior_point_is_rejected() {
    let mut points = to_fixed_all(&grid_positions(|u, v| (20.0 * u as f64, 20.0 * v as f64)));
    points.remove(4 * GRID_N + 4);

    assert!(find_grid(&points).is_none());
    assert!(GridFinder::default().detect(&points).is_err());
}

#[test]
fn far_noise_points_are_ignored() {
    let lattice = to_fixed_all(&grid_positions(|u, v| (20.0 * u as f64, 20.0 * v as f64)));
    let noise = to_fixed_all(&[
        (-250.0, -200.0),
        (600.0, 35.0),
        (400.0, 700.0),
        (-120.0, 520.0),
        (90.0, 450.0),
    ]);

    // noise both before and after the lattice points
    let mut points = noise[..2].to_vec();
    points.extend_from_slice(&lattice);
    points.extend_from_slice(&noise[2..]);

    let grid = find_grid(&points).expect("grid with noise");
    assert_eq!(grid, expected_from(&lattice));
}

#[test]
fn too_few_points_fail_early() {
    let points = to_fixed_all(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    assert_eq!(
        GridFinder::default().detect(&points),
        Err(GridError::TooFewPoints {
            got: 3,
            need: GRID_N * GRID_N
        })
    );
    assert!(find_grid(&[]).is_none());
}

#[test]
fn adjacency_of_the_wrong_size_is_rejected() {
    let points = to_fixed_all(&grid_positions(|u, v| (10.0 * u as f64, 10.0 * v as f64)));
    let graph = ProximityGraph::build(&points[..GRID_N]);
    assert_eq!(
        GridFinder::default().detect_with_adjacency(&points, &graph),
        Err(GridError::AdjacencyMismatch {
            nodes: GRID_N,
            points: GRID_N * GRID_N
        })
    );
}

#[test]
fn scattered_points_have_no_grid() {
    // a spiral: plenty of points, no straight runs
    let positions: Vec<(f64, f64)> = (0..150)
        .map(|i| {
            let t = i as f64 * 0.7;
            let r = 5.0 + 3.0 * t;
            (r * t.cos(), r * t.sin())
        })
        .collect();
    assert!(find_grid(&to_fixed_all(&positions)).is_none());
}

#[test]
fn strict_lattice_check_accepts_a_clean_grid() {
    let points = to_fixed_all(&grid_positions(|u, v| (10.0 * u as f64, 10.0 * v as f64)));
    let finder = GridFinder::new(GridFinderParams {
        strict_lattice: true,
        ..GridFinderParams::default()
    });
    let detection = finder.detect(&points).expect("strict grid");

    for (r, row) in detection.rows.iter().enumerate() {
        for (c, col) in detection.columns.iter().enumerate() {
            assert_eq!(row[c], col[r]);
        }
    }
}

#[test]
fn debug_flag_does_not_change_the_result() {
    let points = to_fixed_all(&grid_positions(|u, v| (8.0 * u as f64, 8.0 * v as f64)));
    assert_eq!(find_grid_with_debug(&points, true), find_grid(&points));
}
