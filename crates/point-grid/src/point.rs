//! Fixed-point input coordinates.
//!
//! The proximity graph and the tracer work on integer coordinates so that the
//! triangulation sees exact values. Real-valued detections are multiplied by
//! [`FIXED_POINT_SCALE`] and rounded; results are divided back on output.

use nalgebra::{Point2, Vector2};

/// Number of fixed-point units per original coordinate unit (0.1 resolution).
pub const FIXED_POINT_SCALE: i32 = 10;

/// Input point in fixed-point units.
pub type FixedPoint = Point2<i32>;

/// Convert a real-valued coordinate pair into fixed-point units.
///
/// Values are rounded to the nearest unit; out-of-range values saturate.
#[inline]
pub fn to_fixed(x: f64, y: f64) -> FixedPoint {
    let scale = f64::from(FIXED_POINT_SCALE);
    Point2::new((x * scale).round() as i32, (y * scale).round() as i32)
}

/// Convert a fixed-point coordinate back into original units.
#[inline]
pub fn from_fixed(p: &FixedPoint) -> Point2<f64> {
    let scale = f64::from(FIXED_POINT_SCALE);
    Point2::new(f64::from(p.x) / scale, f64::from(p.y) / scale)
}

/// Integer step from `from` to `to`.
#[inline]
pub(crate) fn delta(from: &FixedPoint, to: &FixedPoint) -> Vector2<i32> {
    to - from
}

/// Length of an integer step, computed in `f64`.
#[inline]
pub(crate) fn delta_length(d: &Vector2<i32>) -> f64 {
    f64::from(d.x).hypot(f64::from(d.y))
}

/// Direction of a vector as an undirected angle in degrees, wrapped to `[0, 180)`.
#[inline]
pub(crate) fn spacing_angle_deg(v: &Vector2<f64>) -> f64 {
    v.y.atan2(v.x).to_degrees().rem_euclid(180.0)
}
