//! Geometric utilities for joint-angle measurement.

use nalgebra::Vector2;

use crate::types::Point2D;

/// Angle reported when a joint cannot be measured
pub const SENTINEL_ANGLE: i32 = 180;

/// Products of segment lengths below this are treated as degenerate
const DEGENERATE_NORM: f64 = 1e-6;

/// Round half toward positive infinity, so `-2.5` becomes `-2`
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Calculate angle between two vectors in radians
pub fn angle_between(v1: &Vector2<f64>, v2: &Vector2<f64>) -> Option<f64> {
    let norms = v1.norm() * v2.norm();
    if norms < DEGENERATE_NORM {
        None
    } else {
        Some((v1.dot(v2) / norms).clamp(-1.0, 1.0).acos())
    }
}

/// Interior angle at vertex `b` between rays b→a and b→c, in whole degrees.
///
/// Returns [`SENTINEL_ANGLE`] when any point is missing or either ray is
/// degenerate.
pub fn angle_at(a: Option<Point2D>, b: Option<Point2D>, c: Option<Point2D>) -> i32 {
    let (Some(a), Some(b), Some(c)) = (a, b, c) else {
        return SENTINEL_ANGLE;
    };

    match angle_between(&b.vector_to(&a), &b.vector_to(&c)) {
        Some(radians) => round_half_up(radians.to_degrees()) as i32,
        None => SENTINEL_ANGLE,
    }
}

/// Signed lean of the hip→shoulder line from vertical, in whole degrees.
///
/// Positive when the shoulders sit to the right (+x) of the hips. Image
/// coordinates are assumed (y grows downward). Returns 0 when either midpoint
/// is unavailable.
pub fn trunk_lean(hip_mid: Option<Point2D>, shoulder_mid: Option<Point2D>) -> i32 {
    let (Some(hip), Some(shoulder)) = (hip_mid, shoulder_mid) else {
        return 0;
    };

    let dx = shoulder.x - hip.x;
    let dy = hip.y - shoulder.y;
    round_half_up(dx.atan2(dy).to_degrees()) as i32
}

/// Midpoint of two optional points, if both are present
pub fn midpoint(a: Option<Point2D>, b: Option<Point2D>) -> Option<Point2D> {
    Some(a?.midpoint(&b?))
}
