//! Planar vector helpers shared by the triangulator and the extractor
//!
//! Cell geometry lives in the x/z plane with `y == 0`, so most helpers take
//! [`Vec3`] and read only the `x` and `z` components.

use glam::{DVec2, Vec2, Vec3};

/// The fixed reference direction that clockwise angles are measured from
pub const UP: Vec2 = Vec2::new(0.0, 1.0);

/// Project a point in the x/z plane to 2D
#[inline]
pub fn flat(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Unsigned angle between two directions, in degrees [0, 180]
///
/// Returns 0.0 when either vector has zero length.
pub fn angle(from: Vec2, to: Vec2) -> f32 {
    let from = from.as_dvec2();
    let to = to.as_dvec2();

    let denominator = from.length() * to.length();
    if denominator == 0.0 {
        return 0.0;
    }

    let cos = (from.dot(to) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees() as f32
}

/// Clockwise angle from `from` to `to`, in degrees [0, 360)
///
/// The unsigned angle is folded into a full turn using the sign of the 2D
/// cross product `from.x * to.y - from.y * to.x`.
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    let unsigned = angle(from, to);
    let sign = from.perp_dot(to);

    let folded = if sign < 0.0 { 360.0 - unsigned } else { unsigned };
    if folded >= 360.0 {
        folded - 360.0
    } else {
        folded
    }
}

/// Clockwise rotation of `position` around `center`, measured from [`UP`]
///
/// Straight up (+z) is 0°, +x is 90°, -z is 180° and -x is 270°.
#[inline]
pub fn rotation_from_up(position: Vec3, center: Vec3) -> f32 {
    signed_angle(flat(position - center), UP)
}

/// Arithmetic mean of a set of points (zero for an empty slice)
pub fn mean_point(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return Vec3::ZERO;
    }
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

/// Point halfway between `a` and `b`
#[inline]
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}

/// Intersection of the infinite lines through `a1..a2` and `b1..b2`
///
/// Returns `None` for parallel lines.
pub fn line_intersection(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> Option<DVec2> {
    let a = a2 - a1;
    let b = b2 - b1;

    let denominator = b.x * a.y - b.y * a.x;
    if denominator == 0.0 {
        return None;
    }

    let mu = ((a1.x - b1.x) * a.y - (a1.y - b1.y) * a.x) / denominator;
    Some(b1 + b * mu)
}
