//! Bowyer-Watson Delaunay triangulation of a small point neighborhood
//!
//! Points are inserted one at a time into a triangulation seeded with an
//! enclosing super-triangle. Every triangle whose circumcircle contains the new
//! point is removed, and the hole is re-triangulated by connecting its boundary
//! edges to the point. Triangles touching the super-triangle are dropped at the
//! end.
//!
//! All arithmetic is done in `f64` in a frame centered on the point mean, so the
//! result does not degrade for cells far from the origin.

use std::collections::VecDeque;
use std::ops::Index;

use glam::{DVec2, IVec2, Vec3};

use crate::cell::CellPoint;
use crate::geometry::line_intersection;

/// Enlargement of the super-triangle beyond the tight incircle radius
///
/// With a tight super-triangle its vertices can fall inside the circumcircles
/// of real boundary triangles, which then get replaced by super-triangle fans
/// and leave holes in the profile of the center cell.
const SUPER_TRIANGLE_SCALE: f64 = 16.0;

/// Determinant threshold (relative to the squared edge length) for collinearity
const DEGENERATE_EPSILON: f64 = 1e-10;

/// Circle through the three vertices of a triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumcircle {
    /// Circle center in world space (`y` is always 0)
    pub center: Vec3,
    /// Circle radius
    pub radius: f32,
}

impl Circumcircle {
    /// Circumcircle of three points in the x/z plane
    ///
    /// Returns `None` when the points are collinear (or coincident) and no
    /// finite circle exists.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let origin = a.as_dvec3();
        let (center, radius_sq) = circumcircle(
            DVec2::ZERO,
            planar(b.as_dvec3() - origin),
            planar(c.as_dvec3() - origin),
        )?;

        Some(Self {
            center: Vec3::new(
                (origin.x + center.x) as f32,
                0.0,
                (origin.z + center.y) as f32,
            ),
            radius: radius_sq.sqrt() as f32,
        })
    }

    /// Check whether a point lies strictly inside the circle
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        let offset = point - self.center;
        offset.x.hypot(offset.z) < self.radius
    }
}

/// A Delaunay triangle over three lattice sites
///
/// Vertices are wound clockwise in the x/z plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: CellPoint,
    /// Second vertex
    pub b: CellPoint,
    /// Third vertex
    pub c: CellPoint,
    /// Circle through `a`, `b` and `c`
    pub circumcircle: Circumcircle,
    /// Clockwise rotation of the circumcenter around a target cell, in degrees
    ///
    /// Zero as returned by [`triangulate`]; [`sort_clockwise`](super::sort_clockwise)
    /// sets it relative to the profiled cell.
    pub sort_angle: f32,
}

impl Triangle {
    /// All three vertices in winding order
    #[inline]
    pub fn vertices(&self) -> [CellPoint; 3] {
        [self.a, self.b, self.c]
    }

    /// Check whether a lattice cell is one of the vertices
    #[inline]
    pub fn has_vertex(&self, index: IVec2) -> bool {
        self.vertices().iter().any(|v| v.index == index)
    }

    /// The two vertices other than `index`, in winding order
    ///
    /// Returns `None` when `index` is not a vertex of this triangle.
    pub fn others(&self, index: IVec2) -> Option<(CellPoint, CellPoint)> {
        match self.vertices().iter().position(|v| v.index == index)? {
            0 => Some((self.b, self.c)),
            1 => Some((self.c, self.a)),
            _ => Some((self.a, self.b)),
        }
    }

    /// Circumcenter relative to `origin`, recomputed in `f64`
    ///
    /// The vertex offsets from `origin` are exact in `f64`, so this keeps full
    /// precision even when the world-space center does not.
    pub fn circumcenter_relative_to(&self, origin: Vec3) -> Option<Vec3> {
        let origin = origin.as_dvec3();
        let local = |p: &CellPoint| planar(p.position.as_dvec3() - origin);

        let (center, _) = circumcircle(local(&self.a), local(&self.b), local(&self.c))?;
        Some(Vec3::new(center.x as f32, 0.0, center.y as f32))
    }
}

impl Index<usize> for Triangle {
    type Output = CellPoint;

    fn index(&self, i: usize) -> &CellPoint {
        match i {
            0 => &self.a,
            1 => &self.b,
            2 => &self.c,
            _ => panic!("triangle vertex index {} out of range 0..3", i),
        }
    }
}

/// Delaunay triangulation of a set of lattice sites
///
/// # Algorithm
///
/// 1. Seed the triangulation with a super-triangle enclosing every point
/// 2. For each point:
///    a. Mark triangles whose circumcircle strictly contains it
///    b. Keep only the marked triangles edge-connected to the one containing
///       the point, so the hole is a single star-shaped polygon
///    c. Collect the hole boundary by toggling every edge of the removed
///       triangles (shared edges cancel out)
///    d. Connect each boundary edge to the point; collinear triples are skipped
/// 3. Drop every triangle that shares a vertex with the super-triangle
///
/// # Returns
///
/// Triangles over the input points only. Empty for fewer than three points.
pub fn triangulate(points: &[CellPoint]) -> Vec<Triangle> {
    if points.len() < 3 {
        return Vec::new();
    }

    let frame = Frame::new(points);

    let Some(super_triangle) = Working::new(
        [VertexId::Super(0), VertexId::Super(1), VertexId::Super(2)],
        &frame,
    ) else {
        log::warn!("super-triangle is degenerate, skipping triangulation");
        return Vec::new();
    };

    let mut triangles = vec![super_triangle];

    for i in 0..points.len() {
        let id = VertexId::Point(i);
        let point = frame.coord(id);

        let mut bad: Vec<bool> = triangles
            .iter()
            .map(|t| t.circumcircle_contains(point))
            .collect();
        restrict_to_cavity(&triangles, &mut bad, point, &frame);

        let mut boundary: Vec<(VertexId, VertexId)> = Vec::new();
        let mut kept = Vec::with_capacity(triangles.len() + 2);
        for (triangle, is_bad) in triangles.into_iter().zip(bad) {
            if is_bad {
                for (a, b) in triangle.edges() {
                    toggle_edge(&mut boundary, a, b);
                }
            } else {
                kept.push(triangle);
            }
        }

        log::trace!(
            "inserting cell {}: {} cavity edges",
            points[i].index,
            boundary.len()
        );

        for (a, b) in boundary {
            match Working::new([a, b, id], &frame) {
                Some(triangle) => kept.push(triangle),
                None => log::debug!(
                    "skipping degenerate triangle at cell {} (collinear vertices)",
                    points[i].index
                ),
            }
        }

        triangles = kept;
    }

    triangles
        .into_iter()
        .filter_map(|t| t.into_triangle(points, &frame))
        .collect()
}

/// Vertex of a working triangle: an input point or a super-triangle corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum VertexId {
    Point(usize),
    Super(usize),
}

/// Undirected edge key: `(a, b)` and `(b, a)` map to the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeKey(VertexId, VertexId);

impl EdgeKey {
    fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }
}

/// Add an edge to the cavity boundary, or remove it if it is already there
///
/// Edges shared by two removed triangles are interior to the cavity and cancel.
fn toggle_edge(boundary: &mut Vec<(VertexId, VertexId)>, a: VertexId, b: VertexId) {
    let key = EdgeKey::new(a, b);
    match boundary
        .iter()
        .position(|&(x, y)| EdgeKey::new(x, y) == key)
    {
        Some(existing) => {
            boundary.swap_remove(existing);
        }
        None => boundary.push((a, b)),
    }
}

/// Local `f64` coordinates of the input points and the super-triangle
struct Frame {
    origin: Vec3,
    coords: Vec<DVec2>,
    super_coords: [DVec2; 3],
}

impl Frame {
    fn new(points: &[CellPoint]) -> Self {
        let sum: glam::DVec3 = points.iter().map(|p| p.position.as_dvec3()).sum();
        let mean = sum / points.len() as f64;

        let coords: Vec<DVec2> = points
            .iter()
            .map(|p| planar(p.position.as_dvec3() - mean))
            .collect();
        let super_coords = super_triangle(&coords);

        Self {
            origin: mean.as_vec3(),
            coords,
            super_coords,
        }
    }

    #[inline]
    fn coord(&self, id: VertexId) -> DVec2 {
        match id {
            VertexId::Point(i) => self.coords[i],
            VertexId::Super(i) => self.super_coords[i],
        }
    }
}

/// Corners of a triangle enclosing every coordinate with a wide margin
///
/// The triangle is built around the incircle centered on the point mean: three
/// tangent lines (one horizontal below, two diagonals above) are intersected to
/// find its corners.
fn super_triangle(coords: &[DVec2]) -> [DVec2; 3] {
    let center = coords.iter().copied().sum::<DVec2>() / coords.len().max(1) as f64;
    let largest = coords
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0_f64, f64::max);
    let radius = (largest + 1.0) * SUPER_TRIANGLE_SCALE;

    let top_right = center + DVec2::new(radius, radius);
    let top_left = center + DVec2::new(-radius, radius);
    let bottom = center + DVec2::new(0.0, -radius);

    // The construction lines are never parallel; the fallbacks are their exact
    // intersections.
    let top = line_intersection(
        top_right,
        top_right + DVec2::new(-1.0, 1.0),
        top_left,
        top_left + DVec2::new(1.0, 1.0),
    )
    .unwrap_or(center + DVec2::new(0.0, 2.0 * radius));

    let left = line_intersection(
        top_left,
        top_left + DVec2::new(-1.0, -1.0),
        bottom,
        bottom + DVec2::new(-1.0, 0.0),
    )
    .unwrap_or(center + DVec2::new(-3.0 * radius, -radius));

    let right = line_intersection(
        top_right,
        top_right + DVec2::new(1.0, -1.0),
        bottom,
        bottom + DVec2::new(1.0, 0.0),
    )
    .unwrap_or(center + DVec2::new(3.0 * radius, -radius));

    [top, right, left]
}

/// Triangle under construction, in frame coordinates
#[derive(Debug, Clone, Copy)]
struct Working {
    vertices: [VertexId; 3],
    center: DVec2,
    radius_sq: f64,
}

impl Working {
    fn new(vertices: [VertexId; 3], frame: &Frame) -> Option<Self> {
        let [a, b, c] = vertices.map(|v| frame.coord(v));
        let (center, radius_sq) = circumcircle(a, b, c)?;

        // Wind clockwise in the x/z plane
        let vertices = if (b - a).perp_dot(c - a) > 0.0 {
            [vertices[0], vertices[2], vertices[1]]
        } else {
            vertices
        };

        Some(Self {
            vertices,
            center,
            radius_sq,
        })
    }

    #[inline]
    fn circumcircle_contains(&self, point: DVec2) -> bool {
        point.distance_squared(self.center) < self.radius_sq
    }

    fn edges(&self) -> [(VertexId, VertexId); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    fn shares_edge(&self, other: &Working) -> bool {
        self.edges().iter().any(|&(a, b)| {
            let key = EdgeKey::new(a, b);
            other
                .edges()
                .iter()
                .any(|&(x, y)| EdgeKey::new(x, y) == key)
        })
    }

    /// Point-in-triangle test, edges included
    fn contains_point(&self, point: DVec2, frame: &Frame) -> bool {
        let [a, b, c] = self.vertices.map(|v| frame.coord(v));
        let d1 = (b - a).perp_dot(point - a);
        let d2 = (c - b).perp_dot(point - b);
        let d3 = (a - c).perp_dot(point - c);

        let has_negative = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_positive = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_negative && has_positive)
    }

    fn into_triangle(self, points: &[CellPoint], frame: &Frame) -> Option<Triangle> {
        let resolve = |id: VertexId| match id {
            VertexId::Point(i) => Some(points[i]),
            VertexId::Super(_) => None,
        };

        let center = frame.origin.as_dvec3() + glam::DVec3::new(self.center.x, 0.0, self.center.y);

        Some(Triangle {
            a: resolve(self.vertices[0])?,
            b: resolve(self.vertices[1])?,
            c: resolve(self.vertices[2])?,
            circumcircle: Circumcircle {
                center: center.as_vec3(),
                radius: self.radius_sq.sqrt() as f32,
            },
            sort_angle: 0.0,
        })
    }
}

/// Limit the removed triangles to one edge-connected cavity around the point
///
/// Rounding can mark a triangle whose circumcircle passes (almost) exactly
/// through the point even though it is not adjacent to the rest of the
/// cavity. Removing it would leave a hole that no new triangle covers.
fn restrict_to_cavity(triangles: &[Working], bad: &mut [bool], point: DVec2, frame: &Frame) {
    let Some(start) = (0..triangles.len())
        .find(|&i| bad[i] && triangles[i].contains_point(point, frame))
    else {
        return;
    };

    let mut reached = vec![false; triangles.len()];
    reached[start] = true;

    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in 0..triangles.len() {
            if bad[next] && !reached[next] && triangles[current].shares_edge(&triangles[next]) {
                reached[next] = true;
                queue.push_back(next);
            }
        }
    }

    for (flag, reached) in bad.iter_mut().zip(reached) {
        *flag &= reached;
    }
}

#[inline]
fn planar(v: glam::DVec3) -> DVec2 {
    DVec2::new(v.x, v.z)
}

/// Circumcenter and squared radius of three points
///
/// ```text
/// d  = 2 (ax (cz - bz) + bx (az - cz) + cx (bz - az))
/// ux =  (|a|² (cz - bz) + |b|² (az - cz) + |c|² (bz - az)) / d
/// uz = -(|a|² (cx - bx) + |b|² (ax - cx) + |c|² (bx - ax)) / d
/// ```
///
/// The points are shifted so `a` sits at the origin first, which keeps the
/// squared magnitudes small. Returns `None` when `d` vanishes relative to the
/// triangle size (collinear points).
fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> Option<(DVec2, f64)> {
    let shift = a;
    let (a, b, c) = (DVec2::ZERO, b - shift, c - shift);

    let d = 2.0 * (a.x * (c.y - b.y) + b.x * (a.y - c.y) + c.x * (b.y - a.y));
    let scale = b.length_squared().max(c.length_squared()).max((c - b).length_squared());
    if !d.is_finite() || d.abs() <= DEGENERATE_EPSILON * scale {
        return None;
    }

    let a2 = a.length_squared();
    let b2 = b.length_squared();
    let c2 = c.length_squared();

    let ux = (a2 * (c.y - b.y) + b2 * (a.y - c.y) + c2 * (b.y - a.y)) / d;
    let uz = -(a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;

    let center = DVec2::new(ux, uz);
    let radius_sq = center.distance_squared(a);
    if !radius_sq.is_finite() {
        return None;
    }

    Some((center + shift, radius_sq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{point_at, sample_nine};
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn site(x: i32, z: i32, px: f32, pz: f32) -> CellPoint {
        CellPoint::new(IVec2::new(x, z), Vec3::new(px, 0.0, pz), 0.0)
    }

    fn neighborhood(seed: i32, jitter: f32, index: IVec2) -> [CellPoint; 9] {
        let frequency = Vec2::splat(0.1);
        let center = point_at(index, seed, jitter, frequency);
        sample_nine(center, seed, jitter, frequency)
    }

    #[test]
    fn test_circumcircle_right_triangle() {
        let circle = Circumcircle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        )
        .unwrap();

        assert_relative_eq!(circle.center.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(circle.center.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(circle.radius, std::f32::consts::SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn test_circumcircle_passes_through_vertices() {
        let (a, b, c) = (
            Vec3::new(1003.2, 0.0, -498.7),
            Vec3::new(1011.9, 0.0, -495.1),
            Vec3::new(1006.4, 0.0, -487.3),
        );
        let circle = Circumcircle::new(a, b, c).unwrap();
        for v in [a, b, c] {
            assert_relative_eq!(v.distance(circle.center), circle.radius, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let circle = Circumcircle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 2.0),
        );
        assert!(circle.is_none());

        let coincident = Circumcircle::new(Vec3::ONE, Vec3::ONE, Vec3::ZERO);
        assert!(coincident.is_none());
    }

    #[test]
    fn test_edge_key_is_unordered() {
        let a = VertexId::Point(3);
        let b = VertexId::Super(1);
        assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
        assert_ne!(EdgeKey::new(a, b), EdgeKey::new(a, VertexId::Point(4)));
    }

    #[test]
    fn test_toggle_edge_cancels_shared_edges() {
        let (a, b, c) = (VertexId::Point(0), VertexId::Point(1), VertexId::Point(2));
        let mut boundary = Vec::new();
        toggle_edge(&mut boundary, a, b);
        toggle_edge(&mut boundary, b, c);
        toggle_edge(&mut boundary, b, a);
        assert_eq!(boundary, vec![(b, c)]);
    }

    #[test]
    fn test_super_triangle_encloses_points() {
        let nine = neighborhood(1234, 0.4, IVec2::new(12, -3));
        let frame = Frame::new(&nine);
        let sup = Working::new(
            [VertexId::Super(0), VertexId::Super(1), VertexId::Super(2)],
            &frame,
        )
        .unwrap();

        for i in 0..nine.len() {
            assert!(sup.contains_point(frame.coord(VertexId::Point(i)), &frame));
        }
    }

    #[test]
    fn test_triangulate_square() {
        let points = [
            site(0, 0, 0.0, 0.0),
            site(1, 0, 10.0, 0.0),
            site(1, 1, 10.0, 10.0),
            site(0, 1, 0.0, 10.0),
        ];
        let triangles = triangulate(&points);
        assert_eq!(triangles.len(), 2);

        for triangle in &triangles {
            assert_relative_eq!(triangle.circumcircle.center.x, 5.0, epsilon = 1e-4);
            assert_relative_eq!(triangle.circumcircle.center.z, 5.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_triangulate_too_few_points() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&[site(0, 0, 0.0, 0.0), site(1, 0, 1.0, 0.0)]).is_empty());
    }

    #[test]
    fn test_triangulate_collinear_points() {
        let points = [
            site(0, 0, 0.0, 0.0),
            site(1, 0, 10.0, 0.0),
            site(2, 0, 20.0, 0.0),
            site(3, 0, 30.0, 0.0),
        ];
        let triangles = triangulate(&points);
        for triangle in &triangles {
            assert!(triangle.circumcircle.center.is_finite());
            assert!(triangle.circumcircle.radius.is_finite());
        }
        assert!(triangles.is_empty());
    }

    #[test]
    fn test_triangles_wound_clockwise() {
        let nine = neighborhood(42, 0.4, IVec2::new(-5, 8));
        for triangle in triangulate(&nine) {
            let ab = triangle.b.position - triangle.a.position;
            let ac = triangle.c.position - triangle.a.position;
            let cross = ab.x * ac.z - ab.z * ac.x;
            assert!(cross < 0.0, "triangle not clockwise: {:?}", triangle);
        }
    }

    #[test]
    fn test_delaunay_condition_holds() {
        for seed in [1, 1234, 98765, 625141570] {
            let nine = neighborhood(seed, 0.4, IVec2::new(7, 7));
            let triangles = triangulate(&nine);
            assert!(!triangles.is_empty(), "seed {} gave no triangles", seed);

            for triangle in &triangles {
                for point in &nine {
                    if triangle.has_vertex(point.index) {
                        continue;
                    }
                    let distance = point.position.distance(triangle.circumcircle.center);
                    assert!(
                        distance >= triangle.circumcircle.radius - 1e-3,
                        "seed {}: cell {} inside circumcircle of {:?}",
                        seed,
                        point.index,
                        triangle
                    );
                }
            }
        }
    }

    #[test]
    fn test_center_is_surrounded() {
        let nine = neighborhood(1234, 0.4, IVec2::ZERO);
        let triangles = triangulate(&nine);
        let around_center = triangles
            .iter()
            .filter(|t| t.has_vertex(IVec2::ZERO))
            .count();
        assert!(around_center >= 3);
    }

    #[test]
    fn test_others_and_indexing() {
        let triangle = Triangle {
            a: site(0, 0, 0.0, 0.0),
            b: site(0, 1, 0.0, 10.0),
            c: site(1, 0, 10.0, 0.0),
            circumcircle: Circumcircle {
                center: Vec3::new(5.0, 0.0, 5.0),
                radius: 7.07,
            },
            sort_angle: 0.0,
        };

        let (p, q) = triangle.others(IVec2::new(0, 1)).unwrap();
        assert_eq!((p.index, q.index), (IVec2::new(1, 0), IVec2::new(0, 0)));
        assert!(triangle.others(IVec2::new(5, 5)).is_none());
        assert_eq!(triangle[2].index, IVec2::new(1, 0));

        let local = triangle.circumcenter_relative_to(Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(local.x, -5.0, epsilon = 1e-5);
        assert_relative_eq!(local.z, 5.0, epsilon = 1e-5);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let triangle = Triangle {
            a: site(0, 0, 0.0, 0.0),
            b: site(0, 1, 0.0, 10.0),
            c: site(1, 0, 10.0, 0.0),
            circumcircle: Circumcircle {
                center: Vec3::ZERO,
                radius: 1.0,
            },
            sort_angle: 0.0,
        };
        let _ = triangle[3];
    }
}
