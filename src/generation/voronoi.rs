//! Voronoi cell extraction from a Delaunay triangulation
//!
//! The Voronoi polygon of a site is made of the circumcenters of every Delaunay
//! triangle that has the site as a vertex. Sorting those circumcenters by their
//! clockwise rotation around the site gives the polygon boundary.

use glam::{IVec2, Vec3};

use super::delaunay::Triangle;
use crate::cell::{CellPair, CellPoint, CellProfile};
use crate::geometry::rotation_from_up;

/// Default corner merge distance, as a fraction of the neighborhood size
pub const DEFAULT_MERGE_TOLERANCE: f32 = 1e-3;

/// One polygon corner before merging
#[derive(Debug, Clone, Copy)]
struct Corner {
    /// Circumcenter relative to the profiled cell
    local: Vec3,
    /// The two triangle vertices other than the profiled cell
    others: (CellPoint, CellPoint),
}

/// Triangles around `target`, ordered clockwise from up by circumcenter
///
/// Each returned copy has [`Triangle::sort_angle`] set to the rotation of its
/// circumcenter around `target`. Triangles without `target` as a vertex are
/// dropped.
pub fn sort_clockwise(triangles: &[Triangle], target: CellPoint) -> Vec<Triangle> {
    let mut around: Vec<Triangle> = triangles
        .iter()
        .filter(|triangle| triangle.has_vertex(target.index))
        .map(|triangle| {
            let local = local_circumcenter(triangle, target);
            Triangle {
                sort_angle: rotation_from_up(local, Vec3::ZERO),
                ..*triangle
            }
        })
        .collect();
    around.sort_by(|a, b| a.sort_angle.total_cmp(&b.sort_angle));
    around
}

fn local_circumcenter(triangle: &Triangle, target: CellPoint) -> Vec3 {
    triangle
        .circumcenter_relative_to(target.position)
        .unwrap_or(triangle.circumcircle.center - target.position)
}

/// Build the Voronoi profile of `target` with the default merge tolerance
///
/// See [`extract_with_tolerance`].
pub fn extract(triangles: &[Triangle], target: CellPoint) -> CellProfile {
    extract_with_tolerance(triangles, target, DEFAULT_MERGE_TOLERANCE)
}

/// Build the Voronoi profile of `target`
///
/// # Arguments
///
/// * `triangles` - Delaunay triangles of a neighborhood containing `target`
/// * `target` - The cell to profile
/// * `merge_tolerance` - Corners closer than this fraction of the neighborhood
///   size collapse into one
///
/// # Returns
///
/// The profile with corners in cell-local space, ordered clockwise from up.
/// Cocircular sites (for example the regular grid at zero jitter) produce
/// several triangles with the same circumcenter; those are merged and the
/// merged corner gets the two outermost neighbors of the run. If fewer than
/// three corners remain, the (invalid) profile is still returned and a warning
/// is logged.
pub fn extract_with_tolerance(
    triangles: &[Triangle],
    target: CellPoint,
    merge_tolerance: f32,
) -> CellProfile {
    // Step 1-2: Triangles around the target, clockwise from straight up
    let corners: Vec<Corner> = sort_clockwise(triangles, target)
        .iter()
        .filter_map(|triangle| {
            let others = triangle.others(target.index)?;
            let local = local_circumcenter(triangle, target);
            Some(Corner { local, others })
        })
        .collect();

    // Step 3: Collapse runs of (nearly) coincident corners
    let merge_distance = merge_tolerance * neighborhood_scale(&corners, target);
    let groups = merge_runs(corners, merge_distance);

    // Step 4: One vertex and one neighbor pair per group
    let mut merged: Vec<(f32, Vec3, CellPair)> = groups
        .iter()
        .map(|group| {
            let vertex = group.iter().map(|c| c.local).sum::<Vec3>() / group.len() as f32;
            let (a, b) = outer_neighbors(group);
            (
                rotation_from_up(vertex, Vec3::ZERO),
                vertex,
                CellPair::clockwise(a, b, target.position),
            )
        })
        .collect();
    merged.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (vertices, adjacent_cells): (Vec<Vec3>, Vec<CellPair>) = merged
        .into_iter()
        .map(|(_, vertex, pair)| (vertex, pair))
        .unzip();

    if vertices.len() < 3 {
        log::warn!(
            "cell {} has only {} polygon corners, profile is not closed",
            target.index,
            vertices.len()
        );
    }

    let profile = CellProfile::new(target, vertices, adjacent_cells);
    if profile.vertex_count() >= 3 && !profile.is_valid() {
        log::warn!("cell {} lies on the hull of its neighborhood, profile is open", target.index);
    }
    profile
}

/// Largest distance from the target to any of its Delaunay neighbors
fn neighborhood_scale(corners: &[Corner], target: CellPoint) -> f32 {
    corners
        .iter()
        .flat_map(|c| [c.others.0, c.others.1])
        .map(|cell| cell.position.distance(target.position))
        .fold(0.0, f32::max)
}

/// Group consecutive corners within `merge_distance` of each other
///
/// The boundary is cyclic, so a run at the end that touches the first corner is
/// folded into the first group.
fn merge_runs(corners: Vec<Corner>, merge_distance: f32) -> Vec<Vec<Corner>> {
    let mut groups: Vec<Vec<Corner>> = Vec::new();

    for corner in corners {
        let joins = groups
            .last()
            .and_then(|group| group.last())
            .is_some_and(|last| last.local.distance(corner.local) <= merge_distance);

        match groups.last_mut() {
            Some(group) if joins => group.push(corner),
            _ => groups.push(vec![corner]),
        }
    }

    if groups.len() > 1 {
        let wraps = match (groups.first().and_then(|g| g.first()), groups.last().and_then(|g| g.last())) {
            (Some(first), Some(last)) => first.local.distance(last.local) <= merge_distance,
            _ => false,
        };
        if wraps {
            if let Some(mut tail) = groups.pop() {
                tail.append(&mut groups[0]);
                groups[0] = tail;
            }
        }
    }

    groups
}

/// The two neighbors bounding a run of merged corners
///
/// Inside a run of triangles fanned around the target, every interior neighbor
/// appears in two triangles and the two outermost ones appear once. A single
/// triangle is its own run.
fn outer_neighbors(group: &[Corner]) -> (CellPoint, CellPoint) {
    let first = group[0].others;
    if group.len() == 1 {
        return first;
    }

    let mut counts: Vec<(CellPoint, usize)> = Vec::new();
    for corner in group {
        for cell in [corner.others.0, corner.others.1] {
            match counts.iter_mut().find(|(c, _)| c.index == cell.index) {
                Some((_, count)) => *count += 1,
                None => counts.push((cell, 1)),
            }
        }
    }

    let singles: Vec<CellPoint> = counts
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(cell, _)| cell)
        .collect();

    match singles.as_slice() {
        [a, b] => (*a, *b),
        _ => {
            log::debug!(
                "merged corner has {} outer neighbors, keeping first triangle's pair",
                singles.len()
            );
            first
        }
    }
}

/// Lattice indices of all Delaunay neighbors of `index`
pub fn delaunay_neighbors(triangles: &[Triangle], index: IVec2) -> Vec<IVec2> {
    let mut neighbors: Vec<IVec2> = triangles
        .iter()
        .filter_map(|t| t.others(index))
        .flat_map(|(a, b)| [a.index, b.index])
        .collect();
    neighbors.sort_by_key(|n| (n.x, n.y));
    neighbors.dedup();
    neighbors
}
