//! Cell profile generation
//!
//! Builds the Voronoi polygon of a single Worley cell from its 3×3
//! neighborhood: the nine jittered sites are Delaunay-triangulated and the
//! circumcenters around the center site become the polygon corners.

mod delaunay;
mod voronoi;

pub use delaunay::{triangulate, Circumcircle, Triangle};
pub use voronoi::{
    delaunay_neighbors, extract, extract_with_tolerance, sort_clockwise, DEFAULT_MERGE_TOLERANCE,
};

use glam::IVec2;

use crate::cell::CellProfile;
use crate::config::WorleyConfig;
use crate::noise::{point_at, sample_nine};

/// Compute the Voronoi profile of the cell at `index`
///
/// The result depends only on `index` and the configuration, so the same cell
/// always yields the same profile no matter which neighbor asked for it.
///
/// Sparse or degenerate neighborhoods, and sites pushed onto the hull of their
/// neighborhood by large jitter, return a profile that is not a closed polygon;
/// check [`CellProfile::is_valid`].
pub fn compute_cell_profile(index: IVec2, config: &WorleyConfig) -> CellProfile {
    // Step 1: The center site
    let cell = point_at(index, config.seed, config.jitter, config.frequency);

    // Step 2: Its 3×3 neighborhood
    let neighborhood = sample_nine(cell, config.seed, config.jitter, config.frequency);

    // Step 3: Delaunay triangulation
    let triangles = delaunay::triangulate(&neighborhood);

    // Step 4: Voronoi polygon of the center
    voronoi::extract_with_tolerance(&triangles, cell, config.merge_tolerance)
}
