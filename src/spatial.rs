//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over cell sites in the x/z plane
///
/// With Euclidean distance the nearest site to a position is exactly the Worley
/// cell that contains it, so this turns world positions (clicks, raycasts, unit
/// positions) into cells of a region.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
    len: usize,
}

impl SpatialIndex {
    /// Build a spatial index from cell site positions
    ///
    /// Only the x and z components are used.
    ///
    /// # Example
    ///
    /// ```
    /// use worley_cells::*;
    ///
    /// let sites = vec![
    ///     Vec3::new(0.0, 0.0, 0.0),
    ///     Vec3::new(10.0, 0.0, 0.0),
    ///     Vec3::new(0.0, 0.0, 10.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Vec3::new(8.0, 0.0, 1.0)), Some(1));
    /// ```
    pub fn new(sites: &[Vec3]) -> Self {
        let points: Vec<[f32; 2]> = sites.iter().map(|s| [s.x, s.z]).collect();

        // kiddo does not build empty immutable trees
        let tree = (!points.is_empty()).then(|| ImmutableKdTree::new_from_slice(&points));

        Self {
            tree,
            len: points.len(),
        }
    }

    /// Number of indexed sites
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no sites
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position in the input slice of the site nearest to `position`
    ///
    /// Returns `None` for an empty index.
    pub fn find_nearest(&self, position: Vec3) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let query = [position.x, position.z];
        let result = tree.nearest_one::<SquaredEuclidean>(&query);
        Some(result.item as usize)
    }
}
