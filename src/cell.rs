//! Worley cell structures
//!
//! [`CellPoint`] is a single jittered lattice site. [`CellProfile`] is one
//! cell's Voronoi polygon together with the neighboring cells that border each
//! polygon corner.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use glam::{IVec2, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorleyError};
use crate::geometry::{flat, rotation_from_up};

/// A jittered lattice site
///
/// Created on demand from the seed, lattice index, jitter and frequency; two
/// points compare equal when they share a lattice `index`, regardless of the
/// floating point position.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct CellPoint {
    /// Integer lattice coordinate identifying the cell
    pub index: IVec2,

    /// Jittered site position in world space (`y` is always 0)
    pub position: Vec3,

    /// Per-cell scalar in [0, 1], useful for coloring or random choices
    pub value: f32,
}

impl CellPoint {
    /// Create a cell point
    pub fn new(index: IVec2, position: Vec3, value: f32) -> Self {
        Self {
            index,
            position,
            value,
        }
    }

    /// Order two cells by their scalar value
    pub fn cmp_value(&self, other: &CellPoint) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

impl PartialEq for CellPoint {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for CellPoint {}

impl Hash for CellPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

/// The two neighboring cells that meet at one corner of a cell polygon
///
/// `c0` is the cell with the smaller clockwise rotation from up, measured
/// around the profiled cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPair {
    /// First neighbor (smaller rotation from up)
    pub c0: CellPoint,
    /// Second neighbor
    pub c1: CellPoint,
}

impl CellPair {
    /// Create a pair with its entries in the given order
    pub fn new(c0: CellPoint, c1: CellPoint) -> Self {
        Self { c0, c1 }
    }

    /// Create a pair ordered by clockwise rotation around `center`
    pub fn clockwise(a: CellPoint, b: CellPoint, center: Vec3) -> Self {
        let wrong_way = rotation_from_up(a.position, center) > rotation_from_up(b.position, center);
        if wrong_way {
            Self::new(b, a)
        } else {
            Self::new(a, b)
        }
    }

    /// Check whether either entry is the given lattice index
    #[inline]
    pub fn contains(&self, index: IVec2) -> bool {
        self.c0.index == index || self.c1.index == index
    }

    /// Cell shared with another pair, if any
    pub fn shared_with(&self, other: &CellPair) -> Option<CellPoint> {
        [self.c0, self.c1]
            .into_iter()
            .find(|cell| other.contains(cell.index))
    }
}

/// Voronoi polygon of one Worley cell
///
/// Each corner `vertices[i]` is the circumcenter of a Delaunay triangle formed
/// by the profiled cell and the two cells in `adjacent_cells[i]`. Corners are
/// stored in cell-local space (relative to `cell.position`), ordered clockwise
/// starting from straight up, and the boundary closes from the last corner back
/// to the first.
///
/// A profile with fewer than three corners is returned for sparse or
/// degenerate neighborhoods instead of failing; check [`CellProfile::is_valid`]
/// before walking the polygon.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CellProfile {
    /// The profiled cell
    pub cell: CellPoint,

    /// Polygon corners, cell-local, clockwise
    pub vertices: Vec<Vec3>,

    /// Neighbor pair for each corner (same length as `vertices`)
    pub adjacent_cells: Vec<CellPair>,

    /// Mean of all corners, cell-local
    pub mean_point: Vec3,
}

impl CellProfile {
    /// Create a profile from already ordered corners
    pub fn new(cell: CellPoint, vertices: Vec<Vec3>, adjacent_cells: Vec<CellPair>) -> Self {
        let mean_point = crate::geometry::mean_point(&vertices);
        Self {
            cell,
            vertices,
            adjacent_cells,
            mean_point,
        }
    }

    /// Whether the profile describes a closed polygon around its site
    ///
    /// Besides the corner count, every pair of consecutive corners (including
    /// last to first) must share a neighbor and the site must lie inside. Sites
    /// on the hull of their neighborhood (large jitter) only get an open fan of
    /// corners and fail here.
    pub fn is_valid(&self) -> bool {
        self.has_polygon_shape() && self.open_edge().is_none() && self.polygon_contains(Vec3::ZERO)
    }

    /// At least three corners, one neighbor pair per corner
    #[inline]
    fn has_polygon_shape(&self) -> bool {
        self.vertices.len() >= 3 && self.vertices.len() == self.adjacent_cells.len()
    }

    /// First corner whose edge to the next corner borders no shared neighbor
    fn open_edge(&self) -> Option<usize> {
        (0..self.adjacent_cells.len()).find(|&i| self.edge_neighbor(i).is_none())
    }

    /// Number of polygon corners
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Polygon corners translated back to world space
    pub fn world_vertices(&self) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|&v| v + self.cell.position)
            .collect()
    }

    /// Cell bordering the edge from corner `i` to corner `i + 1`
    ///
    /// Two consecutive corners share exactly one neighbor: the cell on the far
    /// side of the edge between them.
    pub fn edge_neighbor(&self, i: usize) -> Option<CellPoint> {
        let n = self.adjacent_cells.len();
        if n == 0 {
            return None;
        }
        let current = self.adjacent_cells.get(i)?;
        let next = &self.adjacent_cells[(i + 1) % n];
        current.shared_with(next)
    }

    /// Lattice indices of every neighbor that touches the polygon, sorted
    pub fn neighbor_indices(&self) -> Vec<IVec2> {
        let unique: BTreeSet<(i32, i32)> = self
            .adjacent_cells
            .iter()
            .flat_map(|pair| [pair.c0.index, pair.c1.index])
            .map(|index| (index.x, index.y))
            .collect();

        unique.into_iter().map(|(x, y)| IVec2::new(x, y)).collect()
    }

    /// Check if the given cell touches this polygon
    #[inline]
    pub fn is_neighbor_of(&self, index: IVec2) -> bool {
        self.adjacent_cells.iter().any(|pair| pair.contains(index))
    }

    /// Polygon area in the x/z plane
    pub fn area(&self) -> f32 {
        if self.vertices.len() < 3 {
            return 0.0;
        }

        let mut twice_area = 0.0;
        for i in 0..self.vertices.len() {
            let v1 = flat(self.vertices[i]);
            let v2 = flat(self.vertices[(i + 1) % self.vertices.len()]);
            twice_area += v1.perp_dot(v2);
        }

        twice_area.abs() * 0.5
    }

    /// Check whether a cell-local point lies inside the polygon (edges included)
    pub fn contains_local(&self, point: Vec3) -> bool {
        self.has_polygon_shape() && self.polygon_contains(point)
    }

    fn polygon_contains(&self, point: Vec3) -> bool {
        let p = flat(point);
        let n = self.vertices.len();
        (0..n).all(|i| {
            let a = flat(self.vertices[i]);
            let b = flat(self.vertices[(i + 1) % n]);
            // Clockwise winding keeps the interior on the right of every edge
            (b - a).perp_dot(p - a) <= 1e-4 * (b - a).length().max(1.0)
        })
    }

    /// Check the ordering and adjacency invariants
    ///
    /// # Errors
    ///
    /// Returns `InsufficientNeighborhood` for polygons with fewer than three
    /// corners. Returns `InvalidProfile` when corners are out of clockwise
    /// order, a pair repeats a cell or names the profiled cell, two consecutive
    /// corners share no neighbor, or the site lies outside the polygon.
    pub fn validate(&self) -> Result<()> {
        let index = self.cell.index;
        let invalid = |reason: String| WorleyError::InvalidProfile { index, reason };

        if self.vertices.len() < 3 {
            return Err(WorleyError::InsufficientNeighborhood {
                index,
                vertices: self.vertices.len(),
            });
        }

        if self.vertices.len() != self.adjacent_cells.len() {
            return Err(invalid(format!(
                "{} vertices but {} adjacent pairs",
                self.vertices.len(),
                self.adjacent_cells.len()
            )));
        }

        let angles: Vec<f32> = self
            .vertices
            .iter()
            .map(|&v| rotation_from_up(v, Vec3::ZERO))
            .collect();
        if let Some(i) = angles.windows(2).position(|w| w[1] <= w[0]) {
            return Err(invalid(format!(
                "vertex {} at {:.3}° does not follow {:.3}° clockwise",
                i + 1,
                angles[i + 1],
                angles[i]
            )));
        }

        for (i, pair) in self.adjacent_cells.iter().enumerate() {
            if pair.c0.index == pair.c1.index {
                return Err(invalid(format!("pair {} repeats cell {}", i, pair.c0.index)));
            }
            if pair.contains(index) {
                return Err(invalid(format!("pair {} contains the profiled cell", i)));
            }
        }

        if let Some(i) = self.open_edge() {
            return Err(invalid(format!(
                "corners {} and {} share no neighbor, polygon is open",
                i,
                (i + 1) % self.vertices.len()
            )));
        }

        if !self.polygon_contains(Vec3::ZERO) {
            return Err(invalid("site lies outside its polygon".to_string()));
        }

        Ok(())
    }
}
