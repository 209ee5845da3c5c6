//! Jittered Worley point field
//!
//! Turns integer lattice indices into jittered [`CellPoint`]s and answers
//! nearest-cell queries for arbitrary world positions.

pub mod hash;
mod neighborhood;

pub use neighborhood::{adjacent_offset, sample_nine, ADJACENT_OFFSETS_CLOCKWISE};

use glam::{IVec2, Vec2, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::{CellPoint, CellProfile};
use crate::config::WorleyConfig;
use crate::generation;

/// Distance measure used when searching for the nearest cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceFunction {
    /// Manhattan plus squared Euclidean, gives rounded-diamond cells
    Natural,
    /// Sum of absolute axis offsets
    Manhattan,
    /// Squared Euclidean distance
    #[default]
    Euclidean,
}

impl DistanceFunction {
    /// Distance for an offset `(dx, dz)` in lattice units
    #[inline]
    pub fn apply(self, dx: f32, dz: f32) -> f32 {
        match self {
            DistanceFunction::Natural => (dx.abs() + dz.abs()) + (dx * dx + dz * dz),
            DistanceFunction::Manhattan => dx.abs() + dz.abs(),
            DistanceFunction::Euclidean => dx * dx + dz * dz,
        }
    }
}

/// How the distance to the cell edge is derived from the two nearest sites
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeMetric {
    /// Second-nearest distance
    #[default]
    Distance2,
    /// Second plus first
    Distance2Add,
    /// Second minus first (zero on the cell edge)
    Distance2Sub,
    /// Second times first
    Distance2Mul,
    /// First divided by second (one on the cell edge)
    Distance2Div,
}

impl EdgeMetric {
    /// Combine the nearest (`first`) and second-nearest (`second`) distances
    #[inline]
    pub fn combine(self, first: f32, second: f32) -> f32 {
        match self {
            EdgeMetric::Distance2 => second,
            EdgeMetric::Distance2Add => second + first,
            EdgeMetric::Distance2Sub => second - first,
            EdgeMetric::Distance2Mul => second * first,
            EdgeMetric::Distance2Div => first / second,
        }
    }
}

/// Result of a nearest-cell query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestCells {
    /// The cell whose site is closest to the query position
    pub nearest: CellPoint,
    /// The runner-up, i.e. the cell across the nearest edge
    pub second_nearest: CellPoint,
    /// Edge metric of the two distances, in lattice units
    pub distance_to_edge: f32,
}

/// Jittered site of a lattice cell
///
/// Pure function of its arguments: the same inputs always produce a
/// bit-identical position and value.
pub fn point_at(index: IVec2, seed: i32, jitter: f32, frequency: Vec2) -> CellPoint {
    let offset = hash::gradient(hash::hash_2d(seed, index.x, index.y)) * jitter;

    let cell_x = index.x as f32 + offset.x;
    let cell_z = index.y as f32 + offset.y;

    CellPoint {
        index,
        position: Vec3::new(cell_x / frequency.x, 0.0, cell_z / frequency.y),
        value: hash::to_01(hash::value_2d(seed, index.x, index.y)),
    }
}

/// A configured Worley point field
///
/// Cheap to copy; holds no state beyond its configuration, so it can be shared
/// freely between threads.
///
/// # Example
///
/// ```
/// use worley_cells::*;
/// use glam::{IVec2, Vec3};
///
/// let config = WorleyConfigBuilder::new().seed(1234).build().unwrap();
/// let noise = WorleyNoise::from_config(&config);
///
/// let cell = noise.point_at(IVec2::new(3, -2));
/// let found = noise.nearest_cells(cell.position);
/// assert_eq!(found.nearest.index, cell.index);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorleyNoise {
    config: WorleyConfig,
}

impl WorleyNoise {
    /// Create a point field from a configuration
    pub fn from_config(config: &WorleyConfig) -> Self {
        Self { config: *config }
    }

    /// Configuration of this point field
    #[inline]
    pub fn config(&self) -> &WorleyConfig {
        &self.config
    }

    /// Jittered site of a lattice cell
    #[inline]
    pub fn point_at(&self, index: IVec2) -> CellPoint {
        point_at(
            index,
            self.config.seed,
            self.config.jitter,
            self.config.frequency,
        )
    }

    /// The 3×3 block of cells around `center`, row-major, `center` in the middle
    #[inline]
    pub fn sample_nine(&self, center: CellPoint) -> [CellPoint; 9] {
        sample_nine(
            center,
            self.config.seed,
            self.config.jitter,
            self.config.frequency,
        )
    }

    /// Voronoi polygon and neighbor adjacency of a lattice cell
    pub fn cell_profile(&self, index: IVec2) -> CellProfile {
        generation::compute_cell_profile(index, &self.config)
    }

    /// Cell containing a world position
    #[inline]
    pub fn cell_at(&self, position: Vec3) -> CellPoint {
        self.nearest_cells(position).nearest
    }

    /// Nearest and second-nearest cells to a world position
    #[inline]
    pub fn nearest_cells(&self, position: Vec3) -> NearestCells {
        self.nearest_cells_with_frequency(position, self.config.frequency)
    }

    /// Nearest-cell query against the point field scaled by `frequency`
    ///
    /// # Algorithm
    /// 1. Optionally perturb the query position with interpolated gradients
    /// 2. Scale into lattice space and round to the nearest lattice index
    /// 3. Scan the 3×3 block around it, tracking the two closest sites
    /// 4. Combine their distances with the configured edge metric
    pub fn nearest_cells_with_frequency(&self, position: Vec3, frequency: Vec2) -> NearestCells {
        let seed = self.config.seed;
        let jitter = self.config.jitter;

        let mut query = Vec2::new(position.x, position.z);
        if self.config.perturb_amp > 0.0 {
            query = self.perturb(query, frequency);
        }
        let query = query * frequency;

        let rounded_x = query.x.round() as i32;
        let rounded_z = query.y.round() as i32;

        let mut first = (f32::MAX, IVec2::new(rounded_x, rounded_z));
        let mut second = first;

        for dx in -1..=1 {
            for dz in -1..=1 {
                let index = IVec2::new(rounded_x.wrapping_add(dx), rounded_z.wrapping_add(dz));
                let offset = hash::gradient(hash::hash_2d(seed, index.x, index.y)) * jitter;

                let vec_x = index.x as f32 - query.x + offset.x;
                let vec_z = index.y as f32 - query.y + offset.y;
                let distance = self.config.distance_function.apply(vec_x, vec_z);

                if distance < first.0 {
                    second = first;
                    first = (distance, index);
                } else if distance < second.0 {
                    second = (distance, index);
                }
            }
        }

        NearestCells {
            nearest: point_at(first.1, seed, jitter, frequency),
            second_nearest: point_at(second.1, seed, jitter, frequency),
            distance_to_edge: self.config.edge_metric.combine(first.0, second.0),
        }
    }

    /// Displace a query position by bilinearly blended lattice gradients
    fn perturb(&self, position: Vec2, frequency: Vec2) -> Vec2 {
        let seed = self.config.seed;
        let scaled = position * frequency;

        let x0 = scaled.x.floor() as i32;
        let z0 = scaled.y.floor() as i32;
        let x1 = x0.wrapping_add(1);
        let z1 = z0.wrapping_add(1);

        let xs = hash::interp_quintic(scaled.x - scaled.x.floor());
        let zs = hash::interp_quintic(scaled.y - scaled.y.floor());

        let near = hash::gradient(hash::hash_2d(seed, x0, z0))
            .lerp(hash::gradient(hash::hash_2d(seed, x1, z0)), xs);
        let far = hash::gradient(hash::hash_2d(seed, x0, z1))
            .lerp(hash::gradient(hash::hash_2d(seed, x1, z1)), xs);

        position + near.lerp(far, zs) * self.config.perturb_amp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorleyConfigBuilder;

    fn noise(seed: i32, jitter: f32) -> WorleyNoise {
        WorleyConfigBuilder::new()
            .seed(seed)
            .jitter(jitter)
            .unwrap()
            .uniform_frequency(0.1)
            .unwrap()
            .build()
            .unwrap()
            .noise()
    }

    #[test]
    fn test_point_at_determinism() {
        let index = IVec2::new(17, -42);
        let a = point_at(index, 1234, 0.4, Vec2::splat(0.1));
        let b = point_at(index, 1234, 0.4, Vec2::splat(0.1));

        assert_eq!(a.index, b.index);
        assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
        assert_eq!(a.position.z.to_bits(), b.position.z.to_bits());
        assert_eq!(a.value.to_bits(), b.value.to_bits());
        assert_eq!(a.position.y, 0.0);
    }

    #[test]
    fn test_zero_jitter_is_regular_grid() {
        let field = noise(99, 0.0);
        for x in -3..=3 {
            for z in -3..=3 {
                let cell = field.point_at(IVec2::new(x, z));
                assert!((cell.position.x - x as f32 * 10.0).abs() < 1e-4);
                assert!((cell.position.z - z as f32 * 10.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_jitter_stays_within_bound() {
        let field = noise(7, 0.4);
        for x in -10..10 {
            for z in -10..10 {
                let cell = field.point_at(IVec2::new(x, z));
                let lattice = Vec3::new(x as f32 * 10.0, 0.0, z as f32 * 10.0);
                assert!(cell.position.distance(lattice) <= 4.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_different_seeds_move_sites() {
        let a = noise(1, 0.4).point_at(IVec2::new(5, 5));
        let b = noise(2, 0.4).point_at(IVec2::new(5, 5));
        assert_ne!(a.position, b.position);
    }

    #[test]
    fn test_nearest_round_trip() {
        for distance_function in [
            DistanceFunction::Natural,
            DistanceFunction::Manhattan,
            DistanceFunction::Euclidean,
        ] {
            let field = WorleyConfigBuilder::new()
                .seed(4321)
                .jitter(0.45)
                .unwrap()
                .distance_function(distance_function)
                .build()
                .unwrap()
                .noise();

            for x in -8..8 {
                for z in -8..8 {
                    let cell = field.point_at(IVec2::new(x, z));
                    let found = field.nearest_cells(cell.position);
                    assert_eq!(found.nearest.index, cell.index, "{:?}", distance_function);
                    assert_eq!(found.nearest.position, cell.position);
                    assert_eq!(found.nearest.value, cell.value);
                    assert_ne!(found.second_nearest.index, cell.index);
                }
            }
        }
    }

    #[test]
    fn test_second_nearest_is_a_neighbor() {
        let field = noise(555, 0.3);
        let found = field.nearest_cells(Vec3::new(13.0, 0.0, -27.0));
        let offset = found.second_nearest.index - found.nearest.index;
        assert!(offset.x.abs() <= 2 && offset.y.abs() <= 2);
        assert!(found.distance_to_edge >= 0.0);
    }

    #[test]
    fn test_edge_metric_combine() {
        assert_eq!(EdgeMetric::Distance2.combine(1.0, 3.0), 3.0);
        assert_eq!(EdgeMetric::Distance2Add.combine(1.0, 3.0), 4.0);
        assert_eq!(EdgeMetric::Distance2Sub.combine(1.0, 3.0), 2.0);
        assert_eq!(EdgeMetric::Distance2Mul.combine(1.0, 3.0), 3.0);
        assert_eq!(EdgeMetric::Distance2Div.combine(1.0, 4.0), 0.25);
    }

    #[test]
    fn test_distance_functions() {
        assert_eq!(DistanceFunction::Euclidean.apply(3.0, -4.0), 25.0);
        assert_eq!(DistanceFunction::Manhattan.apply(3.0, -4.0), 7.0);
        assert_eq!(DistanceFunction::Natural.apply(3.0, -4.0), 32.0);
    }

    #[test]
    fn test_edge_distance_shrinks_toward_edge() {
        let field = WorleyConfigBuilder::new()
            .seed(8)
            .jitter(0.0)
            .unwrap()
            .edge_metric(EdgeMetric::Distance2Sub)
            .build()
            .unwrap()
            .noise();

        let near_site = field.nearest_cells(Vec3::new(0.5, 0.0, 0.0));
        let near_edge = field.nearest_cells(Vec3::new(4.9, 0.0, 0.0));
        assert!(near_edge.distance_to_edge < near_site.distance_to_edge);
    }

    #[test]
    fn test_perturbation_is_deterministic() {
        let field = WorleyConfigBuilder::new()
            .seed(77)
            .perturb_amp(30.0)
            .unwrap()
            .build()
            .unwrap()
            .noise();

        let position = Vec3::new(12.5, 0.0, 3.25);
        assert_eq!(field.nearest_cells(position), field.nearest_cells(position));

        let moved = field.perturb(Vec2::new(position.x, position.z), Vec2::splat(0.1));
        assert_ne!(moved, Vec2::new(position.x, position.z));
    }
}
