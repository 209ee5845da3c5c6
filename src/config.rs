//! Worley point-field configuration and builder
//!
//! This module provides the configuration type for deterministic cell profile
//! generation.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorleyError};
use crate::noise::{DistanceFunction, EdgeMetric, WorleyNoise};

/// Configuration for a deterministic jittered point field
///
/// The same configuration always produces the identical point field and
/// therefore identical cell profiles for every lattice index.
///
/// # Example
///
/// ```rust
/// use worley_cells::*;
///
/// let config = WorleyConfigBuilder::new()
///     .seed(1234)
///     .jitter(0.4)
///     .unwrap()
///     .uniform_frequency(0.1)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: WorleyConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorleyConfig {
    /// Seed selecting the hash output stream (always non-negative)
    ///
    /// Changing the seed changes the whole point field.
    pub seed: i32,

    /// Fraction of a cell each site may be displaced, in [0, 1]
    ///
    /// - 0.0: perfectly regular square grid
    /// - 0.3-0.45: irregular but well-behaved cells (recommended)
    /// - above 0.5: sites may leave their own lattice square and cells can
    ///   degenerate; a site on the hull of its 3×3 neighborhood gets an open
    ///   profile that fails [`CellProfile::validate`](crate::CellProfile::validate)
    pub jitter: f32,

    /// Inverse spatial scale per axis (x, z); one cell spans `1 / frequency`
    pub frequency: Vec2,

    /// Distance used by nearest-cell queries (does not affect profiles)
    pub distance_function: DistanceFunction,

    /// How nearest-cell queries combine the first and second distances
    pub edge_metric: EdgeMetric,

    /// Gradient perturbation applied to nearest-cell query positions
    ///
    /// 0.0 disables perturbation. Profiles are never perturbed.
    pub perturb_amp: f32,

    /// Profile corners closer than this fraction of the neighborhood size are
    /// merged
    ///
    /// Removes zero-length and near zero-length polygon edges, which appear
    /// wherever four or more sites are (nearly) cocircular. Genuine Voronoi
    /// edges shorter than the tolerance are removed too: the two cells across
    /// such an edge no longer list each other in `adjacent_cells`. Use 0.0 to
    /// keep every edge of a jittered field.
    pub merge_tolerance: f32,
}

impl WorleyConfig {
    /// Size of one lattice cell in world units, per axis
    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        Vec2::ONE / self.frequency
    }

    /// Build the point field described by this configuration
    #[inline]
    pub fn noise(&self) -> WorleyNoise {
        WorleyNoise::from_config(self)
    }
}

impl Default for WorleyConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            jitter: WorleyConfigBuilder::DEFAULT_JITTER,
            frequency: Vec2::splat(WorleyConfigBuilder::DEFAULT_FREQUENCY),
            distance_function: DistanceFunction::default(),
            edge_metric: EdgeMetric::default(),
            perturb_amp: 0.0,
            merge_tolerance: WorleyConfigBuilder::DEFAULT_MERGE_TOLERANCE,
        }
    }
}

/// Builder for creating WorleyConfig with validation
///
/// # Example
///
/// ```rust
/// use worley_cells::*;
///
/// // Use defaults (random seed)
/// let config = WorleyConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = WorleyConfigBuilder::new()
///     .seed(12345)
///     .jitter(0.3)
///     .unwrap()
///     .frequency(glam::Vec2::new(0.075, 0.075))
///     .unwrap()
///     .distance_function(DistanceFunction::Euclidean)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct WorleyConfigBuilder {
    seed: Option<i32>,
    jitter: f32,
    frequency: Vec2,
    distance_function: DistanceFunction,
    edge_metric: EdgeMetric,
    perturb_amp: f32,
    merge_tolerance: f32,
}

impl WorleyConfigBuilder {
    const DEFAULT_JITTER: f32 = 0.4;
    const DEFAULT_FREQUENCY: f32 = 0.1;
    const DEFAULT_MERGE_TOLERANCE: f32 = crate::generation::DEFAULT_MERGE_TOLERANCE;

    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - jitter: 0.4
    /// - frequency: (0.1, 0.1), i.e. cells 10 units wide
    /// - distance_function: Euclidean
    /// - edge_metric: Distance2
    /// - perturb_amp: 0.0
    /// - merge_tolerance: 0.001 of the neighborhood size
    pub fn new() -> Self {
        Self {
            seed: None,
            jitter: Self::DEFAULT_JITTER,
            frequency: Vec2::splat(Self::DEFAULT_FREQUENCY),
            distance_function: DistanceFunction::default(),
            edge_metric: EdgeMetric::default(),
            perturb_amp: 0.0,
            merge_tolerance: Self::DEFAULT_MERGE_TOLERANCE,
        }
    }

    /// Set the seed
    ///
    /// Negative seeds are folded to their absolute value, so `-5` and `5`
    /// select the same point field.
    pub fn seed(mut self, seed: i32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the jitter amount
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if jitter is outside [0, 1]
    pub fn jitter(mut self, jitter: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&jitter) {
            return Err(WorleyError::InvalidConfig(format!(
                "jitter must be in [0, 1] (got {})",
                jitter
            )));
        }
        self.jitter = jitter;
        Ok(self)
    }

    /// Set a per-axis frequency
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either component is not a positive finite number
    pub fn frequency(mut self, frequency: Vec2) -> Result<Self> {
        let valid = |f: f32| f.is_finite() && f > 0.0;
        if !valid(frequency.x) || !valid(frequency.y) {
            return Err(WorleyError::InvalidConfig(format!(
                "frequency must be positive and finite (got {})",
                frequency
            )));
        }
        self.frequency = frequency;
        Ok(self)
    }

    /// Set the same frequency on both axes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if frequency is not a positive finite number
    pub fn uniform_frequency(self, frequency: f32) -> Result<Self> {
        self.frequency(Vec2::splat(frequency))
    }

    /// Set the distance function used by nearest-cell queries
    pub fn distance_function(mut self, distance_function: DistanceFunction) -> Self {
        self.distance_function = distance_function;
        self
    }

    /// Set how nearest-cell queries report the distance to the cell edge
    pub fn edge_metric(mut self, edge_metric: EdgeMetric) -> Self {
        self.edge_metric = edge_metric;
        self
    }

    /// Set the query perturbation amplitude
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the amplitude is negative or not finite
    pub fn perturb_amp(mut self, amplitude: f32) -> Result<Self> {
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(WorleyError::InvalidConfig(format!(
                "perturbation amplitude must be >= 0 (got {})",
                amplitude
            )));
        }
        self.perturb_amp = amplitude;
        Ok(self)
    }

    /// Set the corner merge tolerance
    ///
    /// The tolerance is a fraction of the distance from a cell to its farthest
    /// Delaunay neighbor. Short real edges below it vanish along with the
    /// adjacency they carry, so both cells across the edge drop each other.
    ///
    /// - 0.0: only merge corners that coincide exactly
    /// - 0.001: default
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the tolerance is outside [0, 0.5)
    pub fn merge_tolerance(mut self, tolerance: f32) -> Result<Self> {
        if !(0.0..0.5).contains(&tolerance) {
            return Err(WorleyError::InvalidConfig(format!(
                "merge tolerance must be in [0, 0.5) (got {})",
                tolerance
            )));
        }
        self.merge_tolerance = tolerance;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<WorleyConfig> {
        let seed = self.seed.unwrap_or_else(rand::random::<i32>);
        let seed = seed.checked_abs().unwrap_or(i32::MAX);

        Ok(WorleyConfig {
            seed,
            jitter: self.jitter,
            frequency: self.frequency,
            distance_function: self.distance_function,
            edge_metric: self.edge_metric,
            perturb_amp: self.perturb_amp,
            merge_tolerance: self.merge_tolerance,
        })
    }
}

impl Default for WorleyConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
