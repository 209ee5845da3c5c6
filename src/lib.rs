//! Deterministic Worley cell profiles
//!
//! Computes the exact Voronoi polygon of any cell in an infinite jittered
//! Worley point field, on demand and without global state. Each profile lists
//! its polygon corners clockwise from straight up, together with the two
//! neighboring cells that meet at every corner, which is what a mesh builder
//! needs to stitch neighboring cells together.
//!
//! # Quick Start
//!
//! ```rust
//! use worley_cells::*;
//!
//! let config = WorleyConfigBuilder::new()
//!     .seed(1234)
//!     .jitter(0.4).unwrap()
//!     .uniform_frequency(0.1).unwrap()
//!     .build().unwrap();
//!
//! // Profile a single cell
//! let profile = compute_cell_profile(IVec2::new(3, -7), &config);
//! assert!(profile.is_valid());
//!
//! for (corner, pair) in profile.world_vertices().iter().zip(&profile.adjacent_cells) {
//!     println!("{} between {} and {}", corner, pair.c0.index, pair.c1.index);
//! }
//!
//! // Which cell is a world position in?
//! let noise = config.noise();
//! let cell = noise.cell_at(Vec3::new(12.5, 0.0, -40.0));
//! println!("position is in cell {}", cell.index);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): position-to-cell lookups in a [`CellRegion`] using a KD-tree
//! - `parallel`: computes region layers on the rayon thread pool
//! - `serde`: serialization support for configuration and profiles

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod geometry;
pub mod noise;
pub mod generation;
pub mod region;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{WorleyError, Result};
pub use config::{WorleyConfig, WorleyConfigBuilder};
pub use cell::{CellPair, CellPoint, CellProfile};
pub use noise::{DistanceFunction, EdgeMetric, NearestCells, WorleyNoise};
pub use generation::{compute_cell_profile, sort_clockwise, triangulate, Circumcircle, Triangle};
pub use region::CellRegion;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam types for convenience
pub use glam::{IVec2, Vec2, Vec3};
