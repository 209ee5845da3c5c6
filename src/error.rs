//! Error types for Worley cell generation

use glam::IVec2;

/// Errors that can occur while configuring the point field or checking profiles
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorleyError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fewer than three Delaunay triangles touched the profiled cell
    ///
    /// The polygon is open or empty. Callers usually log and skip the cell.
    #[error("insufficient neighborhood for cell {index}: {vertices} boundary vertices")]
    InsufficientNeighborhood {
        /// Lattice index of the profiled cell
        index: IVec2,
        /// Number of boundary vertices that survived extraction
        vertices: usize,
    },

    /// A profile broke one of its ordering or adjacency invariants
    #[error("invalid profile for cell {index}: {reason}")]
    InvalidProfile {
        /// Lattice index of the profiled cell
        index: IVec2,
        /// What was wrong
        reason: String,
    },
}

/// Result type alias for Worley cell operations
pub type Result<T> = std::result::Result<T, WorleyError>;
