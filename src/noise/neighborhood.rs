//! Local 3×3 neighborhoods around a lattice cell

use glam::{IVec2, Vec2};

use super::point_at;
use crate::cell::CellPoint;

/// Offsets of the eight surrounding cells, clockwise starting from straight up
pub const ADJACENT_OFFSETS_CLOCKWISE: [IVec2; 8] = [
    IVec2::new(0, 1),
    IVec2::new(1, 1),
    IVec2::new(1, 0),
    IVec2::new(1, -1),
    IVec2::new(0, -1),
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
];

/// Clockwise neighbor offset by position
///
/// # Panics
///
/// Panics if `i` is not in `0..8`.
#[inline]
pub fn adjacent_offset(i: usize) -> IVec2 {
    assert!(i < 8, "adjacent offset index {} out of range 0..8", i);
    ADJACENT_OFFSETS_CLOCKWISE[i]
}

/// The 3×3 block of cells around `center`
///
/// Entries are row-major over `x, z ∈ {-1, 0, 1}` with `x` as the outer loop,
/// so the middle entry (index 4) is the center cell. That entry is always the
/// caller's `center` itself, never a recomputed copy, so later matching
/// against it is exact.
pub fn sample_nine(center: CellPoint, seed: i32, jitter: f32, frequency: Vec2) -> [CellPoint; 9] {
    std::array::from_fn(|i| {
        let offset = IVec2::new(i as i32 / 3 - 1, i as i32 % 3 - 1);
        if offset == IVec2::ZERO {
            center
        } else {
            point_at(
                IVec2::new(
                    center.index.x.wrapping_add(offset.x),
                    center.index.y.wrapping_add(offset.y),
                ),
                seed,
                jitter,
                frequency,
            )
        }
    })
}
