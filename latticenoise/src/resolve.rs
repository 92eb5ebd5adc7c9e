//! Wraparound coordinate resolution.
//!
//! Maps a real coordinate onto a lattice axis that repeats forever in both
//! directions. `x` and `x + k * dim_length` land on the same cell with the
//! same fractional remainder.

use std::num::NonZeroU32;

/// A coordinate split into a wrapped cell index and the position inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    /// Cell index in `[0, dim_length)`.
    pub base: u32,
    /// Fraction of the way to the next cell, in `[0, 1)`.
    pub ratio: f32,
}

impl Resolved {
    /// Index `offset` cells away from `base`, wrapped into `[0, dim_length)`.
    #[inline]
    pub fn neighbor(self, offset: i64, dim_length: NonZeroU32) -> u32 {
        wrap(i64::from(self.base) + offset, dim_length)
    }
}

/// Resolve `x` against an axis of `dim_length` cells.
pub fn resolve(x: f32, dim_length: NonZeroU32) -> Resolved {
    let floor = x.floor();
    let mut ratio = x - floor;
    // Non-finite input has no meaningful position; pin it to the origin.
    let mut cell = if floor.is_finite() { floor as i64 } else { 0 };
    if !ratio.is_finite() {
        ratio = 0.0;
    }

    // Tiny negative inputs round `x - floor` up to exactly 1.0.
    if ratio >= 1.0 {
        cell += 1;
        ratio = 0.0;
    }

    Resolved {
        base: wrap(cell, dim_length),
        ratio,
    }
}

#[inline]
fn wrap(cell: i64, dim_length: NonZeroU32) -> u32 {
    cell.rem_euclid(i64::from(dim_length.get())) as u32
}
