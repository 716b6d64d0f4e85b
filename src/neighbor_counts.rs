//! Packed neighbor counts.
//!
//! For every point the number of black, white and vacant orthogonal
//! neighbors is kept in a single word, three bits per field. Off-board
//! neighbors count as BOTH black and white, so a point on the edge of an
//! empty board has one black, one white and three vacant neighbors. This
//! makes "is this point surrounded by color X" a single mask test, and
//! placing or removing a stone a single addition.

use crate::color::Color;

const MAX_NEIGHBORS: u32 = 4;
const FIELD_SIZE: u32 = 3;
const MASK: u32 = (1 << FIELD_SIZE) - 1;

const fn shift(color: Color) -> u32 {
    color as u32 * FIELD_SIZE
}

/// Adds one black and one white neighbor and removes a vacant one.
const EDGE_INCREMENT: u32 = (1u32 << shift(Color::Black))
    .wrapping_add(1 << shift(Color::White))
    .wrapping_sub(1 << shift(Color::Vacant));

/// Adds a neighbor of the player color and removes a vacant one.
const STONE_INCREMENT: [u32; 2] = [
    (1u32 << shift(Color::Black)).wrapping_sub(1 << shift(Color::Vacant)),
    (1u32 << shift(Color::White)).wrapping_sub(1 << shift(Color::Vacant)),
];

const MAX_COLOR_MASK: [u32; 2] = [
    MAX_NEIGHBORS << shift(Color::Black),
    MAX_NEIGHBORS << shift(Color::White),
];

/// Black, white and vacant neighbor counts of one point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NeighborCounts(u32);

impl Default for NeighborCounts {
    fn default() -> Self {
        Self::FOUR_VACANT
    }
}

impl NeighborCounts {
    /// Counts of an interior point on an empty board.
    pub const FOUR_VACANT: NeighborCounts = NeighborCounts(MAX_NEIGHBORS << shift(Color::Vacant));

    /// Builds counts from explicit values. Each must be at most 4.
    pub fn of_counts(black: u32, white: u32, vacant: u32) -> Self {
        debug_assert!(black <= MAX_NEIGHBORS && white <= MAX_NEIGHBORS && vacant <= MAX_NEIGHBORS);
        NeighborCounts(
            (black << shift(Color::Black))
                | (white << shift(Color::White))
                | (vacant << shift(Color::Vacant)),
        )
    }

    /// Number of neighbors of `color` (black, white or vacant).
    #[inline]
    pub fn count(self, color: Color) -> u32 {
        debug_assert!(color != Color::OffBoard);
        (self.0 >> shift(color)) & MASK
    }

    /// True if all four neighbors are `color` or off-board.
    #[inline]
    pub fn has_max_for(self, color: Color) -> bool {
        let mask = MAX_COLOR_MASK[color.index()];
        self.0 & mask == mask
    }

    /// Records that a vacant neighbor is actually off the board.
    #[inline]
    pub fn add_edge(&mut self) {
        self.0 = self.0.wrapping_add(EDGE_INCREMENT);
    }

    /// A vacant neighbor became a stone of `color`.
    #[inline]
    pub fn add_stone(&mut self, color: Color) {
        self.0 = self.0.wrapping_add(STONE_INCREMENT[color.index()]);
    }

    /// A neighboring stone of `color` was removed.
    #[inline]
    pub fn remove_stone(&mut self, color: Color) {
        self.0 = self.0.wrapping_sub(STONE_INCREMENT[color.index()]);
    }
}
