//! Zobrist hashing of board positions.
//!
//! Each (player color, point) pair gets a random 64-bit value, and each
//! point gets one more value used when it is the simple ko point. A board's
//! running hash is the XOR of the values of its stones and of its ko point.
//! `NO_POINT` and off-board indices map to zero, so XORing in "no ko point"
//! leaves a hash unchanged.

use crate::color::Color;
use crate::constants::NO_POINT;
use crate::geometry::Point;

/// Random values for one board geometry.
#[derive(Clone, Debug)]
pub struct Zobrist {
    stones: [Vec<u64>; 2],
    ko: Vec<u64>,
}

impl Zobrist {
    /// Draws values for every point in `on_board` from a generator seeded with `seed`.
    pub fn new(len: usize, on_board: impl IntoIterator<Item = Point>, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut stones = [vec![0u64; len], vec![0u64; len]];
        let mut ko = vec![0u64; len];
        for p in on_board {
            stones[0][p] = rng.u64(..);
            stones[1][p] = rng.u64(..);
            ko[p] = rng.u64(..);
        }
        debug_assert_eq!(ko[NO_POINT], 0);
        Self { stones, ko }
    }

    /// Value of a stone of `color` at `p`.
    #[inline]
    pub fn stone(&self, color: Color, p: Point) -> u64 {
        self.stones[color.index()][p]
    }

    /// Value of `p` being the simple ko point; zero for `NO_POINT`.
    #[inline]
    pub fn ko(&self, p: Point) -> u64 {
        self.ko[p]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let a = Zobrist::new(16, 5..11, 42);
        let b = Zobrist::new(16, 5..11, 42);
        for p in 5..11 {
            assert_eq!(a.stone(Color::Black, p), b.stone(Color::Black, p));
            assert_ne!(a.stone(Color::Black, p), a.stone(Color::White, p));
        }
    }

    #[test]
    fn test_no_point_is_neutral() {
        let z = Zobrist::new(16, 5..11, 7);
        assert_eq!(z.ko(NO_POINT), 0);
        assert_ne!(z.ko(5), 0);
    }
}
