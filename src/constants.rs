//! Constants for board geometry, reserved points, and engine defaults.
//!
//! Points are indices into a 1D array with a ring of off-board sentinels,
//! so the reserved handles below live in the top sentinel row and can never
//! collide with a playable point.
//!
//! # Default Board Size
//!
//! The width used by the command-line driver and [`Geometry::default_shared`]
//! is selected with Cargo features:
//! - `board19x19` (default): 19x19 board
//! - `board13x13`: 13x13 board
//! - `board9x9`: 9x9 board
//!
//! ```sh
//! cargo build                                              # 19x19 (default)
//! cargo build --no-default-features --features board9x9    # 9x9
//! ```
//!
//! Any width in `MIN_WIDTH..=MAX_WIDTH` can still be built at run time with
//! [`Geometry::new`].
//!
//! [`Geometry::default_shared`]: crate::geometry::Geometry::default_shared
//! [`Geometry::new`]: crate::geometry::Geometry::new

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board width.
#[cfg(feature = "board9x9")]
pub const DEFAULT_WIDTH: usize = 9;

#[cfg(feature = "board13x13")]
pub const DEFAULT_WIDTH: usize = 13;

#[cfg(feature = "board19x19")]
pub const DEFAULT_WIDTH: usize = 19;

#[cfg(any(
    all(feature = "board9x9", feature = "board13x13"),
    all(feature = "board9x9", feature = "board19x19"),
    all(feature = "board13x13", feature = "board19x19"),
))]
compile_error!("Enable exactly one of 'board9x9', 'board13x13' and 'board19x19'");

#[cfg(not(any(feature = "board9x9", feature = "board13x13", feature = "board19x19")))]
compile_error!("Must enable one board size feature: 'board9x9', 'board13x13' or 'board19x19'");

/// Smallest supported board width.
pub const MIN_WIDTH: usize = 2;

/// Largest supported board width.
pub const MAX_WIDTH: usize = 19;

/// A game may last at most this many times the board area before only
/// passes are accepted. This bounds runaway random playouts; it is not a
/// rule of Go.
pub const GAME_LENGTH_FACTOR: usize = 3;

/// Column labels, skipping 'I' as is customary.
pub const COLUMN_LABELS: &[u8; MAX_WIDTH] = b"ABCDEFGHJKLMNOPQRST";

// =============================================================================
// Reserved Points
// =============================================================================

/// Pass move marker.
pub const PASS: usize = 0;

/// "No point" marker, e.g. when there is no ko point.
pub const NO_POINT: usize = 1;

/// Resign move marker.
pub const RESIGN: usize = 2;

// =============================================================================
// Engine Defaults
// =============================================================================

/// Default komi (compensation points for White).
pub const DEFAULT_KOMI: f64 = 7.5;

/// Seed for the Zobrist tables. Fixed so hashes are reproducible between runs.
pub const ZOBRIST_SEED: u64 = 0x6f72_6567_6f5f_6b6f;

// =============================================================================
// Neighbor Slots
// =============================================================================

/// Slots of the orthogonal neighbors in a neighbor table row.
/// Order: North, East, South, West.
pub const ORTHOGONAL: std::ops::Range<usize> = 0..4;

/// Slots of the diagonal neighbors in a neighbor table row.
/// Order: NE, SE, SW, NW.
pub const DIAGONAL: std::ops::Range<usize> = 4..8;

/// Neighbor table slots in clockwise order starting at north:
/// N, NE, E, SE, S, SW, W, NW. This is the bit order of neighborhood codes.
pub const CLOCKWISE: [usize; 8] = [0, 4, 1, 5, 2, 6, 3, 7];
