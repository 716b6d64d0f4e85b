//! go-board: an incremental rules engine for the game of Go.
//!
//! The crate tracks stones, chains, liberties, captures, simple ko and
//! positional superko, and answers the cheap local questions that move
//! generators ask on every candidate move. Boards are meant to be copied and
//! mutated many thousands of times per second by independent playout
//! threads, so nothing on the move path allocates.
//!
//! ## Modules
//!
//! - [`constants`] - Board sizes, reserved points and engine defaults
//! - [`geometry`] - The padded 1D point space and its lookup tables
//! - [`board`] - Move legality, placement, captures, ko, scoring
//! - [`pattern`] - 3x3 neighborhood codes and their diagrams
//! - [`color`], [`neighbor_counts`], [`point_set`], [`superko`], [`zobrist`] -
//!   The building blocks the board is made of
//!
//! ## Example
//!
//! ```
//! use go_board::{Board, Color, PlayStatus};
//!
//! let mut board = Board::with_width(9).unwrap();
//! let e5 = board.point("E5").unwrap();
//! assert_eq!(board.play(e5), PlayStatus::Ok);
//! assert_eq!(board.color(e5), Color::Black);
//! assert_eq!(board.play(e5), PlayStatus::Occupied);
//! assert_eq!(board.liberty_count(e5), 4);
//! ```

pub mod board;
pub mod color;
pub mod constants;
pub mod geometry;
pub mod neighbor_counts;
pub mod pattern;
pub mod point_set;
pub mod superko;
pub mod zobrist;

pub use board::{Board, PlayStatus};
pub use color::Color;
pub use geometry::{Geometry, Point};
