//! Conversions for 3x3 neighborhood codes.
//!
//! [`Board::neighborhood`](crate::board::Board::neighborhood) packs the eight
//! points around a vacant point into 16 bits. Pattern tables use these codes
//! as keys; this module turns them into readable diagrams and back, and
//! tells which codes can actually occur on a board.
//!
//! The diagram layout and the neighbor index of each cell:
//! ```text
//! 7 0 1      NW N NE
//! 6 . 2  ->  W  .  E
//! 5 4 3      SW S SE
//! ```
//!
//! Neighbor `i` occupies bits `2i..2i + 2`. Cells use `X` black, `O` white,
//! `.` vacant and `#` off-board; the centre cell is ignored.

use std::sync::OnceLock;

use anyhow::{Context, bail};

use crate::color::Color;

/// Diagram cell (row * 3 + column) of each neighbor index.
const CELL: [usize; 8] = [1, 2, 5, 8, 7, 6, 3, 0];

/// Off-board neighbor sets that occur: the interior, four edges, four corners.
static VALID_OFF_BOARD: OnceLock<[u16; 9]> = OnceLock::new();

/// Parses a three-line diagram into a neighborhood code.
pub fn diagram_to_neighborhood(diagram: &str) -> anyhow::Result<u16> {
    let rows: Vec<&str> = diagram.lines().collect();
    if rows.len() != 3 {
        bail!("neighborhood diagram needs 3 rows, got {}", rows.len());
    }
    let mut cells = ['.'; 9];
    for (r, row) in rows.iter().enumerate() {
        let chars: Vec<char> = row.chars().collect();
        if chars.len() != 3 {
            bail!("neighborhood row {row:?} is not 3 characters wide");
        }
        cells[r * 3..r * 3 + 3].copy_from_slice(&chars);
    }
    let mut code = 0u16;
    for (i, &cell) in CELL.iter().enumerate() {
        let ch = cells[cell];
        let color = Color::from_char(ch)
            .with_context(|| format!("unexpected {ch:?} in neighborhood diagram"))?;
        code |= color.code() << (2 * i);
    }
    Ok(code)
}

/// Renders a neighborhood code as a three-line diagram with a blank centre.
pub fn neighborhood_to_diagram(code: u16) -> String {
    let mut cells = [' '; 9];
    for (i, &cell) in CELL.iter().enumerate() {
        cells[cell] = neighbor_color(code, i).to_char();
    }
    cells
        .chunks(3)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Color of neighbor `i` (clockwise from north) in `code`.
#[inline]
pub fn neighbor_color(code: u16, i: usize) -> Color {
    Color::from_code(code >> (2 * i))
}

/// Swaps black and white, leaving vacant and off-board neighbors alone.
#[inline]
pub fn reverse_colors(code: u16) -> u16 {
    // A field is a player color when its high bit is clear.
    code ^ (!(code >> 1) & 0x5555)
}

/// The neighborhood rotated a quarter turn clockwise.
#[inline]
pub fn rotate(code: u16) -> u16 {
    code.rotate_left(4)
}

/// The neighborhood mirrored left to right.
pub fn reflect(code: u16) -> u16 {
    (0..8).fold(0, |mirrored, i| {
        mirrored | (neighbor_color(code, i).code() << (2 * ((8 - i) % 8)))
    })
}

/// True if the off-board neighbors of `code` form a shape some point on a
/// board actually has: none, one edge, or one corner.
pub fn is_possible_neighborhood(code: u16) -> bool {
    let valid = VALID_OFF_BOARD.get_or_init(make_valid_off_board);
    valid.contains(&off_board_only(code))
}

/// Replaces every on-board neighbor by vacant.
fn off_board_only(code: u16) -> u16 {
    (0..8).fold(0, |shape, i| {
        let color = match neighbor_color(code, i) {
            Color::OffBoard => Color::OffBoard,
            _ => Color::Vacant,
        };
        shape | (color.code() << (2 * i))
    })
}

fn make_valid_off_board() -> [u16; 9] {
    const INTERIOR: u16 = 0xAAAA;
    // North edge: NW, N and NE are off the board.
    let edge = INTERIOR | 0b11 | (0b11 << 2) | (0b11 << 14);
    // North-west corner adds W and SW.
    let corner = edge | (0b11 << 12) | (0b11 << 10);
    let mut valid = [INTERIOR; 9];
    let (mut e, mut c) = (edge, corner);
    for k in 0..4 {
        valid[1 + k] = e;
        valid[5 + k] = c;
        e = rotate(e);
        c = rotate(c);
    }
    valid
}
