//! Colors of points.

use std::fmt;

/// The color of a point. The discriminants double as the 2-bit codes used
/// in neighborhood encodings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
    Vacant = 2,
    OffBoard = 3,
}

impl Color {
    /// The two player colors, indexed by [`Color::index`].
    pub const PLAYERS: [Color; 2] = [Color::Black, Color::White];

    /// Returns true for `Black` and `White`.
    #[inline]
    pub fn is_player(self) -> bool {
        matches!(self, Color::Black | Color::White)
    }

    /// Returns the other player color. Only meaningful for player colors.
    #[inline]
    pub fn opposite(self) -> Color {
        debug_assert!(self.is_player(), "{self:?} has no opposite");
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
            other => other,
        }
    }

    /// Array index for per-player tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The 2-bit code of this color.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Inverse of [`Color::code`]; only the low two bits are used.
    #[inline]
    pub fn from_code(code: u16) -> Color {
        match code & 0b11 {
            0 => Color::Black,
            1 => Color::White,
            2 => Color::Vacant,
            _ => Color::OffBoard,
        }
    }

    /// Diagram character: `X` black, `O` white, `.` vacant, `#` off-board.
    pub fn to_char(self) -> char {
        match self {
            Color::Black => 'X',
            Color::White => 'O',
            Color::Vacant => '.',
            Color::OffBoard => '#',
        }
    }

    /// Parses a diagram character.
    pub fn from_char(ch: char) -> Option<Color> {
        match ch {
            'X' | 'x' => Some(Color::Black),
            'O' | 'o' => Some(Color::White),
            '.' => Some(Color::Vacant),
            '#' => Some(Color::OffBoard),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Vacant => "vacant",
            Color::OffBoard => "off-board",
        };
        f.pad(name)
    }
}
