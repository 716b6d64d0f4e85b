//! Text diagrams: problem setup, problem strings and board display.
//!
//! A diagram has one string per row, top row first, one character per
//! column: `X` black, `O` white, `.` vacant.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, bail};

use super::Board;
use crate::color::Color;
use crate::constants::COLUMN_LABELS;

impl Board {
    /// Clears the board and places every stone of `diagram` as an initial
    /// stone, then gives the move to `color_to_play`. On error the board is
    /// left as it was.
    pub fn set_up_problem(&mut self, color_to_play: Color, diagram: &[&str]) -> anyhow::Result<()> {
        let geometry = Arc::clone(&self.geometry);
        let width = geometry.width();
        if diagram.len() != width {
            bail!("problem has {} rows, expected {width}", diagram.len());
        }
        if !color_to_play.is_player() {
            bail!("{color_to_play} cannot be the side to move");
        }
        let mut stones = Vec::new();
        for (r, line) in diagram.iter().enumerate() {
            let number = width - r;
            if line.chars().count() != width {
                bail!("row {number} of the problem is not {width} characters wide: {line:?}");
            }
            for (c, ch) in line.chars().enumerate() {
                let color = Color::from_char(ch)
                    .with_context(|| format!("unexpected {ch:?} in row {number} of the problem"))?;
                match color {
                    Color::Vacant => {}
                    Color::Black | Color::White => stones.push((color, geometry.at(r, c))),
                    Color::OffBoard => bail!("off-board marker in row {number} of the problem"),
                }
            }
        }

        let before = self.clone();
        self.clear();
        for (color, p) in stones {
            let status = self.place_initial_stone(color, p);
            if !status.is_ok() {
                *self = before;
                bail!(
                    "cannot place {color} stone at {}: {status}",
                    geometry.point_to_string(p)
                );
            }
        }
        self.color_to_play = color_to_play;
        tracing::debug!(
            width,
            black = self.stone_count(Color::Black),
            white = self.stone_count(Color::White),
            to_play = %color_to_play,
            "problem set up"
        );
        Ok(())
    }

    /// The board as rows accepted by [`Board::set_up_problem`].
    pub fn to_problem_strings(&self) -> Vec<String> {
        let width = self.geometry.width();
        (0..width)
            .map(|r| {
                (0..width)
                    .map(|c| self.colors[self.geometry.at(r, c)].to_char())
                    .collect()
            })
            .collect()
    }

    fn write_column_labels(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for &label in &COLUMN_LABELS[..self.geometry.width()] {
            write!(f, " {}", label as char)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.geometry.width();
        self.write_column_labels(f)?;
        for r in 0..width {
            let number = width - r;
            if width >= 10 && number < 10 {
                write!(f, " ")?;
            }
            write!(f, "{number}")?;
            for c in 0..width {
                write!(f, " {}", self.colors[self.geometry.at(r, c)].to_char())?;
            }
            writeln!(f, " {number}")?;
        }
        self.write_column_labels(f)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{ turn: {}, to_play: {}, ko: {}, passes: {}, hash: {:#018x} }}",
            self.turn(),
            self.color_to_play,
            self.geometry.point_to_string(self.ko_point),
            self.passes,
            self.hash()
        )?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEM: [&str; 5] = [".....", ".XO..", "..X..", "O....", "....X"];

    #[test]
    fn test_set_up_problem() {
        let mut b = Board::with_width(5).unwrap();
        b.set_up_problem(Color::White, &PROBLEM).unwrap();
        assert_eq!(b.color_to_play(), Color::White);
        assert_eq!(b.turn(), 0);
        assert_eq!(b.color(b.point("b4").unwrap()), Color::Black);
        assert_eq!(b.color(b.point("c4").unwrap()), Color::White);
        assert_eq!(b.color(b.point("e1").unwrap()), Color::Black);
        assert_eq!(b.stone_count(Color::Black), 3);
        assert_eq!(b.initial_stones(Color::White).len(), 2);
        assert_eq!(b.to_problem_strings(), PROBLEM);
    }

    #[test]
    fn test_bad_problems() {
        let mut b = Board::with_width(5).unwrap();
        assert!(b.set_up_problem(Color::Black, &PROBLEM[..4]).is_err());
        let mut wide = PROBLEM;
        wide[0] = "......";
        assert!(b.set_up_problem(Color::Black, &wide).is_err());
        let mut odd = PROBLEM;
        odd[2] = "..?..";
        assert!(b.set_up_problem(Color::Black, &odd).is_err());
        assert!(b.set_up_problem(Color::Vacant, &PROBLEM).is_err());
    }

    #[test]
    fn test_failed_problem_leaves_board_unchanged() {
        let mut b = Board::with_width(5).unwrap();
        b.set_up_problem(Color::White, &PROBLEM).unwrap();
        let before = b.clone();
        // e1 is placed last and has no liberties
        let suicide = [".....", ".....", ".....", "....O", "...OX"];
        assert!(b.set_up_problem(Color::Black, &suicide).is_err());
        assert_eq!(b, before);
        assert_eq!(b.to_problem_strings(), PROBLEM);
        assert_eq!(b.color_to_play(), Color::White);
    }

    #[test]
    fn test_display() {
        let mut b = Board::with_width(3).unwrap();
        b.set_up_problem(Color::Black, &["X..", "...", "..O"]).unwrap();
        let expected = "   A B C\n3 X . . 3\n2 . . . 2\n1 . . O 1\n   A B C\n";
        assert_eq!(b.to_string(), expected);
    }
}
