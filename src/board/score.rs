//! Scoring. Positive scores favour Black; komi counts for White.

use super::Board;
use crate::color::Color;

/// `Black` for a positive score, `White` for a negative one, `Vacant` for a tie.
pub fn winner_from_score(score: f64) -> Color {
    if score > 0.0 {
        Color::Black
    } else if score < 0.0 {
        Color::White
    } else {
        Color::Vacant
    }
}

impl Board {
    /// Stones on the board minus komi. Ignores territory.
    pub fn approximate_score(&self) -> f64 {
        self.stone_count(Color::Black) as f64 - self.stone_count(Color::White) as f64 - self.komi
    }

    pub fn approximate_winner(&self) -> Color {
        winner_from_score(self.approximate_score())
    }

    /// Approximate score plus one point for each vacant point whose
    /// neighbors are all one color. Good enough at the end of a playout,
    /// when every remaining vacant point is an eye.
    pub fn playout_score(&self) -> f64 {
        let eyes: i64 = self
            .vacant_points
            .iter()
            .map(|p| {
                let counts = self.neighbor_counts[p];
                if counts.has_max_for(Color::Black) {
                    1
                } else if counts.has_max_for(Color::White) {
                    -1
                } else {
                    0
                }
            })
            .sum();
        self.approximate_score() + eyes as f64
    }

    pub fn playout_winner(&self) -> Color {
        winner_from_score(self.playout_score())
    }

    /// Area score: stones plus every vacant region bordered by one color
    /// only, minus komi.
    pub fn final_score(&self) -> f64 {
        let geometry = &self.geometry;
        let mut visited = vec![false; geometry.extended_area()];
        let mut stack = Vec::new();
        let mut territory: i64 = 0;
        for start in self.vacant_points.iter() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            stack.push(start);
            let mut size = 0i64;
            let mut borders = [false; 2];
            while let Some(p) = stack.pop() {
                size += 1;
                for &n in geometry.orthogonal_neighbors(p) {
                    match self.colors[n] {
                        Color::Vacant if !visited[n] => {
                            visited[n] = true;
                            stack.push(n);
                        }
                        c if c.is_player() => borders[c.index()] = true,
                        _ => {}
                    }
                }
            }
            match borders {
                [true, false] => territory += size,
                [false, true] => territory -= size,
                _ => {}
            }
        }
        self.approximate_score() + territory as f64
    }

    pub fn final_winner(&self) -> Color {
        winner_from_score(self.final_score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_goes_to_white_by_komi() {
        let b = Board::with_width(9).unwrap();
        assert_eq!(b.final_score(), -b.komi());
        assert_eq!(b.playout_score(), -b.komi());
        assert_eq!(b.final_winner(), Color::White);
    }

    #[test]
    fn test_winner() {
        let mut b = Board::with_width(19).unwrap();
        b.set_color_to_play(Color::White);
        assert!(b.play(b.point("a1").unwrap()).is_ok());
        assert_eq!(b.approximate_winner(), Color::White);
        assert_eq!(b.final_winner(), Color::White);
        for row in 1..=9 {
            b.set_color_to_play(Color::Black);
            let p = b.point(&format!("b{row}")).unwrap();
            assert!(b.play(p).is_ok());
        }
        assert_eq!(b.approximate_winner(), Color::Black);
        assert_eq!(b.final_winner(), Color::Black);
    }

    #[test]
    fn test_tie() {
        let mut b = Board::with_width(9).unwrap();
        b.set_komi(0.0);
        assert_eq!(b.approximate_winner(), Color::Vacant);
        assert_eq!(winner_from_score(0.5), Color::Black);
    }
}
