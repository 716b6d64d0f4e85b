//! Board geometry: the padded 1D index space and its precomputed tables.
//!
//! A board of width `W` is laid out row by row with stride `W + 1`. Each row
//! shares one sentinel column with its neighbor, and a sentinel row sits
//! above and below the board:
//!
//! ```text
//!   # # # # #        row 0 of the array (PASS, NO_POINT, RESIGN live here)
//!   # . . . .
//!   # . . . .        on-board point (r, c) is at (r + 1) * (W + 1) + (c + 1)
//!   # . . . .
//!   # . . . .
//!   # # # # # #      bottom row plus one corner slot for the SE diagonal
//! ```
//!
//! Every on-board point therefore has all eight neighbors inside the array,
//! and off-board neighbors read as [`Color::OffBoard`](crate::color::Color).
//!
//! A `Geometry` is immutable once built. Boards hold it behind an [`Arc`]
//! so that any number of boards, on any number of threads, share one set
//! of tables.

use std::sync::{Arc, OnceLock};

use anyhow::{Context, bail};

use crate::constants::{
    COLUMN_LABELS, DEFAULT_WIDTH, DIAGONAL, GAME_LENGTH_FACTOR, MAX_WIDTH, MIN_WIDTH, NO_POINT,
    ORTHOGONAL, PASS, RESIGN, ZOBRIST_SEED,
};
use crate::zobrist::Zobrist;

/// A point on the board, represented as an index into the 1D board array.
pub type Point = usize;

/// Offsets within a knight's move, excluding the centre.
const KNIGHT_OFFSETS: [(isize, isize); 20] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
    (-2, -1),
    (-2, 1),
    (2, -1),
    (2, 1),
    (-1, -2),
    (1, -2),
    (-1, 2),
    (1, 2),
];

/// Offsets added on top of [`KNIGHT_OFFSETS`] for the large knight neighborhood.
const LARGE_KNIGHT_EXTRA_OFFSETS: [(isize, isize); 16] = [
    (-2, -2),
    (-2, 2),
    (2, -2),
    (2, 2),
    (-3, 0),
    (3, 0),
    (0, -3),
    (0, 3),
    (-3, -1),
    (-3, 1),
    (3, -1),
    (3, 1),
    (-1, -3),
    (1, -3),
    (-1, 3),
    (1, 3),
];

/// One cached geometry per supported width.
static SHARED: [OnceLock<Arc<Geometry>>; MAX_WIDTH - MIN_WIDTH + 1] =
    [const { OnceLock::new() }; MAX_WIDTH - MIN_WIDTH + 1];

/// Tables derived from the board width.
#[derive(Debug)]
pub struct Geometry {
    width: usize,
    south: usize,
    extended_area: usize,
    first_point_beyond_board: usize,
    max_moves: usize,
    on_board: Vec<bool>,
    all_points: Vec<Point>,
    /// N, E, S, W, NE, SE, SW, NW. Only filled for on-board points.
    neighbors: Vec<[Point; 8]>,
    eyelike_threshold: Vec<u8>,
    third_or_fourth_line: Vec<bool>,
    knight_neighborhood: Vec<Vec<Point>>,
    large_knight_neighborhood: Vec<Vec<Point>>,
    zobrist: Zobrist,
}

impl Geometry {
    /// Builds the tables for a board of the given width.
    pub fn new(width: usize) -> anyhow::Result<Self> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            bail!("board width {width} is outside {MIN_WIDTH}..={MAX_WIDTH}");
        }
        Ok(Self::build(width))
    }

    /// Returns the process-wide geometry for `width`, building it on first use.
    pub fn shared(width: usize) -> anyhow::Result<Arc<Self>> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            bail!("board width {width} is outside {MIN_WIDTH}..={MAX_WIDTH}");
        }
        let cell = &SHARED[width - MIN_WIDTH];
        Ok(Arc::clone(cell.get_or_init(|| Arc::new(Self::build(width)))))
    }

    /// The shared geometry for the width selected by the board-size feature.
    pub fn default_shared() -> Arc<Self> {
        let cell = &SHARED[DEFAULT_WIDTH - MIN_WIDTH];
        Arc::clone(cell.get_or_init(|| Arc::new(Self::build(DEFAULT_WIDTH))))
    }

    fn build(width: usize) -> Self {
        let south = width + 1;
        let extended_area = (width + 1) * (width + 2) + 1;
        let first_point_beyond_board = width * (width + 2) + 1;

        let mut on_board = vec![false; extended_area];
        let mut all_points = Vec::with_capacity(width * width);
        for r in 0..width {
            for c in 0..width {
                let p = (r + 1) * south + c + 1;
                on_board[p] = true;
                all_points.push(p);
            }
        }

        let mut geometry = Self {
            width,
            south,
            extended_area,
            first_point_beyond_board,
            max_moves: GAME_LENGTH_FACTOR * width * width,
            on_board,
            neighbors: vec![[NO_POINT; 8]; extended_area],
            eyelike_threshold: vec![0; extended_area],
            third_or_fourth_line: vec![false; extended_area],
            knight_neighborhood: vec![Vec::new(); extended_area],
            large_knight_neighborhood: vec![Vec::new(); extended_area],
            zobrist: Zobrist::new(extended_area, all_points.iter().copied(), ZOBRIST_SEED),
            all_points,
        };

        let s = south as isize;
        let deltas: [isize; 8] = [-s, 1, s, -1, -s + 1, s + 1, s - 1, -s - 1];
        for i in 0..geometry.all_points.len() {
            let p = geometry.all_points[i];
            geometry.neighbors[p] = std::array::from_fn(|k| (p as isize + deltas[k]) as Point);

            let any_diagonal_off = geometry
                .diagonal_neighbors(p)
                .iter()
                .any(|&q| !geometry.on_board[q]);
            geometry.eyelike_threshold[p] = if any_diagonal_off { 1 } else { 2 };

            let line = geometry.line(p);
            geometry.third_or_fourth_line[p] = line == 2 || line == 3;

            let knight = geometry.offsets_on_board(p, KNIGHT_OFFSETS.iter());
            let large = geometry.offsets_on_board(
                p,
                KNIGHT_OFFSETS.iter().chain(LARGE_KNIGHT_EXTRA_OFFSETS.iter()),
            );
            geometry.knight_neighborhood[p] = knight;
            geometry.large_knight_neighborhood[p] = large;
        }

        tracing::debug!(width, extended_area, "built board geometry");
        geometry
    }

    fn offsets_on_board<'a>(
        &self,
        p: Point,
        offsets: impl Iterator<Item = &'a (isize, isize)>,
    ) -> Vec<Point> {
        let (r, c) = (self.row(p) as isize, self.column(p) as isize);
        let w = self.width as isize;
        offsets
            .filter_map(|&(dr, dc)| {
                let (nr, nc) = (r + dr, c + dc);
                ((0..w).contains(&nr) && (0..w).contains(&nc))
                    .then(|| self.at(nr as usize, nc as usize))
            })
            .collect()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Index distance between vertically adjacent points.
    #[inline]
    pub fn south(&self) -> usize {
        self.south
    }

    /// Length of every per-point array.
    #[inline]
    pub fn extended_area(&self) -> usize {
        self.extended_area
    }

    /// One past the largest on-board point.
    #[inline]
    pub fn first_point_beyond_board(&self) -> usize {
        self.first_point_beyond_board
    }

    /// Turn at which the game-length guard starts refusing moves.
    #[inline]
    pub fn max_moves(&self) -> usize {
        self.max_moves
    }

    #[inline]
    pub fn is_on_board(&self, p: Point) -> bool {
        p < self.extended_area && self.on_board[p]
    }

    /// All on-board points in row-major order.
    #[inline]
    pub fn all_points(&self) -> &[Point] {
        &self.all_points
    }

    /// Orthogonal neighbors N, E, S, W.
    #[inline]
    pub fn orthogonal_neighbors(&self, p: Point) -> &[Point] {
        &self.neighbors[p][ORTHOGONAL]
    }

    /// Diagonal neighbors NE, SE, SW, NW.
    #[inline]
    pub fn diagonal_neighbors(&self, p: Point) -> &[Point] {
        &self.neighbors[p][DIAGONAL]
    }

    #[inline]
    pub fn neighbors(&self, p: Point) -> &[Point; 8] {
        &self.neighbors[p]
    }

    /// How many opponent diagonals an eye-like point tolerates: 1 on the
    /// edge or in a corner, 2 in the interior.
    #[inline]
    pub fn eyelike_threshold(&self, p: Point) -> usize {
        self.eyelike_threshold[p] as usize
    }

    #[inline]
    pub fn is_edge_or_corner(&self, p: Point) -> bool {
        self.eyelike_threshold[p] == 1
    }

    #[inline]
    pub fn is_third_or_fourth_line(&self, p: Point) -> bool {
        self.third_or_fourth_line[p]
    }

    #[inline]
    pub fn knight_neighborhood(&self, p: Point) -> &[Point] {
        &self.knight_neighborhood[p]
    }

    #[inline]
    pub fn large_knight_neighborhood(&self, p: Point) -> &[Point] {
        &self.large_knight_neighborhood[p]
    }

    #[inline]
    pub fn zobrist(&self) -> &Zobrist {
        &self.zobrist
    }

    /// Zero-based row, counted from the top.
    #[inline]
    pub fn row(&self, p: Point) -> usize {
        p / self.south - 1
    }

    /// Zero-based column, counted from the left.
    #[inline]
    pub fn column(&self, p: Point) -> usize {
        p % self.south - 1
    }

    #[inline]
    pub fn at(&self, r: usize, c: usize) -> Point {
        debug_assert!(r < self.width && c < self.width);
        (r + 1) * self.south + c + 1
    }

    /// Zero-based distance to the nearest edge.
    pub fn line(&self, p: Point) -> usize {
        let (r, c) = (self.row(p), self.column(p));
        let last = self.width - 1;
        r.min(c).min(last - r).min(last - c)
    }

    /// Parses a label such as `D4`, `pass` or `resign`. Column letters skip
    /// `I` and case is ignored.
    pub fn parse_point(&self, label: &str) -> anyhow::Result<Point> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("pass") {
            return Ok(PASS);
        }
        if label.eq_ignore_ascii_case("resign") {
            return Ok(RESIGN);
        }

        let mut chars = label.chars();
        let letter = chars
            .next()
            .context("empty point label")?
            .to_ascii_uppercase();
        let column = COLUMN_LABELS[..self.width]
            .iter()
            .position(|&l| l as char == letter)
            .with_context(|| format!("bad column in point label {label:?}"))?;
        let number: usize = chars
            .as_str()
            .parse()
            .with_context(|| format!("bad row in point label {label:?}"))?;
        if !(1..=self.width).contains(&number) {
            bail!("row {number} is off a {0}x{0} board", self.width);
        }
        Ok(self.at(self.width - number, column))
    }

    /// Renders a point as `D4`, `PASS`, `RESIGN` or `NO_POINT`.
    pub fn point_to_string(&self, p: Point) -> String {
        match p {
            PASS => "PASS".into(),
            RESIGN => "RESIGN".into(),
            NO_POINT => "NO_POINT".into(),
            p if self.is_on_board(p) => {
                let letter = COLUMN_LABELS[self.column(p)] as char;
                format!("{letter}{}", self.width - self.row(p))
            }
            p => format!("#{p}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let g = Geometry::new(19).unwrap();
        assert_eq!(g.south(), 20);
        assert_eq!(g.extended_area(), 20 * 21 + 1);
        assert_eq!(g.first_point_beyond_board(), 19 * 21 + 1);
        assert_eq!(g.all_points().len(), 361);
        assert_eq!(*g.all_points().last().unwrap(), g.first_point_beyond_board() - 1);
        assert_eq!(g.max_moves(), 3 * 361);
        for p in [PASS, NO_POINT, RESIGN] {
            assert!(!g.is_on_board(p));
        }
    }

    #[test]
    fn test_bad_width() {
        assert!(Geometry::new(1).is_err());
        assert!(Geometry::new(20).is_err());
        assert!(Geometry::shared(0).is_err());
    }

    #[test]
    fn test_shared_is_cached() {
        let a = Geometry::shared(9).unwrap();
        let b = Geometry::shared(9).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_labels() {
        let g = Geometry::new(19).unwrap();
        let d4 = g.parse_point("d4").unwrap();
        assert_eq!(g.row(d4), 15);
        assert_eq!(g.column(d4), 3);
        assert_eq!(g.point_to_string(d4), "D4");
        assert_eq!(g.point_to_string(g.parse_point("J10").unwrap()), "J10");
        assert_eq!(g.parse_point("Pass").unwrap(), PASS);
        assert_eq!(g.parse_point("resign").unwrap(), RESIGN);
        assert_eq!(g.point_to_string(NO_POINT), "NO_POINT");
        assert!(g.parse_point("I5").is_err());
        assert!(g.parse_point("A20").is_err());
        assert!(g.parse_point("A0").is_err());
        assert!(g.parse_point("").is_err());
    }

    #[test]
    fn test_neighbors_and_thresholds() {
        let g = Geometry::new(9).unwrap();
        let corner = g.at(0, 0);
        let [n, e, s, w, ne, se, sw, nw] = *g.neighbors(corner);
        assert!(!g.is_on_board(n) && !g.is_on_board(w));
        assert!(!g.is_on_board(ne) && !g.is_on_board(sw) && !g.is_on_board(nw));
        assert_eq!(e, g.at(0, 1));
        assert_eq!(s, g.at(1, 0));
        assert_eq!(se, g.at(1, 1));
        assert_eq!(g.eyelike_threshold(corner), 1);
        assert_eq!(g.eyelike_threshold(g.at(0, 4)), 1);
        assert_eq!(g.eyelike_threshold(g.at(4, 4)), 2);
        assert!(g.is_edge_or_corner(g.at(8, 3)));
    }

    #[test]
    fn test_lines() {
        let g = Geometry::new(19).unwrap();
        assert_eq!(g.line(g.parse_point("A1").unwrap()), 0);
        assert_eq!(g.line(g.parse_point("C17").unwrap()), 2);
        assert!(g.is_third_or_fourth_line(g.parse_point("D10").unwrap()));
        assert!(!g.is_third_or_fourth_line(g.parse_point("E10").unwrap()));
    }

    #[test]
    fn test_knight_neighborhoods() {
        let g = Geometry::new(19).unwrap();
        let center = g.at(9, 9);
        assert_eq!(g.knight_neighborhood(center).len(), 20);
        assert_eq!(g.large_knight_neighborhood(center).len(), 36);
        assert!(g.knight_neighborhood(center).contains(&g.at(7, 8)));
        assert!(!g.knight_neighborhood(center).contains(&g.at(7, 7)));
        assert!(g.large_knight_neighborhood(center).contains(&g.at(7, 7)));
        assert!(g.large_knight_neighborhood(center).contains(&g.at(10, 12)));
        let corner = g.at(0, 0);
        assert!(g.knight_neighborhood(corner).iter().all(|&q| g.is_on_board(q)));
        assert_eq!(g.knight_neighborhood(corner).len(), 7);
    }
}
