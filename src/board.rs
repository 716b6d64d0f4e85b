//! The incremental board-state engine.
//!
//! This module owns all mutable game state:
//! - Stone placement, chain connectivity and liberty sets
//! - Capture and suicide resolution
//! - Simple ko and positional superko, via Zobrist hashing
//! - The self-atari, eye-like and feasibility predicates used to filter
//!   candidate moves
//!
//! Chains have no object of their own. Every stone stores the id of its
//! chain (a canonical member point) and the next stone of a circular list
//! through the chain. Liberties are stored once per chain, under the
//! canonical point. Merging appends the chain with fewer liberties into the
//! one with more, so walking a chain's list and relabelling its stones is the
//! only non-constant cost of a move.
//!
//! Illegal moves are reported through [`PlayStatus`], never by panicking.
//! Broken internal invariants are programmer errors and trip `debug_assert!`.

mod diagram;
mod score;

use std::fmt;
use std::mem;
use std::sync::Arc;

use anyhow::bail;
use arrayvec::ArrayVec;

use crate::color::Color;
use crate::constants::{CLOCKWISE, DEFAULT_KOMI, DIAGONAL, NO_POINT, PASS};
use crate::geometry::{Geometry, Point};
use crate::neighbor_counts::NeighborCounts;
use crate::point_set::PointSet;
use crate::superko::SuperKoTable;

/// Result of attempting to place a stone.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlayStatus {
    Ok,
    /// Point is not vacant
    Occupied,
    /// The stone's chain would have no liberties after captures
    Suicide,
    /// Simple ko or positional superko
    KoViolation,
    /// The game-length cutoff has been reached; only passes are accepted
    GameTooLong,
}

impl PlayStatus {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == PlayStatus::Ok
    }
}

impl fmt::Display for PlayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayStatus::Ok => write!(f, "ok"),
            PlayStatus::Occupied => write!(f, "Error Illegal move: point not EMPTY"),
            PlayStatus::Suicide => write!(f, "Error Illegal move: suicide"),
            PlayStatus::KoViolation => {
                write!(f, "Error Illegal move: retakes ko or repeats a position")
            }
            PlayStatus::GameTooLong => write!(f, "Error Illegal move: game too long"),
        }
    }
}

/// What one pass over the four orthogonal neighbors of a candidate point
/// learns. Placement reuses it rather than scanning again.
#[derive(Debug, Default)]
struct NeighborScan {
    /// Vacant neighbors: the exact liberties of a lone stone at the point.
    liberties: ArrayVec<Point, 4>,
    /// Distinct adjacent chains of the mover's color.
    friends: ArrayVec<Point, 4>,
    /// Distinct adjacent chains of the opponent's color.
    enemies: ArrayVec<Point, 4>,
    suicidal: bool,
}

/// Iterator over the stones of one chain.
pub struct ChainStones<'a> {
    chain_next: &'a [Point],
    start: Point,
    current: Option<Point>,
}

impl Iterator for ChainStones<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let stone = self.current?;
        let next = self.chain_next[stone];
        self.current = (next != self.start).then_some(next);
        Some(stone)
    }
}

/// A Go board: stones, chains, liberties, ko state and history.
///
/// Boards of the same width share one [`Geometry`]. `Board` is `Send`, so
/// each worker thread can own a private copy and refresh it from a shared
/// snapshot with [`Board::copy_from`].
#[derive(Clone)]
pub struct Board {
    geometry: Arc<Geometry>,
    colors: Vec<Color>,
    chain_ids: Vec<Point>,
    chain_next: Vec<Point>,
    /// Indexed by canonical point; entries for other points are stale.
    liberties: Vec<PointSet>,
    chains_in_atari: [PointSet; 2],
    vacant_points: PointSet,
    neighbor_counts: Vec<NeighborCounts>,
    /// Stones and ko point, without side to move.
    hash: u64,
    ko_point: Point,
    super_ko_table: SuperKoTable,
    moves: Vec<Point>,
    passes: usize,
    color_to_play: Color,
    stone_counts: [usize; 2],
    komi: f64,
    handicap: usize,
    initial_stones: [PointSet; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Geometry::default_shared())
    }
}

impl Board {
    /// Creates an empty board on `geometry`.
    pub fn new(geometry: Arc<Geometry>) -> Self {
        let area = geometry.extended_area();
        let beyond = geometry.first_point_beyond_board();
        let max_moves = geometry.max_moves();
        let mut board = Self {
            colors: vec![Color::OffBoard; area],
            chain_ids: (0..area).collect(),
            chain_next: (0..area).collect(),
            liberties: vec![PointSet::new(beyond); beyond],
            chains_in_atari: [PointSet::new(beyond), PointSet::new(beyond)],
            vacant_points: PointSet::new(beyond),
            neighbor_counts: vec![NeighborCounts::FOUR_VACANT; area],
            hash: 0,
            ko_point: NO_POINT,
            super_ko_table: SuperKoTable::new(max_moves),
            moves: Vec::with_capacity(max_moves),
            passes: 0,
            color_to_play: Color::Black,
            stone_counts: [0; 2],
            komi: DEFAULT_KOMI,
            handicap: 0,
            initial_stones: [PointSet::new(beyond), PointSet::new(beyond)],
            geometry,
        };
        board.clear();
        board
    }

    /// Creates an empty board of the given width on the shared geometry.
    pub fn with_width(width: usize) -> anyhow::Result<Self> {
        Ok(Self::new(Geometry::shared(width)?))
    }

    /// Resets to an empty board with Black to play and default komi.
    pub fn clear(&mut self) {
        self.colors.fill(Color::OffBoard);
        self.neighbor_counts.fill(NeighborCounts::FOUR_VACANT);
        for (p, (id, next)) in self
            .chain_ids
            .iter_mut()
            .zip(self.chain_next.iter_mut())
            .enumerate()
        {
            *id = p;
            *next = p;
        }
        self.liberties.iter_mut().for_each(PointSet::clear);
        self.chains_in_atari.iter_mut().for_each(PointSet::clear);
        self.initial_stones.iter_mut().for_each(PointSet::clear);
        self.vacant_points.clear();
        for &p in self.geometry.all_points() {
            self.colors[p] = Color::Vacant;
            self.vacant_points.insert_absent(p);
            for &n in self.geometry.orthogonal_neighbors(p) {
                if !self.geometry.is_on_board(n) {
                    self.neighbor_counts[p].add_edge();
                }
            }
        }
        self.hash = 0;
        self.ko_point = NO_POINT;
        self.super_ko_table.clear();
        self.moves.clear();
        self.passes = 0;
        self.color_to_play = Color::Black;
        self.stone_counts = [0; 2];
        self.komi = DEFAULT_KOMI;
        self.handicap = 0;
    }

    /// Makes this board a copy of `that` without allocating. Both boards
    /// must have the same width.
    pub fn copy_from(&mut self, that: &Board) {
        debug_assert_eq!(self.geometry.width(), that.geometry.width());
        self.colors.copy_from_slice(&that.colors);
        self.chain_ids.copy_from_slice(&that.chain_ids);
        self.chain_next.copy_from_slice(&that.chain_next);
        self.neighbor_counts.copy_from_slice(&that.neighbor_counts);
        for &p in self.geometry.all_points() {
            self.liberties[p].copy_from(&that.liberties[p]);
        }
        for i in 0..2 {
            self.chains_in_atari[i].copy_from(&that.chains_in_atari[i]);
            self.initial_stones[i].copy_from(&that.initial_stones[i]);
        }
        self.vacant_points.copy_from(&that.vacant_points);
        self.super_ko_table.copy_from(&that.super_ko_table);
        self.moves.clear();
        self.moves.extend_from_slice(&that.moves);
        self.hash = that.hash;
        self.ko_point = that.ko_point;
        self.passes = that.passes;
        self.color_to_play = that.color_to_play;
        self.stone_counts = that.stone_counts;
        self.komi = that.komi;
        self.handicap = that.handicap;
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    #[inline]
    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    /// Parses a point label such as `D4` for this board's width.
    pub fn point(&self, label: &str) -> anyhow::Result<Point> {
        self.geometry.parse_point(label)
    }

    #[inline]
    pub fn color(&self, p: Point) -> Color {
        self.colors[p]
    }

    #[inline]
    pub fn color_to_play(&self) -> Color {
        self.color_to_play
    }

    /// Overrides the side to move. Meant for setting up positions.
    pub fn set_color_to_play(&mut self, color: Color) {
        debug_assert!(color.is_player());
        self.color_to_play = color;
    }

    /// Points White receives; positive favours White.
    #[inline]
    pub fn komi(&self) -> f64 {
        self.komi
    }

    pub fn set_komi(&mut self, komi: f64) {
        self.komi = komi;
    }

    /// Canonical point of the chain containing `p`.
    #[inline]
    pub fn chain_id(&self, p: Point) -> Point {
        self.chain_ids[p]
    }

    /// Next stone in the circular list of `p`'s chain.
    #[inline]
    pub fn chain_next(&self, p: Point) -> Point {
        self.chain_next[p]
    }

    /// Stones of the chain containing `p`, starting at `p`.
    pub fn chain_stones(&self, p: Point) -> ChainStones<'_> {
        debug_assert!(self.colors[p].is_player());
        ChainStones {
            chain_next: &self.chain_next,
            start: p,
            current: Some(p),
        }
    }

    pub fn chain_size(&self, p: Point) -> usize {
        self.chain_stones(p).count()
    }

    /// Liberties of the chain containing `p`.
    #[inline]
    pub fn liberties(&self, p: Point) -> &PointSet {
        debug_assert!(self.colors[p].is_player());
        &self.liberties[self.chain_ids[p]]
    }

    #[inline]
    pub fn liberty_count(&self, p: Point) -> usize {
        self.liberties(p).len()
    }

    /// True if the chain with canonical point `chain` has one liberty.
    #[inline]
    pub fn is_in_atari(&self, chain: Point) -> bool {
        debug_assert_eq!(self.chain_ids[chain], chain);
        self.liberties[chain].len() == 1
    }

    /// Canonical points of the chains of `color` that have one liberty.
    #[inline]
    pub fn chains_in_atari(&self, color: Color) -> &PointSet {
        &self.chains_in_atari[color.index()]
    }

    /// The last liberty of a chain in atari.
    #[inline]
    pub fn liberty_of_chain_in_atari(&self, chain: Point) -> Point {
        debug_assert!(self.is_in_atari(chain));
        self.liberties[chain].get(0)
    }

    /// The move that would capture the chain containing `p`, or `NO_POINT`
    /// if it has more than one liberty.
    pub fn capture_point(&self, p: Point) -> Point {
        if self.liberty_count(p) > 1 {
            NO_POINT
        } else {
            self.liberty_of_chain_in_atari(self.chain_ids[p])
        }
    }

    #[inline]
    pub fn vacant_points(&self) -> &PointSet {
        &self.vacant_points
    }

    #[inline]
    pub fn vacant_neighbor_count(&self, p: Point) -> usize {
        self.neighbor_counts[p].count(Color::Vacant) as usize
    }

    #[inline]
    pub fn neighbor_counts(&self, p: Point) -> NeighborCounts {
        self.neighbor_counts[p]
    }

    /// The move played on turn `t`, or `NO_POINT` if there is none yet.
    pub fn move_at(&self, t: usize) -> Point {
        self.moves.get(t).copied().unwrap_or(NO_POINT)
    }

    pub fn moves(&self) -> &[Point] {
        &self.moves
    }

    /// Space-separated labels of all moves so far.
    pub fn move_sequence(&self) -> String {
        self.moves
            .iter()
            .map(|&p| self.geometry.point_to_string(p))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of moves played, passes included.
    #[inline]
    pub fn turn(&self) -> usize {
        self.moves.len()
    }

    /// Consecutive passes just before now.
    #[inline]
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn set_passes(&mut self, passes: usize) {
        self.passes = passes;
    }

    /// The simple ko point, or `NO_POINT`.
    #[inline]
    pub fn ko_point(&self) -> Point {
        self.ko_point
    }

    /// Zobrist hash of the stones, the simple ko point and the side to move.
    #[inline]
    pub fn hash(&self) -> u64 {
        if self.color_to_play == Color::White {
            !self.hash
        } else {
            self.hash
        }
    }

    #[inline]
    pub fn stone_count(&self, color: Color) -> usize {
        self.stone_counts[color.index()]
    }

    #[inline]
    pub fn handicap(&self) -> usize {
        self.handicap
    }

    /// Stones of `color` placed before the game started.
    pub fn initial_stones(&self, color: Color) -> &PointSet {
        &self.initial_stones[color.index()]
    }

    /// 16-bit code of the eight points around `p`: two bits per neighbor,
    /// in clockwise order from north, the north neighbor in the low bits.
    pub fn neighborhood(&self, p: Point) -> u16 {
        debug_assert!(self.geometry.is_on_board(p));
        let neighbors = self.geometry.neighbors(p);
        CLOCKWISE
            .iter()
            .enumerate()
            .fold(0, |code, (i, &slot)| {
                code | self.colors[neighbors[slot]].code() << (2 * i)
            })
    }

    /// Liberties of `p`'s chain found by walking its stones. Slow; for
    /// checking the maintained sets.
    pub fn liberties_by_traversal(&self, p: Point) -> Vec<Point> {
        let mut found = Vec::new();
        for stone in self.chain_stones(p) {
            for &n in self.geometry.orthogonal_neighbors(stone) {
                if self.colors[n] == Color::Vacant && !found.contains(&n) {
                    found.push(n);
                }
            }
        }
        found.sort_unstable();
        found
    }

    // ---------------------------------------------------------------------
    // Move filters
    // ---------------------------------------------------------------------

    /// True if `p` is surrounded by the side to move closely enough that
    /// playing there is almost certainly pointless.
    pub fn is_eyelike(&self, p: Point) -> bool {
        debug_assert_eq!(self.colors[p], Color::Vacant);
        let color = self.color_to_play;
        if !self.neighbor_counts[p].has_max_for(color) {
            return false;
        }
        let enemy = color.opposite();
        let neighbors = self.geometry.neighbors(p);
        let enemy_diagonals = DIAGONAL
            .filter(|&slot| self.colors[neighbors[slot]] == enemy)
            .count();
        enemy_diagonals < self.geometry.eyelike_threshold(p)
    }

    /// True if `p` is worth trying in a random playout: not eye-like, and
    /// either on the third or fourth line or near an existing stone.
    pub fn is_feasible(&self, p: Point) -> bool {
        !self.is_eyelike(p)
            && (self.geometry.is_third_or_fourth_line(p)
                || self.is_within_large_knights_move_of_stone(p))
    }

    pub fn is_within_knights_move_of_stone(&self, p: Point) -> bool {
        self.geometry
            .knight_neighborhood(p)
            .iter()
            .any(|&n| self.colors[n].is_player())
    }

    pub fn is_within_large_knights_move_of_stone(&self, p: Point) -> bool {
        self.geometry
            .large_knight_neighborhood(p)
            .iter()
            .any(|&n| self.colors[n].is_player())
    }

    /// Color of `p` if occupied. Otherwise the color with more adjacent
    /// stones, counting the edge for both, or `Vacant` on a tie.
    pub fn local_owner(&self, p: Point) -> Color {
        let color = self.colors[p];
        if color != Color::Vacant {
            return color;
        }
        let counts = self.neighbor_counts[p];
        let (black, white) = (counts.count(Color::Black), counts.count(Color::White));
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Color::Black,
            std::cmp::Ordering::Less => Color::White,
            std::cmp::Ordering::Equal => Color::Vacant,
        }
    }

    /// True if playing `color` at `p` would leave its chain with at most one
    /// liberty, counting liberties freed by the captures the move makes.
    pub fn is_self_atari(&self, p: Point, color: Color) -> bool {
        if self.neighbor_counts[p].count(Color::Vacant) >= 2 {
            return false;
        }
        let enemy = color.opposite();
        // p itself plus up to two real liberties; full means not self-atari.
        let mut tally: ArrayVec<Point, 3> = ArrayVec::new();
        tally.push(p);
        let mut allies: ArrayVec<Point, 4> = ArrayVec::new();
        let mut doomed: ArrayVec<Point, 4> = ArrayVec::new();
        for &n in self.geometry.orthogonal_neighbors(p) {
            match self.colors[n] {
                Color::Vacant => {
                    if tally_is_full(&mut tally, n) {
                        return false;
                    }
                }
                c if c == color => {
                    let chain = self.chain_ids[n];
                    if !allies.contains(&chain) {
                        allies.push(chain);
                        for liberty in self.liberties[chain].iter() {
                            if tally_is_full(&mut tally, liberty) {
                                return false;
                            }
                        }
                    }
                }
                c if c == enemy => {
                    let chain = self.chain_ids[n];
                    if self.liberties[chain].len() == 1 {
                        if tally_is_full(&mut tally, n) {
                            return false;
                        }
                        if !doomed.contains(&chain) {
                            doomed.push(chain);
                        }
                    }
                }
                _ => {}
            }
        }
        // Captured stones next to a chain we merge with become its liberties.
        for &chain in &doomed {
            for stone in self.chain_stones(chain) {
                let touches_ally = self.geometry.orthogonal_neighbors(stone)
                    .iter()
                    .any(|&n| self.colors[n] == color && allies.contains(&self.chain_ids[n]));
                if touches_ally && tally_is_full(&mut tally, stone) {
                    return false;
                }
            }
        }
        true
    }

    /// True if `color` playing at the vacant point `p` would have no
    /// liberties after captures.
    pub fn is_suicidal(&self, color: Color, p: Point) -> bool {
        self.scan_neighbors(color, p).suicidal
    }

    /// True if the side to move may play at `p` under every rule `play`
    /// enforces.
    pub fn is_legal(&self, p: Point) -> bool {
        p == PASS || self.check_play(self.color_to_play, p).is_ok()
    }

    // ---------------------------------------------------------------------
    // Mutators
    // ---------------------------------------------------------------------

    /// Plays a move for the side to move. `PASS` is always legal. An illegal
    /// move leaves the board untouched.
    pub fn play(&mut self, p: Point) -> PlayStatus {
        self.debug_assert_stone_count();
        if p == PASS {
            self.pass();
            return PlayStatus::Ok;
        }
        let color = self.color_to_play;
        match self.check_play(color, p) {
            Ok(scan) => {
                self.finalize_play(color, p, &scan, true);
                self.remember_position(self.color_to_play == Color::White);
                PlayStatus::Ok
            }
            Err(status) => status,
        }
    }

    /// Like [`play`](Self::play) but checks only occupancy, simple ko and
    /// suicide, and leaves the superko table alone. For random playouts,
    /// whose callers bound the game length themselves.
    pub fn play_fast(&mut self, p: Point) -> PlayStatus {
        self.debug_assert_stone_count();
        if p == PASS {
            self.pass();
            return PlayStatus::Ok;
        }
        let color = self.color_to_play;
        match self.check_placement(color, p) {
            Ok(scan) => {
                self.finalize_play(color, p, &scan, true);
                PlayStatus::Ok
            }
            Err(status) => status,
        }
    }

    /// Places a stone of `color` without advancing the turn or changing the
    /// side to move, for handicap stones and problem diagrams. The stone is
    /// also recorded as an initial stone.
    pub fn place_initial_stone(&mut self, color: Color, p: Point) -> PlayStatus {
        self.debug_assert_stone_count();
        if p == PASS {
            self.pass();
            return PlayStatus::Ok;
        }
        match self.check_play(color, p) {
            Ok(scan) => {
                self.finalize_play(color, p, &scan, false);
                self.initial_stones[color.index()].insert(p);
                self.remember_position(color == Color::White);
                PlayStatus::Ok
            }
            Err(status) => status,
        }
    }

    /// Passes: clears the ko point and hands the move to the opponent.
    pub fn pass(&mut self) {
        if self.ko_point != NO_POINT {
            self.hash ^= self.geometry.zobrist().ko(self.ko_point);
            self.ko_point = NO_POINT;
        }
        self.color_to_play = self.color_to_play.opposite();
        self.passes += 1;
        self.moves.push(PASS);
    }

    /// Places the standard layout of `stones` handicap stones for Black.
    /// Komi becomes zero and White moves next. If any stone cannot be
    /// placed the board is left as it was.
    pub fn set_up_handicap(&mut self, stones: usize) -> anyhow::Result<()> {
        let width = self.geometry.width();
        if !(2..=9).contains(&stones) {
            bail!("handicap must be between 2 and 9 stones, not {stones}");
        }
        if width < 7 {
            bail!("no handicap layout for a {width}x{width} board");
        }
        if stones > 4 && width % 2 == 0 {
            bail!("{stones} handicap stones need an odd board width, not {width}");
        }
        let line = if width >= 13 { 3 } else { 2 };
        let (near, far, mid) = (line, width - 1 - line, width / 2);
        let at = |r, c| self.geometry.at(r, c);
        // Rows count from the top, so D4 is (far, near) on 19x19.
        let (d4, q16, d16, q4) = (at(far, near), at(near, far), at(near, near), at(far, far));
        let (d10, q10, k4, k16, k10) = (
            at(mid, near),
            at(mid, far),
            at(far, mid),
            at(near, mid),
            at(mid, mid),
        );
        let mut layout: ArrayVec<Point, 9> = ArrayVec::new();
        layout.extend([d4, q16]);
        if stones >= 3 {
            layout.push(d16);
        }
        if stones >= 4 {
            layout.push(q4);
        }
        if stones >= 6 {
            layout.extend([d10, q10]);
        }
        if stones >= 8 {
            layout.extend([k4, k16]);
        }
        if stones % 2 == 1 && stones >= 5 {
            layout.push(k10);
        }
        debug_assert_eq!(layout.len(), stones);

        let before = self.clone();
        for p in layout {
            let status = self.place_initial_stone(Color::Black, p);
            if !status.is_ok() {
                *self = before;
                bail!(
                    "cannot place handicap stone at {}: {status}",
                    self.geometry.point_to_string(p)
                );
            }
        }
        self.handicap = stones;
        self.komi = 0.0;
        self.color_to_play = Color::White;
        tracing::debug!(stones, width, "handicap placed");
        Ok(())
    }

    /// Plays a sequence of labelled moves for alternating sides. Stops at
    /// the first illegal move.
    pub fn play_labels<'a>(&mut self, labels: impl IntoIterator<Item = &'a str>) -> anyhow::Result<()> {
        for label in labels {
            let p = self.point(label)?;
            let status = self.play(p);
            if !status.is_ok() {
                bail!("{label}: {status}");
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Legality
    // ---------------------------------------------------------------------

    /// Occupancy, simple ko and suicide.
    fn check_placement(&self, color: Color, p: Point) -> Result<NeighborScan, PlayStatus> {
        debug_assert!(self.geometry.is_on_board(p), "{p} is not on the board");
        if self.colors[p] != Color::Vacant {
            return Err(PlayStatus::Occupied);
        }
        if p == self.ko_point {
            return Err(PlayStatus::KoViolation);
        }
        let scan = self.scan_neighbors(color, p);
        if scan.suicidal {
            return Err(PlayStatus::Suicide);
        }
        Ok(scan)
    }

    /// Every check, in order: game length, occupancy, simple ko, suicide,
    /// positional superko.
    fn check_play(&self, color: Color, p: Point) -> Result<NeighborScan, PlayStatus> {
        if self.turn() + 2 >= self.geometry.max_moves() {
            return Err(PlayStatus::GameTooLong);
        }
        let scan = self.check_placement(color, p)?;
        let proposed = self.hash_after_removing_captured_stones(color, p);
        if self.super_ko_table.contains(proposed) || self.super_ko_table.contains(!proposed) {
            tracing::trace!(
                point = %self.geometry.point_to_string(p),
                %color,
                "superko violation"
            );
            return Err(PlayStatus::KoViolation);
        }
        Ok(scan)
    }

    fn scan_neighbors(&self, color: Color, p: Point) -> NeighborScan {
        let enemy = color.opposite();
        let mut scan = NeighborScan {
            suicidal: true,
            ..NeighborScan::default()
        };
        for &n in self.geometry.orthogonal_neighbors(p) {
            match self.colors[n] {
                Color::Vacant => {
                    scan.liberties.push(n);
                    scan.suicidal = false;
                }
                c if c == color => {
                    let chain = self.chain_ids[n];
                    if !scan.friends.contains(&chain) {
                        scan.friends.push(chain);
                        if self.liberties[chain].len() > 1 {
                            scan.suicidal = false;
                        }
                    }
                }
                c if c == enemy => {
                    let chain = self.chain_ids[n];
                    if !scan.enemies.contains(&chain) {
                        scan.enemies.push(chain);
                        if self.liberties[chain].len() == 1 {
                            scan.suicidal = false;
                        }
                    }
                }
                _ => {}
            }
        }
        scan
    }

    /// The hash the board would have after `color` plays at `p` and its
    /// captures are removed, without the ko point. Complemented when Black
    /// is to move so that it matches what gets stored after the move.
    fn hash_after_removing_captured_stones(&self, color: Color, p: Point) -> u64 {
        let zobrist = self.geometry.zobrist();
        let enemy = color.opposite();
        let mut result = self.hash ^ zobrist.stone(color, p);
        let mut captured: ArrayVec<Point, 4> = ArrayVec::new();
        for &n in self.geometry.orthogonal_neighbors(p) {
            if self.colors[n] != enemy {
                continue;
            }
            let chain = self.chain_ids[n];
            if self.liberties[chain].len() == 1 && !captured.contains(&chain) {
                captured.push(chain);
                for stone in self.chain_stones(chain) {
                    result ^= zobrist.stone(enemy, stone);
                }
            }
        }
        result ^= zobrist.ko(self.ko_point);
        if self.color_to_play == Color::Black {
            !result
        } else {
            result
        }
    }

    /// Records the current position, minus the ko point, for superko.
    fn remember_position(&mut self, complement: bool) {
        let without_ko = self.hash ^ self.geometry.zobrist().ko(self.ko_point);
        self.super_ko_table
            .insert(if complement { !without_ko } else { without_ko });
    }

    // ---------------------------------------------------------------------
    // Placement and fixup
    // ---------------------------------------------------------------------

    fn finalize_play(&mut self, color: Color, p: Point, scan: &NeighborScan, record: bool) {
        let vacant_before = self.vacant_points.len();
        let surrounded = self.neighbor_counts[p].has_max_for(color.opposite());
        self.place_stone(color, p);
        self.adjust_friendly_chains(color, p, scan);
        let last_captured = self.adjust_enemy_chains(color, p, scan);
        let chain = self.chain_ids[p];
        if self.liberties[chain].len() == 1 {
            self.chains_in_atari[color.index()].insert(chain);
        }

        let zobrist = self.geometry.zobrist();
        self.hash ^= zobrist.ko(self.ko_point);
        // Exactly one stone captured, by a stone that was surrounded.
        self.ko_point = if self.vacant_points.len() == vacant_before && surrounded {
            last_captured
        } else {
            NO_POINT
        };
        self.hash ^= zobrist.ko(self.ko_point);

        if record {
            self.color_to_play = color.opposite();
            self.passes = 0;
            self.moves.push(p);
        }
    }

    fn place_stone(&mut self, color: Color, p: Point) {
        self.stone_counts[color.index()] += 1;
        self.colors[p] = color;
        self.hash ^= self.geometry.zobrist().stone(color, p);
        self.vacant_points.remove_present(p);
        for &n in self.geometry.orthogonal_neighbors(p) {
            self.neighbor_counts[n].add_stone(color);
        }
    }

    fn remove_stone(&mut self, s: Point) {
        let color = self.colors[s];
        debug_assert!(color.is_player());
        self.stone_counts[color.index()] -= 1;
        self.hash ^= self.geometry.zobrist().stone(color, s);
        self.colors[s] = Color::Vacant;
        self.vacant_points.insert_absent(s);
        let enemy = color.opposite();
        let mut regained: ArrayVec<Point, 4> = ArrayVec::new();
        for &n in self.geometry.orthogonal_neighbors(s) {
            self.neighbor_counts[n].remove_stone(color);
            if self.colors[n] == enemy {
                let chain = self.chain_ids[n];
                if !regained.contains(&chain) {
                    regained.push(chain);
                }
            }
        }
        for chain in regained {
            self.liberties[chain].insert_absent(s);
            if self.liberties[chain].len() > 1 {
                self.chains_in_atari[enemy.index()].remove(chain);
            }
        }
        self.chain_ids[s] = s;
    }

    fn adjust_friendly_chains(&mut self, color: Color, p: Point, scan: &NeighborScan) {
        let Some((&first, rest)) = scan.friends.split_first() else {
            self.chain_ids[p] = p;
            self.chain_next[p] = p;
            let liberties = &mut self.liberties[p];
            liberties.clear();
            for &liberty in &scan.liberties {
                liberties.insert_absent(liberty);
            }
            return;
        };
        let mut chain = first;
        self.add_stone_to_chain(p, chain);
        for &ally in rest {
            if self.liberties[ally].len() <= self.liberties[chain].len() {
                self.merge_chains(color, chain, ally);
            } else {
                self.merge_chains(color, ally, chain);
                chain = ally;
            }
        }
        for &liberty in &scan.liberties {
            self.liberties[chain].insert(liberty);
        }
        self.liberties[chain].remove_present(p);
        if self.liberties[chain].len() == 1 {
            self.chains_in_atari[color.index()].insert(chain);
        } else {
            self.chains_in_atari[color.index()].remove(chain);
        }
    }

    fn add_stone_to_chain(&mut self, p: Point, chain: Point) {
        self.chain_next[p] = self.chain_next[chain];
        self.chain_next[chain] = p;
        self.chain_ids[p] = chain;
    }

    /// Appends chain `appended` to chain `base`.
    fn merge_chains(&mut self, color: Color, base: Point, appended: Point) {
        let appended_liberties = mem::take(&mut self.liberties[appended]);
        self.liberties[base].union(&appended_liberties);
        self.liberties[appended] = appended_liberties;
        self.chains_in_atari[color.index()].remove(appended);
        let mut stone = appended;
        loop {
            self.chain_ids[stone] = base;
            stone = self.chain_next[stone];
            if stone == appended {
                break;
            }
        }
        self.chain_next.swap(base, appended);
    }

    /// Captures adjacent enemy chains left without liberties and takes `p`
    /// from the others. Returns the last stone captured, or `NO_POINT`.
    fn adjust_enemy_chains(&mut self, color: Color, p: Point, scan: &NeighborScan) -> Point {
        let enemy = color.opposite();
        let mut last_captured = NO_POINT;
        for &chain in &scan.enemies {
            if self.liberties[chain].len() == 1 {
                self.chains_in_atari[enemy.index()].remove(chain);
                let mut stone = chain;
                loop {
                    let next = self.chain_next[stone];
                    self.remove_stone(stone);
                    last_captured = stone;
                    stone = next;
                    if stone == chain {
                        break;
                    }
                }
            } else {
                self.liberties[chain].remove_present(p);
                if self.liberties[chain].len() == 1 {
                    self.chains_in_atari[enemy.index()].insert(chain);
                }
            }
        }
        last_captured
    }

    fn debug_assert_stone_count(&self) {
        debug_assert_eq!(
            self.stone_counts[0] + self.stone_counts[1] + self.vacant_points.len(),
            self.geometry.all_points().len(),
            "stone and vacant counts do not cover the board"
        );
    }
}

/// Pushes `p` unless already present; true once the tally is full.
#[inline]
fn tally_is_full(tally: &mut ArrayVec<Point, 3>, p: Point) -> bool {
    if !tally.contains(&p) {
        tally.push(p);
    }
    tally.is_full()
}

/// Boards are equal when they describe the same game state. Chain ids and
/// list order may differ; the superko table is not compared.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        if self.geometry.width() != other.geometry.width()
            || self.colors != other.colors
            || self.vacant_points.len() != other.vacant_points.len()
            || self.stone_counts != other.stone_counts
            || self.ko_point != other.ko_point
            || self.hash != other.hash
            || self.color_to_play != other.color_to_play
            || self.moves != other.moves
            || self.passes != other.passes
        {
            return false;
        }
        self.geometry
            .all_points()
            .iter()
            .filter(|&&p| self.colors[p].is_player())
            .all(|&p| self.liberties(p) == other.liberties(p))
    }
}
