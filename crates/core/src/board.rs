//! Board module - the 8x8 grid, move legality and flip computation
//!
//! The board is a flat array of 64 cells in row-major order plus the color
//! of the player to move. Placing a piece flips every contiguous run of
//! opponent pieces that is bounded on the far side by one of the mover's
//! own pieces.
//!
//! Both legality questions the game asks are answered by a single
//! directional walk ([`Board::scan`]):
//!
//! - **Flip search**: from the target cell, a run of opponent pieces ending
//!   on an own piece is flipped.
//! - **Move search**: from an own piece, a run of opponent pieces ending on
//!   an empty cell makes that empty cell a legal target.
//!
//! `place` only mutates the grid and reports a [`FlipSet`]; it never changes
//! whose turn it is. Turn order is owned by
//! [`GameState`](crate::game_state::GameState).

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::moves::MoveSet;
use crate::types::{Cell, Color, Compass, Move, BOARD_SIZE, INITIAL_PIECES, NUM_CELLS};

/// Upper bound on cells flipped by one placement
pub const MAX_FLIPS: usize = NUM_CELLS;

/// Reasons a placement is rejected
///
/// All variants are recoverable: the board is left untouched and the caller
/// may try another cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("move ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },
    #[error("cell {0} is already occupied")]
    Occupied(Move),
    #[error("move {0} does not flip any opponent pieces")]
    NoLegalFlips(Move),
    #[error("the game is already over")]
    GameOver,
}

/// Where a directional walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// Ran off the board
    Edge,
    /// Reached an empty cell
    Empty(Move),
    /// Reached a piece of the scanning color
    Own(Move),
}

/// Result of walking outward from a cell in one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scan {
    /// Number of contiguous opponent pieces passed over
    pub run: u8,
    pub end: ScanEnd,
}

impl Scan {
    /// True if the walk passed over opponent pieces and stopped on an own piece
    pub fn bounded(&self) -> bool {
        self.run > 0 && matches!(self.end, ScanEnd::Own(_))
    }

    /// The empty landing cell behind a run of opponent pieces, if any
    pub fn landing(&self) -> Option<Move> {
        match self.end {
            ScanEnd::Empty(mv) if self.run > 0 => Some(mv),
            _ => None,
        }
    }
}

/// The diff produced by a successful placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipSet {
    placed: Move,
    color: Color,
    flipped: ArrayVec<Move, MAX_FLIPS>,
}

impl FlipSet {
    /// The newly occupied cell
    pub fn placed(&self) -> Move {
        self.placed
    }

    /// Color of the placed piece (and of every flipped piece afterwards)
    pub fn color(&self) -> Color {
        self.color
    }

    /// Cells that changed color
    pub fn flipped(&self) -> &[Move] {
        &self.flipped
    }

    /// Number of flipped cells (the placed cell is not counted)
    pub fn flip_count(&self) -> usize {
        self.flipped.len()
    }

    /// Every cell whose displayed color changed: the placed cell first,
    /// then the flipped cells in scan order.
    pub fn cells(&self) -> impl Iterator<Item = Move> + '_ {
        std::iter::once(self.placed).chain(self.flipped.iter().copied())
    }
}

/// The game board - 8x8 cells plus the player to move
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * 8 + col)
    cells: [Cell; NUM_CELLS],
    current: Color,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a board with the standard opening and Black to move
    pub fn new() -> Self {
        let mut board = Self::empty(Color::Black);
        for (row, col, color) in INITIAL_PIECES {
            board.cells[(row as usize) * (BOARD_SIZE as usize) + col as usize] = Some(color);
        }
        board
    }

    /// Create a board with no pieces
    pub fn empty(current: Color) -> Self {
        Self {
            cells: [None; NUM_CELLS],
            current,
        }
    }

    /// Build a board from an 8x8 text grid
    ///
    /// `B` and `W` are pieces, `.` (or `-`) is empty; whitespace is ignored.
    /// Returns `None` unless exactly 64 cells are given.
    ///
    /// # Examples
    ///
    /// ```
    /// use reversi_core::Board;
    /// use reversi_core::types::Color;
    ///
    /// let board = Board::from_grid(
    ///     "........
    ///      ........
    ///      ........
    ///      ...BW...
    ///      ...WB...
    ///      ........
    ///      ........
    ///      ........",
    ///     Color::Black,
    /// )
    /// .unwrap();
    /// assert_eq!(board, Board::new());
    /// ```
    pub fn from_grid(grid: &str, current: Color) -> Option<Self> {
        let mut board = Self::empty(current);
        let mut i = 0usize;
        for ch in grid.chars().filter(|c| !c.is_whitespace()) {
            if i >= NUM_CELLS {
                return None;
            }
            board.cells[i] = match ch {
                'B' | 'b' => Some(Color::Black),
                'W' | 'w' => Some(Color::White),
                '.' | '-' => None,
                _ => return None,
            };
            i += 1;
        }
        (i == NUM_CELLS).then_some(board)
    }

    /// Color of the player to move
    pub fn current_player(&self) -> Color {
        self.current
    }

    pub fn set_current_player(&mut self, color: Color) {
        self.current = color;
    }

    /// Hand the turn to the other player
    pub fn switch_turn(&mut self) {
        self.current.toggle();
    }

    /// Get the cell at `mv`
    pub fn get(&self, mv: Move) -> Cell {
        self.cells[mv.index()]
    }

    /// Overwrite a cell directly (mirrors and test setups; bypasses the rules)
    pub fn set(&mut self, mv: Move, cell: Cell) {
        self.cells[mv.index()] = cell;
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell; NUM_CELLS] {
        &self.cells
    }

    /// Number of pieces of `color` on the board
    pub fn count(&self, color: Color) -> u8 {
        self.cells.iter().filter(|c| **c == Some(color)).count() as u8
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> u8 {
        self.cells.iter().filter(|c| c.is_some()).count() as u8
    }

    /// Walk outward from `from` (exclusive) in `dir`, counting contiguous
    /// pieces not of `color` until the edge, an empty cell or a `color` piece.
    ///
    /// Bounds are checked on every step, so the walk never indexes outside
    /// the grid.
    pub fn scan(&self, from: Move, dir: Compass, color: Color) -> Scan {
        let mut run = 0u8;
        let mut pos = from;
        loop {
            pos = match pos.step(dir) {
                Some(next) => next,
                None => {
                    return Scan {
                        run,
                        end: ScanEnd::Edge,
                    }
                }
            };
            match self.cells[pos.index()] {
                None => {
                    return Scan {
                        run,
                        end: ScanEnd::Empty(pos),
                    }
                }
                Some(c) if c == color => {
                    return Scan {
                        run,
                        end: ScanEnd::Own(pos),
                    }
                }
                Some(_) => run += 1,
            }
        }
    }

    /// Cells that would flip if `color` played at `mv`
    ///
    /// Does not check that `mv` is empty.
    pub fn flips_for(&self, mv: Move, color: Color) -> ArrayVec<Move, MAX_FLIPS> {
        let mut flips = ArrayVec::new();
        for dir in Compass::ALL {
            let scan = self.scan(mv, dir, color);
            if !scan.bounded() {
                continue;
            }
            let mut pos = mv;
            for _ in 0..scan.run {
                match pos.step(dir) {
                    Some(next) => {
                        pos = next;
                        flips.push(pos);
                    }
                    None => break,
                }
            }
        }
        flips
    }

    /// Place a piece for the current player at (row, col)
    ///
    /// On success the piece is placed, every bounded opponent run is flipped
    /// and the diff is returned. On error the board is unchanged. The
    /// current player is not changed either way.
    pub fn place(&mut self, row: i32, col: i32) -> Result<FlipSet, MoveError> {
        let mv = Move::from_signed(row, col).ok_or(MoveError::OutOfBounds { row, col })?;
        if self.get(mv).is_some() {
            return Err(MoveError::Occupied(mv));
        }

        let color = self.current;
        let flipped = self.flips_for(mv, color);
        if flipped.is_empty() {
            return Err(MoveError::NoLegalFlips(mv));
        }

        self.cells[mv.index()] = Some(color);
        for pos in &flipped {
            if let Some(piece) = self.cells[pos.index()].as_mut() {
                piece.toggle();
            }
        }

        Ok(FlipSet {
            placed: mv,
            color,
            flipped,
        })
    }

    /// Every empty cell where `color` could legally play
    ///
    /// Walks out from each of `color`'s pieces; a direction yields a
    /// candidate when it crosses one or more opponent pieces and then
    /// reaches an empty cell.
    pub fn possible_moves(&self, color: Color) -> MoveSet {
        let mut moves = MoveSet::new();
        for (index, cell) in self.cells.iter().enumerate() {
            if *cell != Some(color) {
                continue;
            }
            let Some(from) = Move::from_index(index) else {
                continue;
            };
            for dir in Compass::ALL {
                if let Some(landing) = self.scan(from, dir, color).landing() {
                    moves.insert(landing);
                }
            }
        }
        moves
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{}", row)?;
            for col in 0..BOARD_SIZE {
                let idx = (row as usize) * (BOARD_SIZE as usize) + col as usize;
                let glyph = self.cells[idx].map(|c| c.glyph()).unwrap_or('.');
                write!(f, " {}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
