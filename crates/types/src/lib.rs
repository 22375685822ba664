//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no I/O, so they can be used by the board
//! engine, the match server and the client adapter alike.
//!
//! # Board Geometry
//!
//! Reversi is played on a fixed 8x8 grid:
//!
//! - **Rows**: 0-7, top to bottom
//! - **Columns**: 0-7, left to right
//! - **Opening**: (3,3)=Black, (3,4)=White, (4,3)=White, (4,4)=Black
//!
//! # Examples
//!
//! ```
//! use reversi_types::{Color, Compass, Move, Winner, BOARD_SIZE};
//!
//! // Colors parse from their wire spelling
//! assert_eq!(Color::from_str("BLACK"), Some(Color::Black));
//! assert_eq!(Color::Black.opposite(), Color::White);
//!
//! // Moves are always inside the board
//! let mv = Move::new(2, 3).unwrap();
//! assert_eq!(mv.step(Compass::S), Move::new(3, 3));
//! assert_eq!(Move::new(BOARD_SIZE, 0), None);
//!
//! // Equal counts are a draw
//! assert_eq!(Winner::from_counts(32, 32), Winner::Draw);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board side length (8 rows, 8 columns)
pub const BOARD_SIZE: u8 = 8;

/// Total number of cells on the board
pub const NUM_CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Starting pieces, in the order they are laid out on a fresh board
pub const INITIAL_PIECES: [(u8, u8, Color); 4] = [
    (3, 3, Color::Black),
    (3, 4, Color::White),
    (4, 3, Color::White),
    (4, 4, Color::Black),
];

/// Piece color (and, by extension, the player owning it)
///
/// Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other color
    pub fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Flip this piece in place to the opposite color
    ///
    /// # Examples
    ///
    /// ```
    /// use reversi_types::Color;
    ///
    /// let mut piece = Color::White;
    /// piece.toggle();
    /// assert_eq!(piece, Color::Black);
    /// ```
    pub fn toggle(&mut self) {
        *self = self.opposite();
    }

    /// Parse the wire spelling (`BLACK` / `WHITE`)
    ///
    /// The protocol is case-sensitive, so lowercase spellings are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use reversi_types::Color;
    ///
    /// assert_eq!(Color::from_str("WHITE"), Some(Color::White));
    /// assert_eq!(Color::from_str("white"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "BLACK" => Some(Color::Black),
            "WHITE" => Some(Color::White),
            _ => None,
        }
    }

    /// Wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => "BLACK",
            Color::White => "WHITE",
        }
    }

    /// Single-character glyph used by the text board
    pub fn glyph(&self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell on the board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Cell holding a piece of that color
pub type Cell = Option<Color>;

/// The eight compass directions used by the directional scans
///
/// ```text
///          N
///      NW     NE
///   W      X      E
///      SW     SE
///          S
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Compass {
    /// All directions, in scan order
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::S,
        Compass::E,
        Compass::W,
        Compass::NE,
        Compass::NW,
        Compass::SE,
        Compass::SW,
    ];

    /// Unit (row, col) increment for this direction
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Compass::N => (-1, 0),
            Compass::S => (1, 0),
            Compass::E => (0, 1),
            Compass::W => (0, -1),
            Compass::NE => (-1, 1),
            Compass::NW => (-1, -1),
            Compass::SE => (1, 1),
            Compass::SW => (1, -1),
        }
    }
}

/// A board coordinate, guaranteed to be inside the 8x8 grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    row: u8,
    col: u8,
}

impl Move {
    /// Create a move, returning `None` if either coordinate is off the board
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Create a move from signed coordinates (as received from a peer)
    pub fn from_signed(row: i32, col: i32) -> Option<Self> {
        let row = u8::try_from(row).ok()?;
        let col = u8::try_from(col).ok()?;
        Self::new(row, col)
    }

    /// Create a move from a row-major flat index (0..64)
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= NUM_CELLS {
            return None;
        }
        let size = BOARD_SIZE as usize;
        Some(Self {
            row: (index / size) as u8,
            col: (index % size) as u8,
        })
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// Row-major flat index (row * 8 + col)
    #[inline(always)]
    pub fn index(&self) -> usize {
        (self.row as usize) * (BOARD_SIZE as usize) + (self.col as usize)
    }

    /// The adjacent coordinate in `dir`, or `None` past the board edge
    #[inline]
    pub fn step(&self, dir: Compass) -> Option<Self> {
        let (dr, dc) = dir.delta();
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Final result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Black,
    White,
    Draw,
}

impl Winner {
    /// Decide the winner from final piece counts
    ///
    /// # Examples
    ///
    /// ```
    /// use reversi_types::Winner;
    ///
    /// assert_eq!(Winner::from_counts(40, 24), Winner::Black);
    /// assert_eq!(Winner::from_counts(10, 54), Winner::White);
    /// assert_eq!(Winner::from_counts(2, 2), Winner::Draw);
    /// ```
    pub fn from_counts(black: u8, white: u8) -> Self {
        use std::cmp::Ordering;
        match black.cmp(&white) {
            Ordering::Greater => Winner::Black,
            Ordering::Less => Winner::White,
            Ordering::Equal => Winner::Draw,
        }
    }

    /// The winning color, if the game was not drawn
    pub fn color(&self) -> Option<Color> {
        match self {
            Winner::Black => Some(Color::Black),
            Winner::White => Some(Color::White),
            Winner::Draw => None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Black => f.write_str("Black won"),
            Winner::White => f.write_str("White won"),
            Winner::Draw => f.write_str("Draw"),
        }
    }
}

/// Match-level actions that need both players' consent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchRequest {
    Save,
    Load,
    Restart,
    Quit,
}

impl MatchRequest {
    pub const ALL: [MatchRequest; 4] = [
        MatchRequest::Save,
        MatchRequest::Load,
        MatchRequest::Restart,
        MatchRequest::Quit,
    ];

    /// Parse the wire verb (`SAVE`, `LOAD`, `RESTART`, `QUIT`)
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SAVE" => Some(MatchRequest::Save),
            "LOAD" => Some(MatchRequest::Load),
            "RESTART" => Some(MatchRequest::Restart),
            "QUIT" => Some(MatchRequest::Quit),
            _ => None,
        }
    }

    /// Wire verb
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchRequest::Save => "SAVE",
            MatchRequest::Load => "LOAD",
            MatchRequest::Restart => "RESTART",
            MatchRequest::Quit => "QUIT",
        }
    }

    /// True if accepting this request ends the match
    pub fn ends_match(&self) -> bool {
        matches!(self, MatchRequest::Restart | MatchRequest::Quit)
    }
}

impl fmt::Display for MatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_request_verbs() {
        for req in MatchRequest::ALL {
            assert_eq!(MatchRequest::from_str(req.as_str()), Some(req));
        }
        assert_eq!(MatchRequest::from_str("save"), None);
        assert!(MatchRequest::Quit.ends_match());
        assert!(!MatchRequest::Save.ends_match());
    }

    #[test]
    fn test_compass_deltas_are_unit_and_nonzero() {
        for dir in Compass::ALL {
            let (dr, dc) = dir.delta();
            assert!(dr.abs() <= 1 && dc.abs() <= 1);
            assert!(dr != 0 || dc != 0, "{:?} must move", dir);
        }
    }

    #[test]
    fn test_compass_directions_are_distinct() {
        for (i, a) in Compass::ALL.iter().enumerate() {
            for b in &Compass::ALL[i + 1..] {
                assert_ne!(a.delta(), b.delta());
            }
        }
    }

    #[test]
    fn test_move_bounds() {
        assert!(Move::new(0, 0).is_some());
        assert!(Move::new(7, 7).is_some());
        assert!(Move::new(8, 0).is_none());
        assert!(Move::new(0, 8).is_none());
        assert!(Move::from_signed(-1, 3).is_none());
        assert!(Move::from_signed(3, 300).is_none());
        assert_eq!(Move::from_signed(2, 3), Move::new(2, 3));
    }

    #[test]
    fn test_move_index_round_trip() {
        for i in 0..NUM_CELLS {
            let mv = Move::from_index(i).unwrap();
            assert_eq!(mv.index(), i);
        }
        assert!(Move::from_index(NUM_CELLS).is_none());
    }

    #[test]
    fn test_step_stops_at_edges() {
        let corner = Move::new(0, 0).unwrap();
        assert_eq!(corner.step(Compass::N), None);
        assert_eq!(corner.step(Compass::W), None);
        assert_eq!(corner.step(Compass::NW), None);
        assert_eq!(corner.step(Compass::SE), Move::new(1, 1));

        let far = Move::new(7, 7).unwrap();
        assert_eq!(far.step(Compass::S), None);
        assert_eq!(far.step(Compass::E), None);
        assert_eq!(far.step(Compass::NW), Move::new(6, 6));
    }

    #[test]
    fn test_color_toggle_and_wire_names() {
        let mut c = Color::Black;
        c.toggle();
        assert_eq!(c, Color::White);
        c.toggle();
        assert_eq!(c, Color::Black);

        for color in [Color::Black, Color::White] {
            assert_eq!(Color::from_str(color.as_str()), Some(color));
        }
    }

    #[test]
    fn test_winner_color() {
        assert_eq!(Winner::Black.color(), Some(Color::Black));
        assert_eq!(Winner::White.color(), Some(Color::White));
        assert_eq!(Winner::Draw.color(), None);
    }
}
