//! Game state module - score tracking, passes and end of game
//!
//! [`GameState`] exclusively owns the [`Board`] and is the only thing that
//! advances turns. Outside readers get a shared borrow or a
//! [`BoardSnapshot`] copy, never a mutable alias.
//!
//! # Lifecycle
//!
//! - `make_move` resets the pass counter, updates the running counts,
//!   switches the player and then either ends the game (board full) or
//!   auto-passes when the new player has no legal move.
//! - `pass` increments the pass counter; the second consecutive pass ends
//!   the game, otherwise the turn moves to the other player.
//! - `restart` returns to the opening position.

use serde::{Deserialize, Serialize};

use crate::board::{Board, FlipSet, MoveError};
use crate::moves::MoveSet;
use crate::snapshot::BoardSnapshot;
use crate::types::{Color, Winner, NUM_CELLS};

/// Consecutive passes that end the game
pub const PASSES_TO_END: u8 = 2;

/// Whether the game is still being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    GameOver { winner: Winner },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    black: u8,
    white: u8,
    /// Consecutive passes since the last successful move
    passes: u8,
    status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create a game at the opening position
    pub fn new() -> Self {
        let board = Board::new();
        Self {
            black: board.count(Color::Black),
            white: board.count(Color::White),
            board,
            passes: 0,
            status: GameStatus::InProgress,
        }
    }

    /// Resume from an arbitrary position (counts are derived from the board)
    pub fn from_board(board: Board) -> Self {
        Self {
            black: board.count(Color::Black),
            white: board.count(Color::White),
            board,
            passes: 0,
            status: GameStatus::InProgress,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.board.current_player()
    }

    pub fn black_count(&self) -> u8 {
        self.black
    }

    pub fn white_count(&self) -> u8 {
        self.white
    }

    pub fn pass_count(&self) -> u8 {
        self.passes
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, GameStatus::GameOver { .. })
    }

    /// Winner by current counts (final once the game is over)
    pub fn winner(&self) -> Winner {
        Winner::from_counts(self.black, self.white)
    }

    /// Legal moves for the player to move
    pub fn possible_moves(&self) -> MoveSet {
        self.board.possible_moves(self.board.current_player())
    }

    /// Play (row, col) for the current player
    ///
    /// Board errors are returned unchanged and leave the game untouched.
    pub fn make_move(&mut self, row: i32, col: i32) -> Result<FlipSet, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }

        let flips = self.board.place(row, col)?;
        self.passes = 0;

        let flipped = flips.flip_count() as u8;
        match flips.color() {
            Color::Black => {
                self.black += 1 + flipped;
                self.white -= flipped;
            }
            Color::White => {
                self.white += 1 + flipped;
                self.black -= flipped;
            }
        }
        debug_assert_eq!(self.black, self.board.count(Color::Black));
        debug_assert_eq!(self.white, self.board.count(Color::White));

        self.board.switch_turn();

        if self.black as usize + self.white as usize == NUM_CELLS {
            self.finish();
        } else if self.possible_moves().is_empty() {
            self.pass_turn();
        }

        Ok(flips)
    }

    /// Forfeit the current player's turn
    pub fn pass(&mut self) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        self.pass_turn();
        Ok(())
    }

    fn pass_turn(&mut self) {
        self.passes += 1;
        if self.passes >= PASSES_TO_END {
            self.finish();
        } else {
            self.board.switch_turn();
        }
    }

    fn finish(&mut self) {
        self.status = GameStatus::GameOver {
            winner: self.winner(),
        };
    }

    /// End the game early (both players agreed to quit)
    pub fn quit(&mut self) {
        if !self.is_game_over() {
            self.finish();
        }
    }

    /// Reset to the opening position
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Immutable copy of the current position
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&self.board, self.black, self.white, self.status)
    }
}
