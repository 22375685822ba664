//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the Reversi rules and state management. It has
//! **zero dependencies** on networking or I/O, so the same engine backs the
//! authoritative match server, the client-side mirror and local self-play.
//!
//! # Module Structure
//!
//! - [`board`]: 8x8 grid, the directional scan, flip computation and move generation
//! - [`moves`]: bitmask-backed set of coordinates
//! - [`game_state`]: scores, pass counting, end of game and winner
//! - [`snapshot`]: immutable copies handed to outside readers
//! - [`rng`]: deterministic LCG for reproducible random players
//!
//! # Game Rules
//!
//! - Black moves first from the standard four-piece opening.
//! - A move must flip at least one opponent run bounded by the mover's piece.
//! - A player with no legal move passes; two consecutive passes, or a full
//!   board, end the game.
//! - The player with more pieces wins; equal counts are a draw.
//!
//! # Example
//!
//! ```
//! use reversi_core::GameState;
//! use reversi_core::types::{Color, Move};
//!
//! let mut game = GameState::new();
//! let opening: Vec<Move> = game.possible_moves().iter().collect();
//! assert_eq!(opening.len(), 4);
//!
//! let flips = game.make_move(2, 4).unwrap();
//! assert_eq!(flips.flip_count(), 1);
//! assert_eq!(game.current_player(), Color::White);
//! assert_eq!((game.black_count(), game.white_count()), (4, 1));
//! ```

pub mod board;
pub mod game_state;
pub mod moves;
pub mod rng;
pub mod snapshot;

pub use reversi_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, FlipSet, MoveError, Scan, ScanEnd};
pub use game_state::{GameState, GameStatus};
pub use moves::MoveSet;
pub use rng::SimpleRng;
pub use snapshot::BoardSnapshot;
