//! Immutable copies of a position, for readers outside the game loop.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::game_state::GameStatus;
use crate::types::{Cell, Color, Move, BOARD_SIZE};

const SIZE: usize = BOARD_SIZE as usize;

/// A detached copy of the board, counts and status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// `cells[row][col]`
    pub cells: [[Cell; SIZE]; SIZE],
    pub current: Color,
    pub black: u8,
    pub white: u8,
    pub status: GameStatus,
}

impl BoardSnapshot {
    pub fn capture(board: &Board, black: u8, white: u8, status: GameStatus) -> Self {
        let mut cells = [[None; SIZE]; SIZE];
        for (i, cell) in board.cells().iter().enumerate() {
            cells[i / SIZE][i % SIZE] = *cell;
        }
        Self {
            cells,
            current: board.current_player(),
            black,
            white,
            status,
        }
    }

    pub fn get(&self, mv: Move) -> Cell {
        self.cells[mv.row() as usize][mv.col() as usize]
    }

    /// Rebuild a board from this snapshot
    pub fn to_board(&self) -> Board {
        let mut board = Board::empty(self.current);
        for (row, cols) in self.cells.iter().enumerate() {
            for (col, cell) in cols.iter().enumerate() {
                if let Some(mv) = Move::new(row as u8, col as u8) {
                    board.set(mv, *cell);
                }
            }
        }
        board
    }
}
