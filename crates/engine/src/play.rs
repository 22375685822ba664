//! Local play - two selectors on one board, no network

use tracing::{debug, info};

use crate::core::{BoardSnapshot, GameState};
use crate::select::MoveSelector;
use crate::types::Color;

/// Play a whole game between `black` and `white` and return the final position
///
/// A selector that answers `None` passes. So does one whose pick is rejected
/// by the rules; a local game cannot stall on a buggy player.
pub fn play_local(black: &mut dyn MoveSelector, white: &mut dyn MoveSelector) -> BoardSnapshot {
    let mut game = GameState::new();
    play_from(&mut game, black, white);
    game.snapshot()
}

/// Drive `game` to completion from its current position
pub fn play_from(game: &mut GameState, black: &mut dyn MoveSelector, white: &mut dyn MoveSelector) {
    info!(black = black.name(), white = white.name(), "local game started");

    while !game.is_game_over() {
        let color = game.current_player();
        let player: &mut dyn MoveSelector = match color {
            Color::Black => &mut *black,
            Color::White => &mut *white,
        };

        let legal = game.possible_moves();
        let choice = if legal.is_empty() {
            None
        } else {
            player.select(&legal, game.board())
        };

        let played = match choice {
            Some(mv) => match game.make_move(mv.row() as i32, mv.col() as i32) {
                Ok(flips) => {
                    debug!(%color, %mv, flipped = flips.flip_count(), "move");
                    true
                }
                Err(err) => {
                    debug!(%color, %mv, %err, "rejected move, passing");
                    false
                }
            },
            None => false,
        };

        if !played {
            debug!(%color, "pass");
            // Only fails once the game is over, which the loop condition rules out.
            let _ = game.pass();
        }
    }

    info!(
        winner = %game.winner(),
        black = game.black_count(),
        white = game.white_count(),
        "local game finished"
    );
}
