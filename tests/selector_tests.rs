//! Move selector tests - bots in local play

use reversi::core::{Board, GameState, GameStatus, MoveSet};
use reversi::engine::{play_from, play_local, MaxFlipSelector, MoveSelector, RandomSelector};
use reversi::types::{Color, MatchRequest, Move, Winner};

#[test]
fn test_random_selector_only_picks_legal_moves() {
    let mut selector = RandomSelector::new(77);
    let mut game = GameState::new();
    while !game.is_game_over() {
        let legal = game.possible_moves();
        match selector.select(&legal, game.board()) {
            Some(mv) => {
                assert!(legal.contains(mv));
                game.make_move(mv.row() as i32, mv.col() as i32).unwrap();
            }
            None => {
                assert!(legal.is_empty());
                game.pass().unwrap();
            }
        }
    }
}

#[test]
fn test_max_flip_picks_a_maximal_capture() {
    let mut selector = MaxFlipSelector::new();
    let mut game = GameState::new();
    let mut random = RandomSelector::new(3);
    for turn in 0..30 {
        if game.is_game_over() {
            break;
        }
        let legal = game.possible_moves();
        let board = game.board().clone();
        let color = board.current_player();
        let chosen = if turn % 2 == 0 {
            let Some(mv) = selector.select(&legal, &board) else {
                game.pass().unwrap();
                continue;
            };
            let best = legal
                .iter()
                .map(|m| board.flips_for(m, color).len())
                .max()
                .unwrap();
            assert_eq!(board.flips_for(mv, color).len(), best);
            mv
        } else {
            match random.select(&legal, &board) {
                Some(mv) => mv,
                None => {
                    game.pass().unwrap();
                    continue;
                }
            }
        };
        game.make_move(chosen.row() as i32, chosen.col() as i32).unwrap();
    }
}

#[test]
fn test_bots_decline_requests_by_default() {
    assert!(!RandomSelector::new(1).consent(MatchRequest::Quit));
    assert!(!MaxFlipSelector::new().consent(MatchRequest::Save));
}

#[test]
fn test_local_games_finish_for_many_seeds() {
    for seed in 1..25 {
        let snap = play_local(&mut RandomSelector::new(seed), &mut MaxFlipSelector::new());
        let GameStatus::GameOver { winner } = snap.status else {
            panic!("seed {} did not finish", seed);
        };
        assert_eq!(winner, Winner::from_counts(snap.black, snap.white));
    }
}

/// Always tries an occupied cell
struct Stubborn;

impl MoveSelector for Stubborn {
    fn name(&self) -> &str {
        "stubborn"
    }

    fn select(&mut self, _legal: &MoveSet, _board: &Board) -> Option<Move> {
        Move::new(3, 3)
    }
}

#[test]
fn test_rejected_local_move_counts_as_pass() {
    let mut game = GameState::new();
    play_from(&mut game, &mut Stubborn, &mut Stubborn);
    assert_eq!(
        game.status(),
        GameStatus::GameOver {
            winner: Winner::Draw
        }
    );
    assert_eq!(game.board().count(Color::Black), 2);
}
