//! Move selection strategies
//!
//! Every kind of player (random bot, greedy bot, a human typing or clicking)
//! is a [`MoveSelector`]. The driver handing out turns does not care which.

use std::sync::mpsc;

use tracing::debug;

use crate::core::{Board, MoveSet, SimpleRng};
use crate::types::{MatchRequest, Move};

/// Something that can choose a move when it is its turn
pub trait MoveSelector {
    /// Short label for logs
    fn name(&self) -> &str;

    /// Choose one of `legal` for the player to move on `board`
    ///
    /// Returning `None` means "pass".
    fn select(&mut self, legal: &MoveSet, board: &Board) -> Option<Move>;

    /// Answer a save/load/restart/quit request from the opponent
    fn consent(&mut self, _request: MatchRequest) -> bool {
        false
    }
}

impl<S: MoveSelector + ?Sized> MoveSelector for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn select(&mut self, legal: &MoveSet, board: &Board) -> Option<Move> {
        (**self).select(legal, board)
    }

    fn consent(&mut self, request: MatchRequest) -> bool {
        (**self).consent(request)
    }
}

/// Uniformly random legal move
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: SimpleRng,
}

impl RandomSelector {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }
}

impl MoveSelector for RandomSelector {
    fn name(&self) -> &str {
        "random"
    }

    fn select(&mut self, legal: &MoveSet, _board: &Board) -> Option<Move> {
        self.rng.pick(legal)
    }
}

/// Greedy: the move flipping the most pieces right now
///
/// Ties go to the first move in row-major order.
#[derive(Debug, Clone, Default)]
pub struct MaxFlipSelector;

impl MaxFlipSelector {
    pub fn new() -> Self {
        Self
    }
}

impl MoveSelector for MaxFlipSelector {
    fn name(&self) -> &str {
        "max-flip"
    }

    fn select(&mut self, legal: &MoveSet, board: &Board) -> Option<Move> {
        let color = board.current_player();
        let mut best: Option<(Move, usize)> = None;
        for mv in legal {
            let flips = board.flips_for(mv, color).len();
            if best.map_or(true, |(_, n)| flips > n) {
                best = Some((mv, flips));
            }
        }
        if let Some((mv, n)) = best {
            debug!(%mv, flips = n, "max-flip chose move");
        }
        best.map(|(mv, _)| mv)
    }
}

/// What a human front end can send to a [`HumanSelector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanInput {
    Play(Move),
    Pass,
    Consent(bool),
}

/// A person choosing moves through some UI
///
/// Blocks the calling thread until the UI sends the next input. Moves that
/// are not in the legal set are skipped and the selector keeps waiting. A
/// closed channel is treated as a pass (and as declining any request).
#[derive(Debug)]
pub struct HumanSelector {
    rx: mpsc::Receiver<HumanInput>,
}

impl HumanSelector {
    /// Create the selector and the sender its UI writes to
    pub fn channel() -> (mpsc::Sender<HumanInput>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl MoveSelector for HumanSelector {
    fn name(&self) -> &str {
        "human"
    }

    fn select(&mut self, legal: &MoveSet, _board: &Board) -> Option<Move> {
        while let Ok(input) = self.rx.recv() {
            match input {
                HumanInput::Play(mv) if legal.contains(mv) => return Some(mv),
                HumanInput::Play(mv) => debug!(%mv, "ignoring illegal move from human"),
                HumanInput::Pass => return None,
                HumanInput::Consent(_) => {}
            }
        }
        None
    }

    fn consent(&mut self, _request: MatchRequest) -> bool {
        while let Ok(input) = self.rx.recv() {
            if let HumanInput::Consent(accept) = input {
                return accept;
            }
        }
        false
    }
}
