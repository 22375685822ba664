//! Server match loop - the authoritative state machine for one game
//!
//! A [`Match`] owns the [`GameState`] and both sessions. It awaits exactly
//! one session at a time (the player to move), so moves can never race.
//! Every way out of [`Match::run`] closes both sessions.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::core::{BoardSnapshot, GameState, GameStatus};
use crate::error::MatchError;
use crate::protocol::Message;
use crate::session::Session;
use crate::types::{Color, MatchRequest, Winner};

/// Callbacks for consented actions whose effect lives outside the match
pub trait MatchHooks: Send {
    /// Both players agreed to save
    fn on_save(&mut self, match_id: u64, snapshot: &BoardSnapshot) {
        info!(match_id, black = snapshot.black, white = snapshot.white, "save accepted");
    }

    /// Both players agreed to load
    fn on_load(&mut self, match_id: u64) {
        info!(match_id, "load accepted");
    }
}

/// Hooks that only log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHooks;

impl MatchHooks for LogHooks {}

/// How a match ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Played to the end; results were sent to both players
    Finished { winner: Winner },
    /// Both players agreed to quit
    Quit,
    /// Both players agreed to restart; the game was reset
    Restarted,
}

/// One game between two connected players
pub struct Match<S> {
    id: u64,
    game: GameState,
    black: Session<S>,
    white: Session<S>,
    hooks: Box<dyn MatchHooks>,
}

impl<S> Match<S>
where
    S: AsyncRead + AsyncWrite + Send,
{
    /// A fresh game; `black` moves first
    pub fn new(id: u64, black: Session<S>, white: Session<S>) -> Self {
        Self::with_game(id, GameState::new(), black, white)
    }

    /// Continue from an existing position
    pub fn with_game(id: u64, game: GameState, black: Session<S>, white: Session<S>) -> Self {
        Self {
            id,
            game,
            black,
            white,
            hooks: Box::new(LogHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: impl MatchHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Play the match to its end, then close both sessions
    pub async fn run(mut self) -> Result<MatchOutcome, MatchError> {
        let span = info_span!("match", match_id = self.id);
        async move {
            info!("match started");
            let result = self.play().await;
            match &result {
                Ok(outcome) => info!(?outcome, "match ended"),
                Err(err) => warn!(%err, "match aborted"),
            }

            let Match { black, white, .. } = self;
            for (color, session) in [(Color::Black, black), (Color::White, white)] {
                if let Err(err) = session.close().await {
                    debug!(%color, %err, "close failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    fn session(&mut self, color: Color) -> &mut Session<S> {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    async fn broadcast(&mut self, msg: &Message) -> Result<(), MatchError> {
        self.black.send(msg).await?;
        self.white.send(msg).await?;
        Ok(())
    }

    async fn play(&mut self) -> Result<MatchOutcome, MatchError> {
        loop {
            if let GameStatus::GameOver { winner } = self.game.status() {
                self.announce(winner).await?;
                return Ok(MatchOutcome::Finished { winner });
            }

            let color = self.game.current_player();
            let legal = self.game.possible_moves();
            if legal.is_empty() {
                debug!(%color, "no legal moves, passing");
                // Only fails once the game is over, which was checked above.
                let _ = self.game.pass();
                continue;
            }

            self.session(color).send(&Message::MakeMove(legal)).await?;

            match self.session(color).receive().await? {
                Message::Move { row, col } => match self.game.make_move(row, col) {
                    Ok(flips) => {
                        debug!(%color, row, col, flipped = flips.flip_count(), "move applied");
                        for pos in flips.cells() {
                            self.broadcast(&Message::PieceUpdate {
                                pos,
                                color: flips.color(),
                            })
                            .await?;
                        }
                        let score = Message::MoveMade {
                            black: self.game.black_count(),
                            white: self.game.white_count(),
                        };
                        self.broadcast(&score).await?;
                    }
                    Err(err) => {
                        debug!(%color, %err, "move rejected, prompting again");
                    }
                },
                Message::Pass => {
                    debug!(%color, "player passed");
                    let _ = self.game.pass();
                }
                Message::Consent {
                    request,
                    accept: None,
                } => {
                    if let Some(outcome) = self.negotiate(color, request).await? {
                        return Ok(outcome);
                    }
                }
                other => {
                    return Err(MatchError::UnexpectedVerb {
                        verb: other.verb(),
                        peer: color,
                    })
                }
            }
        }
    }

    /// Forward `request` from `from` to the opponent and act on the answer
    async fn negotiate(
        &mut self,
        from: Color,
        request: MatchRequest,
    ) -> Result<Option<MatchOutcome>, MatchError> {
        let peer = from.opposite();
        debug!(%from, %request, "forwarding request");
        self.session(peer)
            .send(&Message::Consent {
                request,
                accept: None,
            })
            .await?;

        let accept = match self.session(peer).receive().await? {
            Message::Consent {
                request: answered,
                accept: Some(accept),
            } if answered == request => accept,
            other => {
                return Err(MatchError::UnexpectedVerb {
                    verb: other.verb(),
                    peer,
                })
            }
        };
        if !accept {
            return Err(MatchError::ConsentDeclined { request, peer });
        }

        info!(%request, "request accepted");
        match request {
            MatchRequest::Save => self.hooks.on_save(self.id, &self.game.snapshot()),
            MatchRequest::Load => self.hooks.on_load(self.id),
            MatchRequest::Restart => self.game.restart(),
            MatchRequest::Quit => self.game.quit(),
        }
        if !request.ends_match() {
            return Ok(None);
        }
        Ok(Some(match request {
            MatchRequest::Restart => MatchOutcome::Restarted,
            _ => MatchOutcome::Quit,
        }))
    }

    async fn announce(&mut self, winner: Winner) -> Result<(), MatchError> {
        let (to_black, to_white) = match winner {
            Winner::Black => (Message::GameWon, Message::GameLost),
            Winner::White => (Message::GameLost, Message::GameWon),
            Winner::Draw => (Message::GameTied, Message::GameTied),
        };
        self.black.send(&to_black).await?;
        self.white.send(&to_white).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Board;
    use crate::error::{ConnectionError, SessionError};
    use tokio::io::DuplexStream;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_illegal_move_reprompts_same_player() {
        let black = Builder::new()
            .write(b"MAKE_MOVE 2 4 3 5 4 2 5 3\n")
            .read(b"MOVE 0 0\n")
            .write(b"MAKE_MOVE 2 4 3 5 4 2 5 3\n")
            .read(b"QUIT\n")
            .build();
        let white = Builder::new().write(b"QUIT\n").read(b"QUIT true\n").build();

        let outcome = Match::new(1, Session::new(black), Session::new(white))
            .run()
            .await
            .unwrap();
        assert_eq!(outcome, MatchOutcome::Quit);
    }

    #[tokio::test]
    async fn test_declined_request_aborts_match() {
        let black = Builder::new()
            .write(b"MAKE_MOVE 2 4 3 5 4 2 5 3\n")
            .read(b"SAVE\n")
            .build();
        let white = Builder::new().write(b"SAVE\n").read(b"SAVE false\n").build();

        let err = Match::new(2, Session::new(black), Session::new(white))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::ConsentDeclined {
                request: MatchRequest::Save,
                peer: Color::White
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_verb_is_fatal_without_further_messages() {
        let black = Builder::new()
            .write(b"MAKE_MOVE 2 4 3 5 4 2 5 3\n")
            .read(b"RESIGN\n")
            .build();
        let white = Builder::new().build();

        let err = Match::new(3, Session::new(black), Session::new(white))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, MatchError::Session(SessionError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_disconnect_is_fatal() {
        let black = Builder::new().write(b"MAKE_MOVE 2 4 3 5 4 2 5 3\n").build();
        let white = Builder::new().build();

        let err = Match::new(4, Session::new(black), Session::new(white))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::Session(SessionError::Connection(ConnectionError::StreamClosed))
        ));
    }

    #[tokio::test]
    async fn test_finished_game_announces_without_prompting() {
        // Neither side can move: the loop passes twice and reports the result.
        let board = Board::from_grid(
            "BBB.....
             ........
             ........
             ........
             ........
             ........
             ........
             .......W",
            Color::Black,
        )
        .unwrap();
        let game = GameState::from_board(board);
        let black = Builder::new().write(b"GAME_WON\n").build();
        let white = Builder::new().write(b"GAME_LOST\n").build();

        let outcome = Match::with_game(5, game, Session::new(black), Session::new(white))
            .run()
            .await
            .unwrap();
        assert_eq!(
            outcome,
            MatchOutcome::Finished {
                winner: Winner::Black
            }
        );
    }

    struct CountingHooks(std::sync::Arc<std::sync::atomic::AtomicUsize>);

    impl MatchHooks for CountingHooks {
        fn on_save(&mut self, _match_id: u64, snapshot: &BoardSnapshot) {
            assert_eq!(snapshot.black, 2);
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_accepted_save_calls_hook_and_continues() {
        let saves = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let black = Builder::new()
            .write(b"MAKE_MOVE 2 4 3 5 4 2 5 3\n")
            .read(b"SAVE\n")
            .write(b"MAKE_MOVE 2 4 3 5 4 2 5 3\n")
            .read(b"RESTART\n")
            .build();
        let white = Builder::new()
            .write(b"SAVE\n")
            .read(b"SAVE true\n")
            .write(b"RESTART\n")
            .read(b"RESTART true\n")
            .build();

        let outcome = Match::new(6, Session::new(black), Session::new(white))
            .with_hooks(CountingHooks(saves.clone()))
            .run()
            .await
            .unwrap();
        assert_eq!(outcome, MatchOutcome::Restarted);
        assert_eq!(saves.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[allow(dead_code)]
    fn assert_send(m: Match<DuplexStream>) -> impl Send {
        m.run()
    }
}
