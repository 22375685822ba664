//! Player runtime - drives a [`MoveSelector`] from client events
//!
//! Runs on a plain thread: it blocks on the next event instead of polling
//! shared state, and answers each turn or request through the handle.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::{ClientEvent, ClientHandle, GameOutcome};
use crate::engine::MoveSelector;
use crate::error::ClientError;

/// Play until the game ends or the connection drops
///
/// Returns the outcome, or `None` if the connection ended first. Must not
/// be called from inside an async context.
pub fn run_player(
    selector: &mut dyn MoveSelector,
    handle: &ClientHandle,
    events: &mut mpsc::UnboundedReceiver<ClientEvent>,
) -> Option<GameOutcome> {
    while let Some(event) = events.blocking_recv() {
        let sent = match event {
            ClientEvent::Welcomed { color } => {
                info!(player = selector.name(), %color, "joined game");
                Ok(())
            }
            ClientEvent::TurnStarted { legal, board } => {
                if handle.state().legal != legal {
                    // A newer prompt (or our own echo) already replaced this one.
                    debug!("skipping stale turn");
                    continue;
                }
                match selector.select(&legal, &board) {
                    Some(mv) => match handle.play(mv) {
                        Err(ClientError::IllegalMove(_)) => {
                            warn!(%mv, "selector chose an illegal move, passing");
                            handle.pass()
                        }
                        other => other,
                    },
                    None => handle.pass(),
                }
            }
            ClientEvent::ConsentRequested { request } => {
                let accept = selector.consent(request);
                debug!(%request, accept, "answering request");
                handle.respond(accept)
            }
            ClientEvent::GameEnded { outcome } => {
                info!(?outcome, "game over");
                return Some(outcome);
            }
            ClientEvent::Disconnected => return None,
            ClientEvent::PieceChanged { .. } | ClientEvent::ScoreChanged { .. } => Ok(()),
        };

        match sent {
            Ok(()) => {}
            Err(ClientError::Disconnected) => return None,
            Err(ClientError::NotYourTurn) => debug!("turn already answered"),
            Err(err) => warn!(%err, "action rejected locally"),
        }
    }
    None
}
