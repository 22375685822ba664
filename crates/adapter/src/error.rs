//! Error taxonomy for the networked game
//!
//! Board-level `MoveError`s never show up here: a rejected move is answered
//! by re-prompting the same player. Everything in this module ends the
//! connection (and, on the server, the whole match).

use thiserror::Error;

use crate::types::{Color, MatchRequest, Move};

/// Ill-formed or out-of-sequence input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Unknown verb, empty line, or an argument that does not parse
    #[error("malformed message: {line:?}")]
    MalformedMessage { line: String },
    /// A well-formed message that is not valid in this direction or phase
    #[error("unexpected {verb} message")]
    UnexpectedVerb { verb: &'static str },
    #[error("{verb} does not take {got} argument(s)")]
    ArityMismatch { verb: &'static str, got: usize },
}

impl ProtocolError {
    pub(crate) fn malformed(line: &str) -> Self {
        ProtocolError::MalformedMessage {
            line: line.to_string(),
        }
    }
}

/// Transport failures
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("peer closed the stream")]
    StreamClosed,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything a session can fail with
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Connection(ConnectionError::Io(err))
    }
}

impl SessionError {
    /// True if the peer simply went away
    pub fn is_stream_closed(&self) -> bool {
        matches!(self, SessionError::Connection(ConnectionError::StreamClosed))
    }
}

/// Why a match was torn down before reaching a result
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{request} was declined by {peer}")]
    ConsentDeclined { request: MatchRequest, peer: Color },
    #[error("unexpected {verb} from {peer}")]
    UnexpectedVerb { verb: &'static str, peer: Color },
}

impl From<ConnectionError> for MatchError {
    fn from(err: ConnectionError) -> Self {
        MatchError::Session(err.into())
    }
}

impl From<ProtocolError> for MatchError {
    fn from(err: ProtocolError) -> Self {
        MatchError::Session(err.into())
    }
}

/// Local rejections by a client handle (nothing is sent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("it is not this player's turn")]
    NotYourTurn,
    #[error("{0} is not in the legal move set")]
    IllegalMove(Move),
    #[error("no consent request is pending")]
    NoPendingRequest,
    #[error("connection to the server is gone")]
    Disconnected,
}
