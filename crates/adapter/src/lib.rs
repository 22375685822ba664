//! Adapter - networked play over a line-oriented TCP protocol
//!
//! The server pairs connections into matches and runs the authoritative
//! game; clients mirror what the server pushes and send move requests.
//!
//! # Protocol Overview
//!
//! Each message is one ASCII line: a verb and space-separated arguments.
//!
//! ## Server -> Client
//!
//! - **WELCOME** `<bool>`: true if the receiver plays Black (Black moves first)
//! - **MAKE_MOVE** `(<row> <col>)*`: your turn, with the legal moves
//! - **PIECE_UPDATE** `<row> <col> <BLACK|WHITE>`: one cell changed color
//! - **MOVE_MADE** `<black> <white>`: scores after a move
//! - **GAME_WON** / **GAME_LOST** / **GAME_TIED**: final result for the receiver
//!
//! ## Client -> Server
//!
//! - **MOVE** `<row> <col>`: move request
//! - **PASS**: give up the turn
//!
//! ## Both ways
//!
//! - **SAVE** / **LOAD** / **RESTART** / **QUIT** `[<bool>]`: the player to move
//!   sends the bare verb, the server forwards it to the opponent, who answers
//!   with the verb and `true` or `false`.
//!
//! # Environment Variables
//!
//! - `REVERSI_HOST`: Bind / connect address (default: "127.0.0.1")
//! - `REVERSI_PORT`: Port number (default: 7777)
//! - `REVERSI_LOG_PATH`: Server only; append every protocol line as JSON
//!
//! # Example Protocol Flow
//!
//! ```text
//! Server -> Black: WELCOME true
//! Server -> White: WELCOME false
//! Server -> Black: MAKE_MOVE 2 4 3 5 4 2 5 3
//! Black -> Server: MOVE 2 4
//! Server -> both:  PIECE_UPDATE 2 4 BLACK
//! Server -> both:  PIECE_UPDATE 3 4 BLACK
//! Server -> both:  MOVE_MADE 4 1
//! Server -> White: MAKE_MOVE 2 3 2 5 4 5
//! ```
//!
//! # Testing
//!
//! Connect to a running server using netcat for manual testing:
//!
//! ```bash
//! nc 127.0.0.1 7777
//! ```

pub mod client;
pub mod error;
pub mod match_loop;
pub mod protocol;
pub mod runtime;
pub mod server;
pub mod session;
pub mod wire_log;

pub use reversi_core as core;
pub use reversi_engine as engine;
pub use reversi_types as types;

pub use client::{
    connect, spawn_client, Client, ClientConfig, ClientEvent, ClientHandle, ClientState,
    GameOutcome,
};
pub use error::{ClientError, ConnectionError, MatchError, ProtocolError, SessionError};
pub use match_loop::{LogHooks, Match, MatchHooks, MatchOutcome};
pub use protocol::{parse_message, Message};
pub use runtime::run_player;
pub use server::{run_server, ServerConfig};
pub use session::{Session, SessionReader, SessionWriter};
pub use wire_log::{WireLog, WireRecord};
