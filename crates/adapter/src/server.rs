//! TCP server - pairs incoming connections into matches
//!
//! Connections are taken two at a time. The first of a pair is told it plays
//! Black as soon as it connects, the second that it plays White; the pair
//! then runs as an independent [`Match`] on its own task.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::match_loop::Match;
use crate::protocol::Message;
use crate::session::Session;
use crate::types::Color;
use crate::wire_log::WireLog;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Append every protocol line as JSON to this file
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            log_path: None,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("REVERSI_HOST").unwrap_or(defaults.host);
        let port = env::var("REVERSI_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let log_path = env::var("REVERSI_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            log_path,
        }
    }

    /// `host:port` for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accept connections forever, starting a match for every pair
///
/// The bound address (useful with port 0) is reported through `ready_tx`.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log = config.log_path.clone().map(WireLog::spawn);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "reversi server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut next_match_id = 0u64;
    loop {
        next_match_id += 1;
        let match_id = next_match_id;

        let black = accept_player(&listener, match_id, Color::Black, wire_log.as_ref()).await?;
        let white = accept_player(&listener, match_id, Color::White, wire_log.as_ref()).await?;

        tokio::spawn(async move {
            // Outcome and errors are logged inside the match span.
            let _ = Match::new(match_id, black, white).run().await;
        });
    }
}

/// Wait for a connection that accepts its WELCOME
///
/// A client that vanishes before the greeting is written is dropped and the
/// slot is offered to the next connection.
async fn accept_player(
    listener: &TcpListener,
    match_id: u64,
    color: Color,
    wire_log: Option<&WireLog>,
) -> anyhow::Result<Session<TcpStream>> {
    loop {
        let (socket, addr) = listener.accept().await?;
        let _ = socket.set_nodelay(true);
        info!(match_id, %addr, %color, "player connected");

        let mut session = Session::new(socket);
        if let Some(log) = wire_log {
            session = session.with_tap(log.tap(match_id, color));
        }

        let welcome = Message::Welcome {
            is_black: color == Color::Black,
        };
        match session.send(&welcome).await {
            Ok(()) => return Ok(session),
            Err(err) => warn!(match_id, %addr, %err, "player left before welcome"),
        }
    }
}
