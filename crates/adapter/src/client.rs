//! Client adapter - a non-authoritative mirror of the server's game
//!
//! A receive task owns the [`ClientState`] and applies every server line to
//! it, publishing a fresh copy through a `watch` channel and turning
//! interesting changes into [`ClientEvent`]s. Outgoing messages go through a
//! separate writer task, so [`ClientHandle`] is synchronous and can be used
//! from any thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::{Board, MoveSet};
use crate::error::{ClientError, ProtocolError, SessionError};
use crate::protocol::Message;
use crate::session::Session;
use crate::types::{Color, MatchRequest, Move};

/// Client connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
        }
    }
}

impl ClientConfig {
    /// Create from `REVERSI_HOST` / `REVERSI_PORT`
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        Self {
            host: env::var("REVERSI_HOST").unwrap_or(defaults.host),
            port: env::var("REVERSI_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

/// The game result as seen by this player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
    Tied,
}

/// Everything the client knows, rebuilt from server messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    /// Assigned by WELCOME
    pub color: Option<Color>,
    /// Display mirror of the server board
    pub board: Board,
    /// Legal moves from the latest MAKE_MOVE
    pub legal: MoveSet,
    pub my_turn: bool,
    pub black: u8,
    pub white: u8,
    /// A request from the opponent waiting for our answer
    pub pending: Option<MatchRequest>,
    pub outcome: Option<GameOutcome>,
    /// MAKE_MOVE prompts received so far
    pub prompts: u64,
    /// Opponent requests received so far
    pub requests: u64,
}

impl Default for ClientState {
    fn default() -> Self {
        let board = Board::new();
        Self {
            color: None,
            black: board.count(Color::Black),
            white: board.count(Color::White),
            board,
            legal: MoveSet::new(),
            my_turn: false,
            pending: None,
            outcome: None,
            prompts: 0,
            requests: 0,
        }
    }
}

/// Notifications for whatever drives the player (UI or bot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Welcomed { color: Color },
    TurnStarted { legal: MoveSet, board: Board },
    PieceChanged { pos: Move, color: Color },
    ScoreChanged { black: u8, white: u8 },
    ConsentRequested { request: MatchRequest },
    GameEnded { outcome: GameOutcome },
    /// The connection ended without a result (closed, or a protocol error)
    Disconnected,
}

impl ClientState {
    /// Apply one server message
    pub fn apply(&mut self, msg: &Message) -> Result<ClientEvent, ProtocolError> {
        if msg.is_client_only() {
            return Err(ProtocolError::UnexpectedVerb { verb: msg.verb() });
        }

        let event = match *msg {
            Message::Welcome { is_black } => {
                let color = if is_black { Color::Black } else { Color::White };
                self.color = Some(color);
                self.board.set_current_player(color);
                ClientEvent::Welcomed { color }
            }
            Message::MakeMove(legal) => {
                let color = self.color.ok_or(ProtocolError::UnexpectedVerb {
                    verb: msg.verb(),
                })?;
                self.board.set_current_player(color);
                self.legal = legal;
                self.my_turn = true;
                self.pending = None;
                self.prompts += 1;
                ClientEvent::TurnStarted {
                    legal,
                    board: self.board.clone(),
                }
            }
            Message::PieceUpdate { pos, color } => {
                self.board.set(pos, Some(color));
                if Some(color) == self.color {
                    // Our own move echoed back.
                    self.my_turn = false;
                    self.legal.clear();
                }
                ClientEvent::PieceChanged { pos, color }
            }
            Message::MoveMade { black, white } => {
                self.black = black;
                self.white = white;
                ClientEvent::ScoreChanged { black, white }
            }
            Message::Consent {
                request,
                accept: None,
            } => {
                self.pending = Some(request);
                self.requests += 1;
                ClientEvent::ConsentRequested { request }
            }
            Message::GameWon => self.finish(GameOutcome::Won),
            Message::GameLost => self.finish(GameOutcome::Lost),
            Message::GameTied => self.finish(GameOutcome::Tied),
            Message::Move { .. } | Message::Pass | Message::Consent { .. } => {
                return Err(ProtocolError::UnexpectedVerb { verb: msg.verb() })
            }
        };
        Ok(event)
    }

    fn finish(&mut self, outcome: GameOutcome) -> ClientEvent {
        self.outcome = Some(outcome);
        self.my_turn = false;
        self.legal.clear();
        ClientEvent::GameEnded { outcome }
    }
}

/// Last prompt and request answered through any clone of a handle
#[derive(Debug, Default)]
struct Answered {
    prompt: AtomicU64,
    request: AtomicU64,
}

/// Sends player actions to the server
///
/// Actions are checked against the mirrored state and queued to the
/// writer task; nothing here blocks. Each MAKE_MOVE is answered at most
/// once (a move, a pass or a request), and so is each opponent request.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    out: mpsc::UnboundedSender<Message>,
    state: watch::Receiver<ClientState>,
    answered: Arc<Answered>,
}

impl ClientHandle {
    /// Latest mirrored state
    pub fn state(&self) -> ClientState {
        self.state.borrow().clone()
    }

    /// Request a move; it must be in the cached legal set
    pub fn play(&self, mv: Move) -> Result<(), ClientError> {
        let prompt = {
            let state = self.state.borrow();
            if !state.my_turn {
                return Err(ClientError::NotYourTurn);
            }
            if !state.legal.contains(mv) {
                return Err(ClientError::IllegalMove(mv));
            }
            state.prompts
        };
        self.claim_turn(prompt)?;
        self.send(Message::play(mv))
    }

    pub fn pass(&self) -> Result<(), ClientError> {
        let prompt = self.current_prompt()?;
        self.claim_turn(prompt)?;
        self.send(Message::Pass)
    }

    /// Ask the opponent to agree to `request` (only while it is our turn)
    ///
    /// The server prompts again afterwards if the match goes on.
    pub fn request(&self, request: MatchRequest) -> Result<(), ClientError> {
        let prompt = self.current_prompt()?;
        self.claim_turn(prompt)?;
        self.send(Message::Consent {
            request,
            accept: None,
        })
    }

    /// Answer the opponent's pending request
    pub fn respond(&self, accept: bool) -> Result<(), ClientError> {
        let (request, seq) = {
            let state = self.state.borrow();
            match state.pending {
                Some(request) => (request, state.requests),
                None => return Err(ClientError::NoPendingRequest),
            }
        };
        if self.answered.request.fetch_max(seq, Ordering::SeqCst) >= seq {
            return Err(ClientError::NoPendingRequest);
        }
        self.send(Message::Consent {
            request,
            accept: Some(accept),
        })
    }

    fn current_prompt(&self) -> Result<u64, ClientError> {
        let state = self.state.borrow();
        if !state.my_turn {
            return Err(ClientError::NotYourTurn);
        }
        Ok(state.prompts)
    }

    fn claim_turn(&self, prompt: u64) -> Result<(), ClientError> {
        if self.answered.prompt.fetch_max(prompt, Ordering::SeqCst) >= prompt {
            return Err(ClientError::NotYourTurn);
        }
        Ok(())
    }

    fn send(&self, msg: Message) -> Result<(), ClientError> {
        self.out.send(msg).map_err(|_| ClientError::Disconnected)
    }
}

/// A running client
pub struct Client {
    pub handle: ClientHandle,
    pub events: mpsc::UnboundedReceiver<ClientEvent>,
    /// Resolves when the receive loop ends
    pub task: JoinHandle<Result<GameOutcome, SessionError>>,
}

/// Connect to a server over TCP
pub async fn connect(config: &ClientConfig) -> anyhow::Result<Client> {
    let stream = TcpStream::connect((config.host.as_str(), config.port)).await?;
    let _ = stream.set_nodelay(true);
    info!(host = %config.host, port = config.port, "connected");
    Ok(spawn_client(stream))
}

/// Start the receive and writer tasks on an established stream
pub fn spawn_client<S>(stream: S) -> Client
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut reader, mut writer) = Session::new(stream).into_split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<ClientEvent>();
    let (state_tx, state_rx) = watch::channel(ClientState::default());

    tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if let Err(err) = writer.send(&msg).await {
                debug!(%err, "client writer stopped");
                break;
            }
        }
        let _ = writer.close().await;
    });

    let task = tokio::spawn(async move {
        let mut state = ClientState::default();
        let result = loop {
            let msg = match reader.receive().await {
                Ok(msg) => msg,
                Err(err) => break Err(err),
            };
            let event = match state.apply(&msg) {
                Ok(event) => event,
                Err(err) => break Err(err.into()),
            };
            state_tx.send_replace(state.clone());
            let _ = event_tx.send(event);
            if msg.is_terminal() {
                if let Some(outcome) = state.outcome {
                    break Ok(outcome);
                }
            }
        };
        if let Err(err) = &result {
            warn!(%err, "client connection ended");
            let _ = event_tx.send(ClientEvent::Disconnected);
        }
        result
    });

    Client {
        handle: ClientHandle {
            out: out_tx,
            state: state_rx,
            answered: Arc::default(),
        },
        events: event_rx,
        task,
    }
}
