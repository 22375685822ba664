//! Terminal Reversi client.
//!
//! `connect` joins a server as a human or a bot; `local` plays both sides
//! in this process. Humans type `row col`, `pass`, `y`/`n` to answer a
//! request, and (online only) `save`, `load`, `restart` or `quit`.

use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use reversi::adapter::{connect, run_player, ClientConfig, ClientHandle, GameOutcome};
use reversi::core::{Board, GameStatus, MoveSet};
use reversi::engine::{
    play_local, HumanInput, HumanSelector, MaxFlipSelector, MoveSelector, RandomSelector,
};
use reversi::types::{MatchRequest, Move};

/// Reversi terminal client
#[derive(Parser, Debug)]
#[command(name = "reversi-client")]
#[command(about = "Play Reversi against a server or locally", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join a game on a server
    Connect {
        /// Server host (default: REVERSI_HOST or 127.0.0.1)
        host: Option<String>,

        /// Server port (default: REVERSI_PORT or 7777)
        port: Option<u16>,

        #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
        player: PlayerKind,

        /// Seed for the random player
        #[arg(long, default_value_t = 1)]
        seed: u32,
    },

    /// Play both sides in this process
    Local {
        #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
        black: PlayerKind,

        #[arg(long, value_enum, default_value_t = PlayerKind::MaxFlip)]
        white: PlayerKind,

        /// Seed for random players
        #[arg(long, default_value_t = 1)]
        seed: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Human,
    Random,
    MaxFlip,
}

/// A human at this terminal: prints the position, then waits for stdin
#[derive(Clone)]
struct TerminalPlayer {
    inner: Arc<Mutex<HumanSelector>>,
}

impl MoveSelector for TerminalPlayer {
    fn name(&self) -> &str {
        "terminal"
    }

    fn select(&mut self, legal: &MoveSet, board: &Board) -> Option<Move> {
        println!("\n{}", board);
        let moves: Vec<String> = legal.iter().map(|mv| mv.to_string()).collect();
        println!("{} to move. Legal: {}", board.current_player(), moves.join(" "));
        print!("> ");
        let _ = std::io::stdout().flush();
        let mut human = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        human.select(legal, board)
    }

    fn consent(&mut self, request: MatchRequest) -> bool {
        print!("\nOpponent asks to {}. Accept? [y/n] ", request);
        let _ = std::io::stdout().flush();
        let mut human = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        human.consent(request)
    }
}

/// Feed stdin lines to the human selector; requests go straight to `handle`
fn spawn_stdin_reader(tx: std::sync::mpsc::Sender<HumanInput>, handle: Option<ClientHandle>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim().to_ascii_lowercase();
            let input = match line.as_str() {
                "" => continue,
                "pass" => HumanInput::Pass,
                "y" | "yes" => HumanInput::Consent(true),
                "n" | "no" => HumanInput::Consent(false),
                other => {
                    if let Some(request) = MatchRequest::from_str(&other.to_ascii_uppercase()) {
                        match &handle {
                            Some(handle) => {
                                if let Err(err) = handle.request(request) {
                                    println!("cannot {}: {}", request, err);
                                }
                            }
                            None => println!("{} is only available online", request),
                        }
                        continue;
                    }
                    match parse_cell(other) {
                        Some(mv) => HumanInput::Play(mv),
                        None => {
                            println!("enter `row col`, `pass`, or `y`/`n`");
                            continue;
                        }
                    }
                }
            };
            if tx.send(input).is_err() {
                break;
            }
        }
    });
}

fn parse_cell(s: &str) -> Option<Move> {
    let mut parts = s.split(|c: char| c.is_whitespace() || c == ',');
    let row = parts.next()?.trim().parse().ok()?;
    let col = parts.find(|p| !p.is_empty())?.trim().parse().ok()?;
    Move::new(row, col)
}

fn selector_for(
    kind: PlayerKind,
    seed: u32,
    human: &mut Option<TerminalPlayer>,
    stdin_tx: &mut Option<std::sync::mpsc::Sender<HumanInput>>,
) -> Box<dyn MoveSelector + Send> {
    match kind {
        PlayerKind::Random => Box::new(RandomSelector::new(seed)),
        PlayerKind::MaxFlip => Box::new(MaxFlipSelector::new()),
        PlayerKind::Human => {
            let player = human.get_or_insert_with(|| {
                let (tx, selector) = HumanSelector::channel();
                *stdin_tx = Some(tx);
                TerminalPlayer {
                    inner: Arc::new(Mutex::new(selector)),
                }
            });
            Box::new(player.clone())
        }
    }
}

fn run_local(black: PlayerKind, white: PlayerKind, seed: u32) {
    let mut human = None;
    let mut stdin_tx = None;
    let mut black = selector_for(black, seed, &mut human, &mut stdin_tx);
    let mut white = selector_for(white, seed.wrapping_add(1), &mut human, &mut stdin_tx);
    if let Some(tx) = stdin_tx {
        spawn_stdin_reader(tx, None);
    }

    let snapshot = play_local(&mut black, &mut white);
    println!("\n{}", snapshot.to_board());
    if let GameStatus::GameOver { winner } = snapshot.status {
        println!(
            "Game over: {} (black {} - white {})",
            winner, snapshot.black, snapshot.white
        );
    }
}

async fn run_connect(config: ClientConfig, kind: PlayerKind, seed: u32) -> Result<()> {
    let client = connect(&config).await?;
    let handle = client.handle.clone();
    let mut events = client.events;

    let mut human = None;
    let mut stdin_tx = None;
    let mut selector = selector_for(kind, seed, &mut human, &mut stdin_tx);
    if let Some(tx) = stdin_tx {
        spawn_stdin_reader(tx, Some(handle.clone()));
    }

    let outcome = tokio::task::spawn_blocking(move || {
        run_player(&mut *selector, &handle, &mut events)
    })
    .await?;

    match outcome {
        Some(GameOutcome::Won) => println!("You won!"),
        Some(GameOutcome::Lost) => println!("You lost."),
        Some(GameOutcome::Tied) => println!("It's a tie."),
        None => println!("Connection closed."),
    }

    let state = client.handle.state();
    println!("\n{}\nblack {} - white {}", state.board, state.black, state.white);

    if let Err(err) = client.task.await? {
        warn!(%err, "connection ended with an error");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    reversi::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Connect {
            host,
            port,
            player,
            seed,
        } => {
            let mut config = ClientConfig::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            run_connect(config, player, seed).await
        }
        Command::Local { black, white, seed } => {
            tokio::task::spawn_blocking(move || run_local(black, white, seed)).await?;
            Ok(())
        }
    }
}
