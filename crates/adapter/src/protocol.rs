//! Protocol module - the line-oriented text protocol between server and clients
//!
//! Every message is one ASCII line: a verb followed by space-separated
//! arguments. `Message` implements `Display` for encoding (without the
//! trailing newline) and [`parse_message`] decodes one line.

use std::fmt;
use std::str::FromStr;

use crate::core::MoveSet;
use crate::error::ProtocolError;
use crate::types::{Color, MatchRequest, Move};

// ============== Verbs ==============

pub const WELCOME: &str = "WELCOME";
pub const MAKE_MOVE: &str = "MAKE_MOVE";
pub const MOVE: &str = "MOVE";
pub const MOVE_MADE: &str = "MOVE_MADE";
pub const PIECE_UPDATE: &str = "PIECE_UPDATE";
pub const PASS: &str = "PASS";
pub const GAME_WON: &str = "GAME_WON";
pub const GAME_LOST: &str = "GAME_LOST";
pub const GAME_TIED: &str = "GAME_TIED";

// ============== Messages ==============

/// One protocol line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// S->C: color assignment
    Welcome { is_black: bool },
    /// S->C: your turn, with the legal moves
    MakeMove(MoveSet),
    /// C->S: move request
    ///
    /// Coordinates are not range-checked here; an off-board move is a
    /// rejected move, not a broken connection.
    Move { row: i32, col: i32 },
    /// S->C: scoreboard after a move
    MoveMade { black: u8, white: u8 },
    /// S->C: one cell changed color
    PieceUpdate { pos: Move, color: Color },
    /// C->S
    Pass,
    GameWon,
    GameLost,
    GameTied,
    /// Both ways: a bare request (`accept == None`) or the answer to one
    Consent {
        request: MatchRequest,
        accept: Option<bool>,
    },
}

impl Message {
    /// Build a move request for a board cell
    pub fn play(mv: Move) -> Self {
        Message::Move {
            row: mv.row() as i32,
            col: mv.col() as i32,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Message::Welcome { .. } => WELCOME,
            Message::MakeMove(_) => MAKE_MOVE,
            Message::Move { .. } => MOVE,
            Message::MoveMade { .. } => MOVE_MADE,
            Message::PieceUpdate { .. } => PIECE_UPDATE,
            Message::Pass => PASS,
            Message::GameWon => GAME_WON,
            Message::GameLost => GAME_LOST,
            Message::GameTied => GAME_TIED,
            Message::Consent { request, .. } => request.as_str(),
        }
    }

    /// True for messages only a client may send
    pub fn is_client_only(&self) -> bool {
        matches!(
            self,
            Message::Move { .. }
                | Message::Pass
                | Message::Consent {
                    accept: Some(_),
                    ..
                }
        )
    }

    /// True for the three game-result messages
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Message::GameWon | Message::GameLost | Message::GameTied
        )
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Welcome { is_black } => write!(f, "{} {}", WELCOME, is_black),
            Message::MakeMove(moves) => {
                f.write_str(MAKE_MOVE)?;
                for mv in moves {
                    write!(f, " {} {}", mv.row(), mv.col())?;
                }
                Ok(())
            }
            Message::Move { row, col } => write!(f, "{} {} {}", MOVE, row, col),
            Message::MoveMade { black, white } => write!(f, "{} {} {}", MOVE_MADE, black, white),
            Message::PieceUpdate { pos, color } => write!(
                f,
                "{} {} {} {}",
                PIECE_UPDATE,
                pos.row(),
                pos.col(),
                color.as_str()
            ),
            Message::Pass => f.write_str(PASS),
            Message::GameWon => f.write_str(GAME_WON),
            Message::GameLost => f.write_str(GAME_LOST),
            Message::GameTied => f.write_str(GAME_TIED),
            Message::Consent { request, accept } => match accept {
                Some(accept) => write!(f, "{} {}", request.as_str(), accept),
                None => f.write_str(request.as_str()),
            },
        }
    }
}

// ============== Message Parsing ==============

/// Decode one line (a trailing `\r`/`\n` is ignored)
///
/// Tokens are separated by exactly one space.
pub fn parse_message(line: &str) -> Result<Message, ProtocolError> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    let mut tokens = trimmed.split(' ');
    let Some(verb) = tokens.next().filter(|verb| !verb.is_empty()) else {
        return Err(ProtocolError::malformed(line));
    };
    let args: Vec<&str> = tokens.collect();
    if args.iter().any(|arg| arg.is_empty()) {
        return Err(ProtocolError::malformed(line));
    }

    let message = match verb {
        WELCOME => {
            let [flag] = exact::<1>(WELCOME, &args)?;
            Message::Welcome {
                is_black: parse_bool(flag, line)?,
            }
        }
        MAKE_MOVE => {
            if args.len() % 2 != 0 {
                return Err(ProtocolError::ArityMismatch {
                    verb: MAKE_MOVE,
                    got: args.len(),
                });
            }
            let mut moves = MoveSet::new();
            for pair in args.chunks_exact(2) {
                moves.insert(parse_cell(pair[0], pair[1], line)?);
            }
            Message::MakeMove(moves)
        }
        MOVE => {
            let [row, col] = exact::<2>(MOVE, &args)?;
            Message::Move {
                row: parse_int(row, line)?,
                col: parse_int(col, line)?,
            }
        }
        MOVE_MADE => {
            let [black, white] = exact::<2>(MOVE_MADE, &args)?;
            Message::MoveMade {
                black: parse_int(black, line)?,
                white: parse_int(white, line)?,
            }
        }
        PIECE_UPDATE => {
            let [row, col, color] = exact::<3>(PIECE_UPDATE, &args)?;
            Message::PieceUpdate {
                pos: parse_cell(row, col, line)?,
                color: Color::from_str(color).ok_or_else(|| ProtocolError::malformed(line))?,
            }
        }
        PASS => {
            exact::<0>(PASS, &args)?;
            Message::Pass
        }
        GAME_WON => {
            exact::<0>(GAME_WON, &args)?;
            Message::GameWon
        }
        GAME_LOST => {
            exact::<0>(GAME_LOST, &args)?;
            Message::GameLost
        }
        GAME_TIED => {
            exact::<0>(GAME_TIED, &args)?;
            Message::GameTied
        }
        other => {
            let request =
                MatchRequest::from_str(other).ok_or_else(|| ProtocolError::malformed(line))?;
            let accept = match args.as_slice() {
                [] => None,
                [flag] => Some(parse_bool(flag, line)?),
                _ => {
                    return Err(ProtocolError::ArityMismatch {
                        verb: request.as_str(),
                        got: args.len(),
                    })
                }
            };
            Message::Consent { request, accept }
        }
    };

    Ok(message)
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_message(s)
    }
}

fn exact<'a, const N: usize>(
    verb: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ProtocolError> {
    <[&'a str; N]>::try_from(args).map_err(|_| ProtocolError::ArityMismatch {
        verb,
        got: args.len(),
    })
}

fn parse_bool(token: &str, line: &str) -> Result<bool, ProtocolError> {
    match token {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ProtocolError::malformed(line)),
    }
}

fn parse_int<T: FromStr>(token: &str, line: &str) -> Result<T, ProtocolError> {
    token.parse().map_err(|_| ProtocolError::malformed(line))
}

fn parse_cell(row: &str, col: &str, line: &str) -> Result<Move, ProtocolError> {
    let row: i32 = parse_int(row, line)?;
    let col: i32 = parse_int(col, line)?;
    Move::from_signed(row, col).ok_or_else(|| ProtocolError::malformed(line))
}
