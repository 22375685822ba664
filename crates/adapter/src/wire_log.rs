//! Wire log - every protocol line of every match, appended as JSON lines
//!
//! Sessions hand records to a single writer task over an unbounded channel,
//! so logging never blocks or fails a match.

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::warn;

use crate::types::Color;

/// Which way a line travelled, seen from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// One logged line
#[derive(Debug, Clone, Serialize)]
pub struct WireRecord {
    pub match_id: u64,
    pub peer: &'static str,
    pub dir: Direction,
    pub line: String,
}

/// Handle to the writer task
#[derive(Debug, Clone)]
pub struct WireLog {
    tx: mpsc::UnboundedSender<WireRecord>,
}

impl WireLog {
    /// Spawn the writer task appending to `path`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(path: String) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
        tokio::spawn(async move {
            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(err) => {
                    warn!(%path, %err, "cannot open wire log");
                    return;
                }
            };

            let mut buf: Vec<u8> = Vec::with_capacity(256);
            while let Some(rec) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &rec).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if let Err(err) = file.write_all(&buf).await {
                    warn!(%path, %err, "wire log write failed");
                    break;
                }
            }

            let _ = file.flush().await;
        });
        Self { tx }
    }

    /// A tap for one side of one match
    pub fn tap(&self, match_id: u64, peer: Color) -> WireTap {
        WireTap {
            match_id,
            peer: match peer {
                Color::Black => "black",
                Color::White => "white",
            },
            tx: self.tx.clone(),
        }
    }
}

/// Per-session recorder
#[derive(Debug, Clone)]
pub struct WireTap {
    match_id: u64,
    peer: &'static str,
    tx: mpsc::UnboundedSender<WireRecord>,
}

impl WireTap {
    pub(crate) fn record(&self, dir: Direction, line: &str) {
        let _ = self.tx.send(WireRecord {
            match_id: self.match_id,
            peer: self.peer,
            dir,
            line: line.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let rec = WireRecord {
            match_id: 3,
            peer: "white",
            dir: Direction::In,
            line: "MOVE 2 3".to_string(),
        };
        let v: serde_json::Value = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["match_id"], 3);
        assert_eq!(v["peer"], "white");
        assert_eq!(v["dir"], "in");
        assert_eq!(v["line"], "MOVE 2 3");
    }

    #[tokio::test]
    async fn test_writer_appends_lines() {
        let path = std::env::temp_dir().join(format!("reversi-wire-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let log = WireLog::spawn(path.to_string_lossy().into_owned());
        let tap = log.tap(1, Color::Black);
        tap.record(Direction::Out, "WELCOME true");
        tap.record(Direction::In, "MOVE 2 3");
        drop(tap);
        drop(log);

        let mut contents = String::new();
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            contents = tokio::fs::read_to_string(&path).await.unwrap_or_default();
            if contents.lines().count() == 2 {
                break;
            }
        }
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["dir"], "out");
        assert_eq!(lines[1]["line"], "MOVE 2 3");
        let _ = std::fs::remove_file(&path);
    }
}
