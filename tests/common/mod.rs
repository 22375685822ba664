//! Shared helpers for the network tests

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines, ReadHalf, WriteHalf};

pub const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// The far end of a connection, speaking raw protocol lines
pub struct Peer<S> {
    lines: Lines<BufReader<ReadHalf<S>>>,
    writer: WriteHalf<S>,
}

impl<S: AsyncRead + AsyncWrite> Peer<S> {
    pub fn new(stream: S) -> Self {
        let (read, writer) = tokio::io::split(stream);
        Self {
            lines: BufReader::new(read).lines(),
            writer,
        }
    }

    /// Next line, or `None` at end of stream
    pub async fn next_line(&mut self) -> Option<String> {
        tokio::time::timeout(READ_TIMEOUT, self.lines.next_line())
            .await
            .expect("timeout waiting for line")
            .expect("io error")
    }

    pub async fn expect(&mut self, want: &str) {
        let got = self.next_line().await;
        assert_eq!(got.as_deref(), Some(want));
    }

    pub async fn expect_eof(&mut self) {
        let got = self.next_line().await;
        assert_eq!(got, None, "expected end of stream");
    }

    pub async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }
}
