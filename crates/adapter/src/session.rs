//! Session - one endpoint's line-oriented connection to its peer
//!
//! Generic over any `AsyncRead + AsyncWrite` stream so the same code runs
//! over TCP, in-memory duplex pipes and mock I/O. A session can be split
//! into independently owned reader and writer halves; `close` consumes the
//! writer, so a session is closed at most once.

use tokio::io::{
    split, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};

use crate::error::{ConnectionError, ProtocolError, SessionError};
use crate::protocol::{parse_message, Message};
use crate::wire_log::{Direction, WireTap};

/// Receiving half
pub struct SessionReader<S> {
    inner: BufReader<ReadHalf<S>>,
    buf: Vec<u8>,
    tap: Option<WireTap>,
}

impl<S: AsyncRead + AsyncWrite> SessionReader<S> {
    /// Wait for the next full line (without its terminator)
    ///
    /// A line cut off by end of stream counts as a disconnect. Bytes that are
    /// not UTF-8 are a protocol error.
    pub async fn receive_line(&mut self) -> Result<String, SessionError> {
        self.buf.clear();
        self.inner.read_until(b'\n', &mut self.buf).await?;
        if self.buf.last() != Some(&b'\n') {
            return Err(ConnectionError::StreamClosed.into());
        }
        let line = match std::str::from_utf8(&self.buf) {
            Ok(text) => text.trim_end_matches(['\r', '\n']).to_string(),
            Err(_) => {
                let lossy = String::from_utf8_lossy(&self.buf);
                return Err(ProtocolError::malformed(lossy.trim_end_matches(['\r', '\n'])).into());
            }
        };
        if let Some(tap) = &self.tap {
            tap.record(Direction::In, &line);
        }
        Ok(line)
    }

    /// Wait for and decode the next message
    pub async fn receive(&mut self) -> Result<Message, SessionError> {
        let line = self.receive_line().await?;
        Ok(parse_message(&line)?)
    }
}

/// Sending half
pub struct SessionWriter<S> {
    inner: WriteHalf<S>,
    buf: String,
    tap: Option<WireTap>,
}

impl<S: AsyncRead + AsyncWrite> SessionWriter<S> {
    /// Write one message and flush
    pub async fn send(&mut self, msg: &Message) -> Result<(), ConnectionError> {
        use std::fmt::Write as _;

        self.buf.clear();
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{}", msg);
        if let Some(tap) = &self.tap {
            tap.record(Direction::Out, &self.buf);
        }
        self.buf.push('\n');
        self.inner.write_all(self.buf.as_bytes()).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Shut down the write side; the peer sees end of stream
    pub async fn close(mut self) -> Result<(), ConnectionError> {
        self.inner.shutdown().await?;
        Ok(())
    }
}

/// Both halves of a connection
pub struct Session<S> {
    reader: SessionReader<S>,
    writer: SessionWriter<S>,
}

impl<S: AsyncRead + AsyncWrite> Session<S> {
    pub fn new(stream: S) -> Self {
        let (read, write) = split(stream);
        Self {
            reader: SessionReader {
                inner: BufReader::new(read),
                buf: Vec::with_capacity(128),
                tap: None,
            },
            writer: SessionWriter {
                inner: write,
                buf: String::with_capacity(128),
                tap: None,
            },
        }
    }

    /// Record every line in both directions
    pub fn with_tap(mut self, tap: WireTap) -> Self {
        self.reader.tap = Some(tap.clone());
        self.writer.tap = Some(tap);
        self
    }

    pub async fn send(&mut self, msg: &Message) -> Result<(), ConnectionError> {
        self.writer.send(msg).await
    }

    pub async fn receive(&mut self) -> Result<Message, SessionError> {
        self.reader.receive().await
    }

    pub async fn receive_line(&mut self) -> Result<String, SessionError> {
        self.reader.receive_line().await
    }

    pub fn into_split(self) -> (SessionReader<S>, SessionWriter<S>) {
        (self.reader, self.writer)
    }

    /// Close the connection
    pub async fn close(self) -> Result<(), ConnectionError> {
        let Session { reader, writer } = self;
        let result = writer.close().await;
        drop(reader);
        result
    }
}
