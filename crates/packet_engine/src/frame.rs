//! Length-prefixed message framing.
//!
//! Each message is a 4-byte little-endian length followed by that many bytes
//! of UTF-8 JSON. Used in both directions over stdin/stdout.

use std::io::{self, ErrorKind, Read, Write};

use serde::Serialize;
use thiserror::Error;

/// Largest inbound message accepted, in bytes.
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("declared message length is zero")]
    EmptyMessage,
    #[error("message too large: {size} bytes exceeds {max_size} byte limit")]
    TooLarge { size: usize, max_size: usize },
    #[error("stream closed after {received} of {expected} message bytes")]
    Truncated { expected: usize, received: usize },
    #[error("failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Reads and writes framed messages with a configurable inbound size cap.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_message_bytes: usize,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self {
            max_message_bytes: MAX_MESSAGE_BYTES,
        }
    }
}

impl FrameCodec {
    /// Caps are clamped to [`MAX_MESSAGE_BYTES`].
    pub fn with_max_message_bytes(max_message_bytes: usize) -> Self {
        Self {
            max_message_bytes: max_message_bytes.min(MAX_MESSAGE_BYTES),
        }
    }

    pub fn max_message_bytes(&self) -> usize {
        self.max_message_bytes
    }

    /// Reads one message.
    ///
    /// Returns `Ok(None)` when the stream ends before a full length prefix
    /// arrives; that is the peer's clean shutdown.
    ///
    /// # Errors
    ///
    /// A zero or oversized length, a stream that closes mid-body, or an
    /// underlying read failure. Callers treat all of them as end of session.
    pub fn read_message<R: Read>(&self, reader: &mut R) -> Result<Option<String>, FrameError> {
        let mut prefix = [0u8; 4];
        if fill(reader, &mut prefix)? < prefix.len() {
            return Ok(None);
        }

        let len = u32::from_le_bytes(prefix) as usize;
        if len == 0 {
            return Err(FrameError::EmptyMessage);
        }
        if len > self.max_message_bytes {
            return Err(FrameError::TooLarge {
                size: len,
                max_size: self.max_message_bytes,
            });
        }

        let mut body = vec![0u8; len];
        let received = fill(reader, &mut body)?;
        if received < len {
            return Err(FrameError::Truncated {
                expected: len,
                received,
            });
        }

        // Invalid UTF-8 is replaced, not rejected; the JSON decoder reports it.
        Ok(Some(match String::from_utf8(body) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }))
    }

    /// Serializes `message` as JSON, writes the prefix and body, then flushes.
    pub fn write_message<W: Write, T: Serialize>(
        &self,
        writer: &mut W,
        message: &T,
    ) -> Result<(), FrameError> {
        let body = serde_json::to_vec(message)?;
        let len = u32::try_from(body.len()).map_err(|_| FrameError::TooLarge {
            size: body.len(),
            max_size: u32::MAX as usize,
        })?;
        writer.write_all(&len.to_le_bytes())?;
        writer.write_all(&body)?;
        writer.flush()?;
        Ok(())
    }
}

/// Reads until `buf` is full or the stream ends; returns the bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
