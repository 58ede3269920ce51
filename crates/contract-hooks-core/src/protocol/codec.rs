use contract_hooks_types::{HookError, HookMessage};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::error::AppResult;

/// Frame terminator. JSON encoding never emits a raw newline inside a value.
pub const MESSAGE_DELIMITER: u8 = b'\n';

/// Largest frame accepted from the engine, delimiter excluded.
pub const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

pub fn decode_message(frame: &[u8]) -> Result<HookMessage, HookError> {
    serde_json::from_slice(frame)
        .map_err(|e| HookError::protocol(format!("Invalid hook message: {}", e)))
}

pub fn encode_message(message: &HookMessage) -> Result<Vec<u8>, HookError> {
    let mut frame = serde_json::to_vec(message)?;
    frame.push(MESSAGE_DELIMITER);
    Ok(frame)
}

/// Reads delimited frames from a byte stream.
pub struct MessageReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
    max_frame: usize,
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_frame(reader, MAX_FRAME_BYTES)
    }

    pub fn with_max_frame(reader: R, max_frame: usize) -> Self {
        Self { inner: BufReader::new(reader), buf: Vec::with_capacity(4096), max_frame }
    }

    /// Next message, or `None` once the peer has closed the stream.
    ///
    /// Blank lines are skipped. A trailing frame without delimiter at EOF is
    /// still decoded. A frame longer than the configured maximum fails with
    /// [`HookError::Protocol`].
    pub async fn next_message(&mut self) -> AppResult<Option<HookMessage>> {
        let limit = self.max_frame as u64 + 1;
        loop {
            self.buf.clear();
            let read = (&mut self.inner)
                .take(limit)
                .read_until(MESSAGE_DELIMITER, &mut self.buf)
                .await?;
            if read == 0 {
                return Ok(None);
            }
            if read > self.max_frame && self.buf.last() != Some(&MESSAGE_DELIMITER) {
                return Err(HookError::protocol(format!(
                    "Hook message exceeds {} bytes",
                    self.max_frame
                ))
                .into());
            }

            let frame = trim_frame(&self.buf);
            if frame.is_empty() {
                continue;
            }
            return Ok(Some(decode_message(frame)?));
        }
    }
}

fn trim_frame(mut frame: &[u8]) -> &[u8] {
    while let [rest @ .., last] = frame {
        if last.is_ascii_whitespace() {
            frame = rest;
        } else {
            break;
        }
    }
    frame
}
