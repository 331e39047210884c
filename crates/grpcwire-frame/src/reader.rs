use std::io::ErrorKind;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{FrameConfig, FrameHeader, HEADER_SIZE};
use crate::error::{FrameError, Result};

const PAYLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// Outcome of a successful [`read_exact_or_eof`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The buffer was filled completely.
    Filled,
    /// The stream was already at end-of-stream; no byte was read.
    Eof,
}

/// Fill `buf` completely from `stream`, telling a clean end apart from a
/// broken one.
///
/// Loops over short reads until the buffer is full. If the very first read
/// returns 0 bytes the result is [`ReadOutcome::Eof`]; if the stream ends
/// after some bytes were read the result is [`FrameError::TruncatedStream`].
/// An empty `buf` is trivially [`ReadOutcome::Filled`].
pub async fn read_exact_or_eof<R>(stream: &mut R, buf: &mut [u8]) -> Result<ReadOutcome>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut offset = 0usize;
    while offset < buf.len() {
        let read = match stream.read(&mut buf[offset..]).await {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        };

        if read == 0 {
            if offset == 0 {
                return Ok(ReadOutcome::Eof);
            }
            tracing::debug!(
                expected = buf.len(),
                received = offset,
                "stream closed mid-read"
            );
            return Err(FrameError::TruncatedStream {
                expected: buf.len(),
                received: offset,
            });
        }

        offset += read;
    }
    Ok(ReadOutcome::Filled)
}

/// Read the next message from `stream` using the default configuration.
///
/// Returns `Ok(None)` when the stream ends cleanly on a frame boundary.
pub async fn read_message<R>(stream: &mut R) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    read_message_with_config(stream, &FrameConfig::default()).await
}

/// Read the next message from `stream`, enforcing `config`.
///
/// A rejected header fails before any payload byte is consumed. Once a
/// header has been read, any short payload is reported as
/// [`FrameError::TruncatedStream`], including a stream that ends right after
/// the header.
pub async fn read_message_with_config<R>(
    stream: &mut R,
    config: &FrameConfig,
) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut raw = [0u8; HEADER_SIZE];
    if read_exact_or_eof(stream, &mut raw).await? == ReadOutcome::Eof {
        tracing::trace!("end of stream at frame boundary");
        return Ok(None);
    }

    let header = FrameHeader::decode(&raw);
    let len = header.validate(config.effective_max()).map_err(|err| {
        tracing::debug!(
            compressed_flag = header.compressed_flag,
            length = header.length,
            error = %err,
            "rejected frame header"
        );
        err
    })?;

    let payload = read_payload(stream, len).await?;
    tracing::trace!(size = len, "read message");
    Ok(Some(Bytes::from(payload)))
}

/// Read exactly `len` payload bytes, growing the buffer one chunk at a time
/// so memory tracks the bytes that actually arrive rather than the declared
/// length.
async fn read_payload<R>(stream: &mut R, len: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut payload = Vec::with_capacity(len.min(PAYLOAD_CHUNK_SIZE));
    while payload.len() < len {
        let start = payload.len();
        let end = len.min(start + PAYLOAD_CHUNK_SIZE);
        payload.resize(end, 0);

        match read_exact_or_eof(stream, &mut payload[start..end]).await {
            Ok(ReadOutcome::Filled) => {}
            Ok(ReadOutcome::Eof) => {
                tracing::debug!(
                    expected = len,
                    received = start,
                    "stream closed mid-payload"
                );
                return Err(FrameError::TruncatedStream {
                    expected: len,
                    received: start,
                });
            }
            Err(FrameError::TruncatedStream { received, .. }) => {
                return Err(FrameError::TruncatedStream {
                    expected: len,
                    received: start + received,
                });
            }
            Err(err) => return Err(err),
        }
    }
    Ok(payload)
}

/// Reads complete messages from any `AsyncRead` stream.
///
/// Holds no buffered bytes between calls: each message is read straight
/// from the stream, so `into_inner` never loses data.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
    messages_read: u64,
}

impl<T: AsyncRead + Unpin> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            config,
            messages_read: 0,
        }
    }

    /// Read the next message.
    ///
    /// Returns `Ok(None)` at a clean end-of-stream.
    pub async fn read_message(&mut self) -> Result<Option<Bytes>> {
        let message = read_message_with_config(&mut self.inner, &self.config).await?;
        if message.is_some() {
            self.messages_read += 1;
        }
        Ok(message)
    }

    /// Number of messages successfully read so far.
    pub fn messages_read(&self) -> u64 {
        self.messages_read
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum message size for subsequent reads.
    pub fn set_max_message_size(&mut self, max_message_size: usize) {
        self.config.max_message_size = max_message_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
