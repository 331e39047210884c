use std::io::ErrorKind;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::codec::{FrameConfig, FrameHeader};
use crate::error::{FrameError, Result};

/// Write one uncompressed message to `stream` using the default configuration.
pub async fn write_message<W>(stream: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    write_message_with_config(stream, payload, &FrameConfig::default()).await
}

/// Write one uncompressed message to `stream`, enforcing `config`.
///
/// The header goes out first, then the payload, then the stream is flushed.
/// An oversized payload is rejected before anything is written.
pub async fn write_message_with_config<W>(
    stream: &mut W,
    payload: &[u8],
    config: &FrameConfig,
) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let header = FrameHeader::for_payload(payload.len(), config.effective_max())?;

    write_all(stream, &header.encode()).await?;
    write_all(stream, payload).await?;
    flush(stream).await?;

    tracing::trace!(size = payload.len(), "wrote message");
    Ok(())
}

async fn write_all<W>(stream: &mut W, mut buf: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    while !buf.is_empty() {
        match stream.write(buf).await {
            Ok(0) => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
            Ok(n) => buf = &buf[n..],
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(())
}

async fn flush<W>(stream: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    loop {
        match stream.flush().await {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}

/// Writes complete messages to any `AsyncWrite` stream.
pub struct FrameWriter<T> {
    inner: T,
    config: FrameConfig,
    messages_written: u64,
}

impl<T: AsyncWrite + Unpin> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            config,
            messages_written: 0,
        }
    }

    /// Frame and send a payload.
    pub async fn write_message(&mut self, payload: &[u8]) -> Result<()> {
        write_message_with_config(&mut self.inner, payload, &self.config).await?;
        self.messages_written += 1;
        Ok(())
    }

    /// Number of messages successfully written so far.
    pub fn messages_written(&self) -> u64 {
        self.messages_written
    }

    /// Shut down the write half of the underlying stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.inner.shutdown().await.map_err(FrameError::Io)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum message size for subsequent writes.
    pub fn set_max_message_size(&mut self, max_message_size: usize) {
        self.config.max_message_size = max_message_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
