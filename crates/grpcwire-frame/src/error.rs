/// Errors that can occur while reading or writing gRPC frames.
///
/// Reaching the end of the stream exactly on a frame boundary is not an
/// error; readers report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The stream closed part-way through a header or payload.
    #[error("stream truncated ({received} of {expected} bytes received)")]
    TruncatedStream { expected: usize, received: usize },

    /// The frame has a nonzero compressed flag.
    #[error("compressed messages are not supported (flag {0:#04x})")]
    UnsupportedCompression(u8),

    /// The declared or supplied message length exceeds the allowed maximum.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge { size: u64, max: usize },

    /// An I/O error occurred on the underlying stream.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Returns true if the stream ended in the middle of a frame.
    pub fn is_truncation(&self) -> bool {
        matches!(self, FrameError::TruncatedStream { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
