//! `tokio_util::codec` integration.
//!
//! [`GrpcCodec`] lets `FramedRead` / `FramedWrite` carry gRPC messages. A
//! stream that ends exactly on a frame boundary terminates the framed stream;
//! one that ends inside a frame yields [`FrameError::TruncatedStream`].

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, FrameConfig, FrameHeader, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Decoder/encoder pair for uncompressed gRPC frames.
#[derive(Debug, Clone, Default)]
pub struct GrpcCodec {
    config: FrameConfig,
}

impl GrpcCodec {
    /// Create a codec with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }

    /// Current codec configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Decoder for GrpcCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        decode_frame(src, self.config.effective_max())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if let Some(message) = self.decode(src)? {
            return Ok(Some(message));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let expected = if src.len() < HEADER_SIZE {
            HEADER_SIZE
        } else {
            // decode() already validated the header, so the length is sound.
            let mut raw = [0u8; HEADER_SIZE];
            raw.copy_from_slice(&src[..HEADER_SIZE]);
            HEADER_SIZE + FrameHeader::decode(&raw).length as usize
        };
        Err(FrameError::TruncatedStream {
            expected,
            received: src.len(),
        })
    }
}

impl Encoder<&[u8]> for GrpcCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<()> {
        let header = FrameHeader::for_payload(item.len(), self.config.effective_max())?;
        dst.reserve(HEADER_SIZE + item.len());
        dst.put_slice(&header.encode());
        dst.put_slice(item);
        Ok(())
    }
}

impl Encoder<Bytes> for GrpcCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&[u8]>::encode(self, item.as_ref(), dst)
    }
}
