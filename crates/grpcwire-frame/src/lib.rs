//! gRPC length-prefixed message framing over async byte streams.
//!
//! Every message on the wire is framed with:
//! - A 1-byte compressed flag (only `0`, uncompressed, is supported)
//! - A 4-byte big-endian payload length, at most `i32::MAX`
//! - The payload itself, opaque to this crate
//!
//! [`read_message`] returns `Ok(None)` when the stream ends cleanly between
//! messages and an error when it ends anywhere inside one. [`write_message`]
//! prepends the header and writes the payload.

pub mod codec;
pub mod error;
#[cfg(feature = "codec")]
pub mod framed;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, encode_frame, FrameConfig, FrameHeader, COMPRESSION_NONE, HEADER_SIZE,
    MAX_MESSAGE_SIZE,
};
pub use error::{FrameError, Result};
#[cfg(feature = "codec")]
pub use framed::GrpcCodec;
pub use reader::{
    read_exact_or_eof, read_message, read_message_with_config, FrameReader, ReadOutcome,
};
pub use writer::{write_message, write_message_with_config, FrameWriter};
