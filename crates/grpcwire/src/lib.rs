//! gRPC message framing for async byte streams.
//!
//! grpcwire reads and writes the 5-byte-prefixed messages gRPC carries inside
//! HTTP/2 request and response bodies. Transport, serialization, and
//! compression codecs are left to the caller; this crate only frames bytes.
//!
//! # Crate Structure
//!
//! - [`frame`] — Header codec, exact-count reads, message reader/writer, and
//!   the `tokio_util` codec (behind the frame crate's `codec` feature)

/// Re-export frame types.
pub mod frame {
    pub use grpcwire_frame::*;
}
