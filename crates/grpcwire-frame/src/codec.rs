use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: compressed flag (1) + length (4) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Largest message length accepted on the wire (`i32::MAX`).
pub const MAX_MESSAGE_SIZE: usize = i32::MAX as usize;

/// Compressed flag value for an uncompressed message, the only one supported.
pub const COMPRESSION_NONE: u8 = 0;

/// The 5-byte prefix in front of every message.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────┬──────────────────┐
/// │ Compressed   │ Length       │ Payload          │
/// │ flag (1B)    │ (4B BE)      │ (Length bytes)   │
/// └──────────────┴──────────────┴──────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Compressed flag; must be [`COMPRESSION_NONE`].
    pub compressed_flag: u8,
    /// Payload length in bytes.
    pub length: u32,
}

impl FrameHeader {
    /// Build the header for an uncompressed payload of `len` bytes.
    ///
    /// Fails with [`FrameError::MessageTooLarge`] if `len` exceeds
    /// `max_message_size` (itself capped at [`MAX_MESSAGE_SIZE`]).
    pub fn for_payload(len: usize, max_message_size: usize) -> Result<Self> {
        let max = max_message_size.min(MAX_MESSAGE_SIZE);
        if len > max {
            return Err(FrameError::MessageTooLarge {
                size: len as u64,
                max,
            });
        }
        // `max` is at most i32::MAX, so the length always fits.
        Ok(Self {
            compressed_flag: COMPRESSION_NONE,
            length: len as u32,
        })
    }

    /// Serialize the header. The length is written big-endian.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let len = self.length;
        [
            self.compressed_flag,
            (len >> 24) as u8,
            (len >> 16) as u8,
            (len >> 8) as u8,
            len as u8,
        ]
    }

    /// Parse a header without validating it.
    pub fn decode(raw: &[u8; HEADER_SIZE]) -> Self {
        let length = (u32::from(raw[1]) << 24)
            | (u32::from(raw[2]) << 16)
            | (u32::from(raw[3]) << 8)
            | u32::from(raw[4]);
        Self {
            compressed_flag: raw[0],
            length,
        }
    }

    /// Check the header and return the payload length.
    ///
    /// The compressed flag is checked before the length, so a compressed
    /// frame is always reported as such whatever length it declares.
    pub fn validate(&self, max_message_size: usize) -> Result<usize> {
        if self.compressed_flag != COMPRESSION_NONE {
            return Err(FrameError::UnsupportedCompression(self.compressed_flag));
        }
        let max = max_message_size.min(MAX_MESSAGE_SIZE);
        if u64::from(self.length) > max as u64 {
            return Err(FrameError::MessageTooLarge {
                size: u64::from(self.length),
                max,
            });
        }
        Ok(self.length as usize)
    }
}

/// Configuration shared by readers, writers, and the framed codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum message size in bytes. Default and ceiling: [`MAX_MESSAGE_SIZE`].
    pub max_message_size: usize,
}

impl FrameConfig {
    /// The limit actually enforced, never above [`MAX_MESSAGE_SIZE`].
    pub fn effective_max(&self) -> usize {
        self.max_message_size.min(MAX_MESSAGE_SIZE)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

/// Encode an uncompressed frame into `dst`.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let header = FrameHeader::for_payload(payload.len(), MAX_MESSAGE_SIZE)?;
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&header.encode());
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// The header is validated as soon as it is buffered, before any payload
/// arrives. On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_message_size: usize) -> Result<Option<Bytes>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    let mut raw = [0u8; HEADER_SIZE];
    raw.copy_from_slice(&src[..HEADER_SIZE]);
    let len = FrameHeader::decode(&raw).validate(max_message_size)?;

    if src.len() < HEADER_SIZE + len {
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    Ok(Some(src.split_to(len).freeze()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes_for_three_byte_payload() {
        let mut buf = BytesMut::new();
        encode_frame(&[0x01, 0x02, 0x03], &mut buf).unwrap();
        assert_eq!(
            buf.as_ref(),
            &[0x00, 0x00, 0x00, 0x00, 0x03, 0x01, 0x02, 0x03]
        );
    }

    #[test]
    fn header_length_is_big_endian() {
        let header = FrameHeader {
            compressed_flag: 0,
            length: 0x0102_0304,
        };
        let raw = header.encode();
        assert_eq!(raw, [0x00, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(FrameHeader::decode(&raw), header);
    }

    #[test]
    fn decode_max_unsigned_length_without_overflow() {
        let header = FrameHeader::decode(&[0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(header.length, u32::MAX);
    }

    #[test]
    fn validate_accepts_signed_maximum() {
        let header = FrameHeader {
            compressed_flag: 0,
            length: i32::MAX as u32,
        };
        assert_eq!(header.validate(MAX_MESSAGE_SIZE).unwrap(), MAX_MESSAGE_SIZE);
    }

    #[test]
    fn validate_rejects_length_above_signed_maximum() {
        let header = FrameHeader {
            compressed_flag: 0,
            length: 0x8000_0000,
        };
        let err = header.validate(usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            FrameError::MessageTooLarge {
                size: 0x8000_0000,
                max: MAX_MESSAGE_SIZE
            }
        ));
    }

    #[test]
    fn validate_checks_compression_before_length() {
        for length in [0, 7, u32::MAX] {
            let header = FrameHeader {
                compressed_flag: 1,
                length,
            };
            let err = header.validate(MAX_MESSAGE_SIZE).unwrap_err();
            assert!(matches!(err, FrameError::UnsupportedCompression(1)));
        }
    }

    #[test]
    fn for_payload_respects_configured_limit() {
        assert!(FrameHeader::for_payload(16, 16).is_ok());
        let err = FrameHeader::for_payload(17, 16).unwrap_err();
        assert!(matches!(err, FrameError::MessageTooLarge { size: 17, max: 16 }));
    }

    #[test]
    fn config_limit_is_capped() {
        let cfg = FrameConfig {
            max_message_size: usize::MAX,
        };
        assert_eq!(cfg.effective_max(), MAX_MESSAGE_SIZE);
        assert_eq!(FrameConfig::default().effective_max(), MAX_MESSAGE_SIZE);
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x00, 0x00, 0x00][..]);
        assert!(decode_frame(&mut buf, MAX_MESSAGE_SIZE).unwrap().is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"hello", &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 2);

        assert!(decode_frame(&mut buf, MAX_MESSAGE_SIZE).unwrap().is_none());
        assert_eq!(buf.len(), HEADER_SIZE + 2);
    }

    #[test]
    fn test_decode_rejects_header_before_payload_arrives() {
        let mut buf = BytesMut::from(&[0x00, 0x00, 0x00, 0x04, 0x00][..]);
        let err = decode_frame(&mut buf, 64).unwrap_err();
        assert!(matches!(err, FrameError::MessageTooLarge { size: 1024, max: 64 }));

        let mut buf = BytesMut::from(&[0x01, 0x00, 0x00, 0x00, 0x02][..]);
        let err = decode_frame(&mut buf, MAX_MESSAGE_SIZE).unwrap_err();
        assert!(matches!(err, FrameError::UnsupportedCompression(1)));
    }

    #[test]
    fn test_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(b"first", &mut buf).unwrap();
        encode_frame(b"second", &mut buf).unwrap();

        let first = decode_frame(&mut buf, MAX_MESSAGE_SIZE).unwrap().unwrap();
        let second = decode_frame(&mut buf, MAX_MESSAGE_SIZE).unwrap().unwrap();

        assert_eq!(first.as_ref(), b"first");
        assert_eq!(second.as_ref(), b"second");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0, 0, 0, 0, 0]);

        let payload = decode_frame(&mut buf, MAX_MESSAGE_SIZE).unwrap().unwrap();
        assert!(payload.is_empty());
        assert!(buf.is_empty());
    }
}
