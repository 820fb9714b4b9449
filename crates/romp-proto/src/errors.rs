//! Wire-level errors: malformed headers, oversized payloads, truncated frames.

use thiserror::Error;

/// Errors raised while encoding or decoding frames and headers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The 8-byte window at the current read position did not contain
    /// `FrameHeader::MAGIC` and resynchronisation was abandoned after the
    /// bounded number of retries.
    #[error("magic resync failed after {attempts} re-reads")]
    ResyncFailed {
        /// Number of 8-byte windows discarded before giving up.
        attempts: usize,
    },

    /// The buffer handed to [`crate::FrameHeader::from_bytes`] was shorter
    /// than [`crate::FrameHeader::SIZE`].
    #[error("header buffer too short: got {actual} bytes, need {expected}")]
    HeaderTooShort {
        /// Bytes actually available.
        actual: usize,
        /// Bytes required.
        expected: usize,
    },

    /// A frame claimed more payload bytes than were available to read.
    #[error("frame truncated: expected {expected} payload bytes, got {actual}")]
    FrameTruncated {
        /// Payload length claimed by the header.
        expected: usize,
        /// Payload bytes actually available.
        actual: usize,
    },

    /// A payload exceeded the 16-bit length field's range.
    #[error("payload too large: {size} bytes exceeds the {max}-byte limit")]
    PayloadTooLarge {
        /// Size of the offending payload.
        size: usize,
        /// Maximum allowed payload size (`u16::MAX`).
        max: usize,
    },

    /// The 16-bit `kind` field did not match any [`crate::Kind`] variant.
    #[error("unknown message kind: {0:#06x}")]
    UnknownKind(u16),

    /// CBOR encoding failed.
    #[error("cbor encode error: {0}")]
    CborEncode(String),

    /// CBOR decoding failed.
    #[error("cbor decode error: {0}")]
    CborDecode(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;
