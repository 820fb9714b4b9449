//! Errors raised by the I/O and session layers.

use std::io;

use thiserror::Error;

/// Errors that can occur while sending or receiving messages over a
/// [`Session`](crate::Session).
#[derive(Error, Debug)]
pub enum RompError {
    /// The peer closed the connection mid-read or mid-write.
    #[error("peer disconnected")]
    Disconnected,

    /// A non-blocking operation had no data/space ready and `nonblock` was
    /// set; the caller should retry later rather than wait here.
    #[error("operation would block")]
    WouldBlock,

    /// An underlying transport I/O error (anything other than
    /// [`io::ErrorKind::WouldBlock`], which becomes [`Self::WouldBlock`]).
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    /// The wire format was malformed: bad magic after exhausting resync
    /// attempts, a truncated frame, an unknown message kind, or a codec
    /// failure.
    #[error("protocol error: {0}")]
    Protocol(#[from] romp_proto::ProtocolError),

    /// A value decoded successfully but did not have the shape the caller
    /// expected (e.g. a `Sync` frame whose payload wasn't a bare sync tag,
    /// or a reply that should have been a reference but wasn't tagged as
    /// one).
    #[error("type error: {0}")]
    TypeError(String),
}

impl RompError {
    /// `true` if retrying the operation that produced this error might
    /// succeed without any corrective action (currently only
    /// [`Self::WouldBlock`]).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::WouldBlock)
    }
}

/// Convenience alias used throughout `romp-core` and its dependents.
pub type Result<T> = std::result::Result<T, RompError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn would_block_is_transient() {
        assert!(RompError::WouldBlock.is_transient());
        assert!(!RompError::Disconnected.is_transient());
    }

    #[test]
    fn wraps_protocol_error() {
        let protocol = romp_proto::ProtocolError::UnknownKind(0);
        let err: RompError = protocol.into();
        assert!(matches!(err, RompError::Protocol(_)));
    }
}
