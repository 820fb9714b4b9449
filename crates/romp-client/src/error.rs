//! Errors surfaced by [`crate::Proxy`]'s four call operations.

use romp_proto::{Kind, RemoteException};
use thiserror::Error;

/// Errors raised while making a call against a [`crate::Proxy`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// I/O, protocol, or type error from the underlying session. Fatal to
    /// the session per §7: the caller should treat the transport as dead.
    #[error(transparent)]
    Session(#[from] romp_core::RompError),

    /// The server raised an exception while handling a `REQUEST`/
    /// `REQUEST_BLOCK`. Reconstructed locally with the server's class name
    /// and message, and the server's backtrace with this call's own frame
    /// appended (§4.4, §9).
    #[error("remote exception ({class}): {message}")]
    Remote {
        /// Name of the exception's class on the server.
        class: String,
        /// Human-readable exception message.
        message: String,
        /// Server backtrace, with the local call site appended.
        backtrace: Vec<String>,
    },

    /// An `EXCEPTION` frame's payload did not decode to a
    /// [`RemoteException`] tag.
    #[error("malformed exception payload")]
    MalformedException,

    /// The response loop or `oneway_sync`/`sync` received a frame kind it
    /// has no handling for.
    #[error("invalid msg type received: {0:?}")]
    UnexpectedKind(Kind),

    /// `sync()` received a reply other than `Sync(object_id=1)` (§9, open
    /// question resolved: any other frame is a protocol error).
    #[error("ROMP synchronization failed")]
    SyncFailed,
}

impl ClientError {
    /// Builds [`Self::Remote`] from a decoded [`RemoteException`],
    /// appending `caller_frame` to its backtrace the way the original's
    /// `client_request` concatenates `remote.backtrace ++ local.caller()`.
    #[must_use]
    pub fn from_remote_exception(exc: RemoteException, caller_frame: String) -> Self {
        let mut backtrace = exc.backtrace;
        backtrace.push(caller_frame);
        Self::Remote { class: exc.class, message: exc.message, backtrace }
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_exception_appends_caller_frame() {
        let exc = RemoteException {
            class: "RuntimeError".to_string(),
            message: "boom".to_string(),
            backtrace: vec!["thrower.rs:12".to_string()],
        };
        let err = ClientError::from_remote_exception(exc, "proxy.rs:80".to_string());
        match err {
            ClientError::Remote { class, message, backtrace } => {
                assert_eq!(class, "RuntimeError");
                assert_eq!(message, "boom");
                assert_eq!(backtrace, vec!["thrower.rs:12".to_string(), "proxy.rs:80".to_string()]);
            },
            other => panic!("expected Remote, got {other:?}"),
        }
    }
}
