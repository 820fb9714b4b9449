//! Driver-level error type.
//!
//! Kept as hand-written `Display`/`Error` impls (rather than
//! `thiserror`-derived, the way `romp-proto`/`romp-core`/`romp-client` are)
//! to preserve the mixed error-handling texture already present across this
//! workspace's crates.

use std::fmt;

use romp_core::RompError;

use crate::registry::InvokeError;

/// Errors raised while dispatching a single request through a
/// [`crate::driver::ServerContext`].
#[derive(Debug)]
pub enum ServerError {
    /// The session-level send/receive failed (I/O, framing, or codec
    /// error). Fatal to the connection.
    Session(RompError),

    /// [`crate::registry::Resolver::resolve`] found no target for the
    /// requested object id.
    UnknownObject(u16),

    /// The target method raised, and the raised error carries no
    /// reconstructable class/message (an [`InvokeError::Internal`]).
    /// Distinct from a well-formed application exception, which the
    /// dispatcher turns into an `EXCEPTION` frame rather than this error.
    Invoke(InvokeError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(err) => write!(f, "session error: {err}"),
            Self::UnknownObject(id) => write!(f, "no object registered for id {id}"),
            Self::Invoke(err) => write!(f, "invocation error: {err}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Session(err) => Some(err),
            Self::Invoke(err) => Some(err),
            Self::UnknownObject(_) => None,
        }
    }
}

impl From<RompError> for ServerError {
    fn from(err: RompError) -> Self {
        Self::Session(err)
    }
}

impl From<InvokeError> for ServerError {
    fn from(err: InvokeError) -> Self {
        Self::Invoke(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_failure() {
        assert_eq!(ServerError::UnknownObject(9).to_string(), "no object registered for id 9");
    }
}
