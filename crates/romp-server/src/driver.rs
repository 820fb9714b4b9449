//! Server `recv → dispatch → reply` loop (§4.5).
//!
//! Grounded on `original_source/romp_helper.c`'s `server_loop`/
//! `server_reply`/`server_exception` functions: a single task repeatedly
//! reads one message, routes it through [`Resolver`]/[`Invoker`], and
//! writes back exactly the reply (if any) the kind calls for. Unlike the
//! teacher's `ServerDriver` (an event/action sans-io split for a
//! multi-room, multi-connection server) this is a single-session blocking
//! dispatch loop: ROMP has no rooms, no broadcast, and exactly one
//! in-flight request per session (§5), so there is nothing for an
//! event/action split to buy here.

use romp_core::{RompError, Session, Transport};
use romp_proto::{Kind, RemoteException, Value};

use crate::{
    registry::{InvokeError, Invoker, Logger, Resolver},
    server_error::ServerError,
};

/// Runs the dispatch loop described in §4.5, §6's `serve(S, resolver,
/// debug)`.
pub struct ServerContext<R, I, L> {
    resolver: R,
    invoker: I,
    logger: L,
    debug: bool,
}

impl<R, I, L> ServerContext<R, I, L>
where
    R: Resolver,
    I: Invoker<Target = R::Target>,
    L: Logger,
{
    /// Builds a context. `debug` controls whether exceptions swallowed by
    /// `ONEWAY` are also logged (§7: "logged (if debug) and discarded").
    pub fn new(resolver: R, invoker: I, logger: L, debug: bool) -> Self {
        Self { resolver, invoker, logger, debug }
    }

    /// Runs the loop until the session's peer disconnects or a fatal
    /// session-level error occurs.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Session`] on any I/O or protocol failure
    /// other than a clean disconnect; a clean disconnect (peer closed
    /// between messages) is not an error.
    pub async fn serve<T: Transport>(&self, session: &mut Session<T>) -> Result<(), ServerError> {
        loop {
            let message = match session.recv_message().await {
                Ok(message) => message,
                Err(RompError::Disconnected) => return Ok(()),
                Err(err) => return Err(err.into()),
            };
            self.dispatch(session, message.kind, message.object_id, message.value).await?;
        }
    }

    /// Routes one decoded message per the §4.5 dispatch table, writing
    /// back whatever reply (if any) that kind calls for.
    async fn dispatch<T: Transport>(
        &self,
        session: &mut Session<T>,
        kind: Kind,
        object_id: u16,
        value: Value,
    ) -> Result<(), ServerError> {
        self.logger.on_dispatch(object_id, kind);

        match kind {
            Kind::Request => match self.invoke(object_id, &value) {
                Ok(result) => session.send_message(Kind::Retval, 0, &result).await?,
                Err(failure) => self.send_exception(session, failure).await?,
            },
            Kind::RequestBlock => {
                let mut yielded = Vec::new();
                let outcome = self.invoke_with_yield(object_id, &value, &mut yielded);
                for value in yielded {
                    session.send_message(Kind::Yield, 0, &value).await?;
                }
                match outcome {
                    Ok(result) => session.send_message(Kind::Retval, 0, &result).await?,
                    Err(failure) => self.send_exception(session, failure).await?,
                }
            },
            Kind::Oneway => {
                if let Err(failure) = self.invoke(object_id, &value) {
                    if self.debug {
                        self.logger.on_error(object_id, &failure.invoke_error());
                    }
                }
            },
            Kind::OnewaySync => {
                session.send_null(object_id).await?;
                if let Err(failure) = self.invoke(object_id, &value) {
                    if self.debug {
                        self.logger.on_error(object_id, &failure.invoke_error());
                    }
                }
            },
            Kind::Sync => {
                if object_id == 0 {
                    session.send_message(Kind::Sync, 1, &Value::Null).await?;
                }
            },
            other => {
                let failure = Failure::BadRequest(other);
                self.send_exception(session, failure).await?;
            },
        }
        Ok(())
    }

    fn invoke(&self, object_id: u16, message: &Value) -> Result<Value, Failure> {
        let target = self.resolver.resolve(object_id).ok_or(Failure::UnknownObject(object_id))?;
        self.invoker.invoke(&target, message).map_err(Failure::Invoke)
    }

    fn invoke_with_yield(
        &self,
        object_id: u16,
        message: &Value,
        yielded: &mut Vec<Value>,
    ) -> Result<Value, Failure> {
        let target = self.resolver.resolve(object_id).ok_or(Failure::UnknownObject(object_id))?;
        let mut on_yield = |value: Value| yielded.push(value);
        self.invoker.invoke_with_yield(&target, message, &mut on_yield).map_err(Failure::Invoke)
    }

    /// Sends `failure` as an `EXCEPTION` frame (§4.5), applying the
    /// backtrace-trimming rule. Our dispatcher never pushes a frame of its
    /// own onto the backtrace (unlike the client's response loop, which
    /// appends the caller's frame) so "truncate the dispatcher's own
    /// frames" has nothing to remove here; the trimming step is a no-op in
    /// this implementation by construction, not by omission.
    async fn send_exception<T: Transport>(
        &self,
        session: &mut Session<T>,
        failure: Failure,
    ) -> Result<(), ServerError> {
        let exc = failure.into_remote_exception();
        if self.debug {
            tracing::warn!(class = %exc.class, message = %exc.message, "exception");
        }
        session.send_message(Kind::Exception, 0, &exc.into_value()).await?;
        Ok(())
    }
}

/// Internal representation of anything that turns into an `EXCEPTION`
/// frame: an application exception from [`Invoker`], an unresolved object
/// id, or a message kind the server has no business receiving.
enum Failure {
    UnknownObject(u16),
    Invoke(InvokeError),
    BadRequest(Kind),
}

impl Failure {
    fn invoke_error(&self) -> InvokeError {
        match self {
            Self::UnknownObject(id) => InvokeError::Internal(format!("no object registered for id {id}")),
            Self::Invoke(err) => err.clone(),
            Self::BadRequest(kind) => InvokeError::Internal(format!("bad session request: {kind:?}")),
        }
    }

    fn into_remote_exception(self) -> RemoteException {
        match self {
            Self::UnknownObject(id) => RemoteException {
                class: "ProtocolError".to_string(),
                message: format!("no object registered for id {id}"),
                backtrace: Vec::new(),
            },
            Self::Invoke(InvokeError::Application { class, message, backtrace }) => {
                RemoteException { class, message, backtrace }
            },
            Self::Invoke(InvokeError::Internal(message)) => {
                RemoteException { class: "InternalError".to_string(), message, backtrace: Vec::new() }
            },
            Self::BadRequest(kind) => RemoteException {
                class: "ProtocolError".to_string(),
                message: format!("bad session request: {kind:?}"),
                backtrace: Vec::new(),
            },
        }
    }
}
