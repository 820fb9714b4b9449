//! Collaborator traits a [`crate::driver::ServerContext`] dispatches
//! through (§6): [`Resolver`] finds the target behind an object id,
//! [`Invoker`] runs a method against it, [`Logger`] observes dispatch.
//!
//! Kept to a single method each, unlike the teacher's `ConnectionRegistry`
//! (room/session subscription bookkeeping): this protocol has no concept of
//! rooms or multi-session broadcast, just a flat id→target lookup per
//! connection.

use std::fmt;

use romp_proto::Value;

/// Looks up the target behind an object id.
///
/// Implementations own however targets are actually stored (a `Vec`, a
/// `HashMap`, a generated dispatch table); this trait only commits to "id
/// in, target out."
pub trait Resolver: Send + Sync {
    /// The resolved target type, passed on to [`Invoker::invoke`].
    type Target;

    /// Resolves `object_id` to its target, or `None` if nothing is
    /// registered under that id.
    fn resolve(&self, object_id: u16) -> Option<Self::Target>;
}

/// Invokes a method against a resolved target.
pub trait Invoker: Send + Sync {
    /// The target type this invoker knows how to call, matching some
    /// [`Resolver::Target`].
    type Target;

    /// Runs `message` against `target` for a plain `REQUEST`, returning
    /// either a return value or an [`InvokeError`].
    fn invoke(&self, target: &Self::Target, message: &Value) -> Result<Value, InvokeError>;

    /// Runs `message` against `target` for a `REQUEST_BLOCK`, calling
    /// `on_yield` once per intermediate value the method produces before
    /// its final return.
    ///
    /// [`crate::driver::ServerContext::dispatch`] buffers each call into a
    /// `YIELD` frame sent before the final `RETVAL`/`EXCEPTION` (see that
    /// module's docs for why buffering, rather than sending frames from
    /// inside this synchronous callback, is necessary). The default
    /// implementation is correct for any target whose methods never
    /// yield: it ignores `on_yield` and delegates to [`Self::invoke`].
    fn invoke_with_yield(
        &self,
        target: &Self::Target,
        message: &Value,
        on_yield: &mut dyn FnMut(Value),
    ) -> Result<Value, InvokeError> {
        let _ = on_yield;
        self.invoke(target, message)
    }
}

/// An error raised by [`Invoker::invoke`].
///
/// Distinguishes an application-level exception (carries a class name and
/// message the client can reconstruct, §4.5) from an internal failure (a
/// bug in the invoker itself, which the dispatcher surfaces as
/// [`crate::server_error::ServerError::Invoke`] rather than an `EXCEPTION`
/// frame).
#[derive(Debug, Clone)]
pub enum InvokeError {
    /// The target method raised an application exception.
    Application {
        /// Name of the exception's class.
        class: String,
        /// Human-readable message.
        message: String,
        /// Frames contributed by the target method itself, before the
        /// dispatcher's own backtrace trimming (§4.5) is applied.
        backtrace: Vec<String>,
    },
    /// The invoker itself failed in a way unrelated to the application
    /// (e.g. a malformed argument list it cannot even attempt to dispatch).
    Internal(String),
}

impl InvokeError {
    /// Shorthand for [`Self::Application`] with an empty backtrace.
    #[must_use]
    pub fn application(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Application { class: class.into(), message: message.into(), backtrace: Vec::new() }
    }

    /// [`Self::Application`] with an explicit backtrace.
    #[must_use]
    pub fn application_with_backtrace(
        class: impl Into<String>,
        message: impl Into<String>,
        backtrace: Vec<String>,
    ) -> Self {
        Self::Application { class: class.into(), message: message.into(), backtrace }
    }
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application { class, message, .. } => write!(f, "{class}: {message}"),
            Self::Internal(message) => write!(f, "internal invoker error: {message}"),
        }
    }
}

impl std::error::Error for InvokeError {}

/// Observes dispatch activity. A trait (rather than baking in `tracing`
/// directly) so a test harness can assert on what was logged.
pub trait Logger: Send + Sync {
    /// A request was dispatched to `object_id`.
    fn on_dispatch(&self, object_id: u16, kind: romp_proto::Kind);

    /// A target raised `error` while handling a request to `object_id`.
    fn on_error(&self, object_id: u16, error: &InvokeError);
}

/// A [`Logger`] that forwards to [`tracing`], the way every other crate in
/// this workspace reports diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn on_dispatch(&self, object_id: u16, kind: romp_proto::Kind) {
        tracing::debug!(object_id, ?kind, "dispatching");
    }

    fn on_error(&self, object_id: u16, error: &InvokeError) {
        tracing::warn!(object_id, %error, "invocation failed");
    }
}
