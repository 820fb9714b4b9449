//! Server side of the object message proxy protocol.
//!
//! # Components
//!
//! - [`ServerContext`]: runs the `recv → dispatch → reply` loop (§4.5)
//!   against a [`Resolver`]/[`Invoker`] pair.
//! - [`Resolver`]/[`Invoker`]/[`Logger`]: the collaborator traits an
//!   application implements to plug its own object model into the loop.
//! - [`ServerError`]: top-level errors from running a server.
//! - [`TcpTransport`]: a plain TCP [`romp_core::Transport`] for accepted
//!   connections.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod error;
mod registry;
mod server_error;
mod transport;

pub use driver::ServerContext;
pub use error::ServerError;
pub use registry::{InvokeError, Invoker, Logger, Resolver, TracingLogger};
pub use transport::TcpTransport;
