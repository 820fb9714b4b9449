//! Client side of the object message proxy protocol.
//!
//! # Components
//!
//! - [`Proxy`]: handle to a remote object, driving the four call modes
//!   (`call`, `call_with_yield`, `oneway`, `oneway_sync`) plus `sync`.
//! - [`Materialised`]: a decoded value or a freshly materialised proxy,
//!   returned wherever the server may have sent back an object reference.
//! - [`ClientError`]: errors surfaced by a [`Proxy`]'s operations,
//!   including reconstructed remote exceptions.
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled (on by default), this crate also
//! provides [`transport::TcpTransport`], a plain TCP
//! [`romp_core::Transport`] implementation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod proxy;

#[cfg(feature = "transport")]
pub mod transport;

pub use error::{ClientError, Result};
pub use proxy::{Materialised, Proxy};
