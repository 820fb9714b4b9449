//! Transport abstraction, cooperative I/O, and framed sessions for the
//! object message proxy protocol.
//!
//! This crate sits between the wire format (`romp-proto`) and the parts
//! that know what a message *means* (`romp-client`'s dispatcher,
//! `romp-server`'s dispatch loop). It owns exactly three things: the
//! [`Transport`] trait concrete transports implement, the fill/drain loops
//! in [`io`] that make reads and writes cooperative rather than blocking
//! the executor, and [`Session`], which turns a transport into a stream of
//! [`Message`]s.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod io;

mod error;
mod session;
mod transport;

pub use error::{Result, RompError};
pub use session::{Message, Session};
pub use transport::Transport;
