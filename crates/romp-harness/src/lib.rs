//! Test harness for the object message proxy protocol: an in-memory
//! transport plus a roster of demo objects, used to drive the full
//! client/server stack end to end without a real socket.
//!
//! - [`loopback`]: a duplex in-memory [`romp_core::Transport`].
//! - [`demo`]: the `{1 => Echo, 2 => Adder, 3 => Counter, 4 => Yielder,
//!   5 => Thrower}` object roster (§8) that the scenario tests dispatch
//!   against.
//! - [`scenario`]: the §8 end-to-end scenarios and boundary tests
//!   themselves (test-only).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod demo;
pub mod loopback;
mod scenario;

pub use demo::{DemoInvoker, DemoObject, DemoResolver};
pub use loopback::{LoopbackTransport, loopback_pair};
