//! Wire format for the distributed object message proxy protocol.
//!
//! This crate owns the bytes: the 8-byte [`FrameHeader`], the [`Frame`]
//! that pairs a header with its payload, the [`Kind`] enum that tags every
//! frame, and the [`Value`]/[`Codec`] pair used to give those payload
//! bytes meaning. It knows nothing about sockets, sessions, or object
//! dispatch — see `romp-core` and above for those.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod errors;
mod frame;
mod header;
mod kind;
mod value;

pub use errors::{ProtocolError, Result};
pub use frame::Frame;
pub use header::FrameHeader;
pub use kind::Kind;
pub use value::{Codec, CborCodec, ObjectReference, RemoteException, Value, TAG_OBJECT_REFERENCE, TAG_REMOTE_EXCEPTION};
