//! Dynamic value representation and codec.
//!
//! The wire carries opaque, language-defined values (arguments, return
//! values, yielded values, exception objects). Rather than close the value
//! space over a fixed set of Rust types, this module reuses
//! [`ciborium::value::Value`] as-is and layers two reserved CBOR tags on top
//! to carry the two things the protocol itself needs to recognise: object
//! references (so the client can materialise a [proxy](crate) instead of a
//! plain value) and remote exceptions (so the client can reconstruct an
//! error with the server's class name, message, and backtrace).
//!
//! Everything else — numbers, strings, arrays, maps, whatever an
//! application layers on top — passes through `Value` untouched.

use ciborium::value::Value as CborValue;
use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Tag wrapping an object id: "this value is not data, it's a reference to
/// a remote object; materialise a proxy for it." Chosen from CBOR's
/// unassigned private-use range (RFC 8949 reserves 0-23 for core types and
/// leaves the rest open for private agreement between peers).
pub const TAG_OBJECT_REFERENCE: u64 = 0x524F_4D50_0001;

/// Tag wrapping a `{class, message, backtrace}` map: "this value is a
/// remote exception, not a return value."
pub const TAG_REMOTE_EXCEPTION: u64 = 0x524F_4D50_0002;

/// A protocol value: anything that can cross the wire as an argument,
/// return value, yielded value, or exception payload.
pub type Value = CborValue;

/// An object id wrapped for transmission as an [`Self::is_reference`]
/// marker rather than plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    /// Id of the referenced object, as known to the peer that sent it.
    pub object_id: u16,
}

impl ObjectReference {
    /// Wraps this reference as a tagged [`Value`].
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Tag(TAG_OBJECT_REFERENCE, Box::new(Value::Integer(self.object_id.into())))
    }

    /// Recovers an `ObjectReference` from `value`, if it is one.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Tag(tag, inner) = value else { return None };
        if *tag != TAG_OBJECT_REFERENCE {
            return None;
        }
        let Value::Integer(id) = inner.as_ref() else { return None };
        u16::try_from(*id).ok().map(|object_id| Self { object_id })
    }
}

/// A remote exception, reconstructed from an [`Exception`](crate::Kind::Exception)
/// frame's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteException {
    /// Name of the exception's class on the server.
    pub class: String,
    /// Human-readable exception message.
    pub message: String,
    /// Server-side backtrace, merged with the caller's own stack by the
    /// time it reaches application code (see `romp-client`'s dispatcher).
    pub backtrace: Vec<String>,
}

impl RemoteException {
    /// Wraps this exception as a tagged [`Value`].
    ///
    /// # Panics
    ///
    /// Never: encoding a plain struct of strings into CBOR cannot fail.
    #[must_use]
    pub fn into_value(self) -> Value {
        let inner = ciborium::value::Value::serialized(&self)
            .expect("RemoteException serialises infallibly");
        Value::Tag(TAG_REMOTE_EXCEPTION, Box::new(inner))
    }

    /// Recovers a `RemoteException` from `value`, if it is one.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Tag(tag, inner) = value else { return None };
        if *tag != TAG_REMOTE_EXCEPTION {
            return None;
        }
        inner.deserialized().ok()
    }
}

/// Encodes and decodes [`Value`]s to and from frame payload bytes.
///
/// A trait (rather than free functions) so `romp-core`/`romp-client`/
/// `romp-server` can depend on the codec as an opaque collaborator and so
/// an alternative wire encoding could be substituted without touching the
/// rest of the stack.
pub trait Codec: Send + Sync + 'static {
    /// Encodes `value` to bytes suitable for a frame payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::CborEncode`] if `value` cannot be encoded.
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    /// Decodes a frame payload back into a [`Value`].
    ///
    /// An empty `bytes` slice decodes to [`Value::Null`] (the wire
    /// representation of [`crate::Kind::NullMsg`]).
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::CborDecode`] if `bytes` is not valid CBOR.
    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}

/// The [`Codec`] used by every crate in this workspace: CBOR via
/// [`ciborium`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CborCodec;

impl Codec for CborCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        if matches!(value, Value::Null) {
            return Ok(Vec::new());
        }
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).map_err(|err| ProtocolError::CborEncode(err.to_string()))?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        ciborium::from_reader(bytes).map_err(|err| ProtocolError::CborDecode(err.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn object_reference_round_trips() {
        let reference = ObjectReference { object_id: 42 };
        let value = reference.clone().into_value();
        assert_eq!(ObjectReference::from_value(&value), Some(reference));
    }

    #[test]
    fn plain_integer_is_not_a_reference() {
        let value = Value::Integer(42.into());
        assert_eq!(ObjectReference::from_value(&value), None);
    }

    #[test]
    fn remote_exception_round_trips() {
        let exception = RemoteException {
            class: "RuntimeError".to_string(),
            message: "boom".to_string(),
            backtrace: vec!["obj.rb:10".to_string(), "obj.rb:4".to_string()],
        };
        let value = exception.clone().into_value();
        assert_eq!(RemoteException::from_value(&value), Some(exception));
    }

    #[test]
    fn codec_round_trips_plain_values() {
        let codec = CborCodec;
        let value = Value::Array(vec![Value::Integer(1.into()), Value::Text("hi".into())]);
        let encoded = codec.encode(&value).unwrap();
        let decoded = codec.decode(&encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn codec_round_trips_null_as_empty_payload() {
        let codec = CborCodec;
        let encoded = codec.encode(&Value::Null).unwrap();
        assert!(encoded.is_empty());
        assert_eq!(codec.decode(&encoded).unwrap(), Value::Null);
    }

    #[test]
    fn codec_rejects_garbage() {
        let codec = CborCodec;
        assert!(codec.decode(&[0xff, 0xff, 0xff]).is_err());
    }
}
