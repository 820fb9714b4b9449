//! Fixed 8-byte frame header.
//!
//! Layout (all fields big-endian `u16`): `[magic, len, kind, object_id]`.
//! There is no checksum and no version field; integrity is the transport's
//! job, not this codec's.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::errors::{ProtocolError, Result};

/// Raw 8-byte frame header.
///
/// Parsing only validates that enough bytes are present; it does not check
/// `magic` (that's [`crate::Kind`] and the resync loop's job in
/// `romp-core`) and does not validate `kind` (unknown kinds surface as
/// [`ProtocolError::UnknownKind`] at the point a caller tries to interpret
/// them as a [`crate::Kind`]).
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C, packed)]
pub struct FrameHeader {
    magic: [u8; 2],
    len: [u8; 2],
    kind: [u8; 2],
    object_id: [u8; 2],
}

impl FrameHeader {
    /// Size of the header on the wire.
    pub const SIZE: usize = 8;

    /// Constant value every valid header must carry at offset 0.
    pub const MAGIC: u16 = 0x4242;

    /// Largest payload length representable by the 16-bit `len` field.
    pub const MAX_PAYLOAD_SIZE: u16 = u16::MAX;

    /// Builds a header for a frame of the given kind, object id, and payload
    /// length. `magic` is always set to [`Self::MAGIC`].
    #[must_use]
    pub fn new(kind: crate::Kind, object_id: u16, payload_len: u16) -> Self {
        Self {
            magic: Self::MAGIC.to_be_bytes(),
            len: payload_len.to_be_bytes(),
            kind: kind.to_u16().to_be_bytes(),
            object_id: object_id.to_be_bytes(),
        }
    }

    /// Parses a header from the first [`Self::SIZE`] bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::HeaderTooShort`] if fewer than [`Self::SIZE`]
    /// bytes are available.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let slice = bytes.get(..Self::SIZE).ok_or(ProtocolError::HeaderTooShort {
            actual: bytes.len(),
            expected: Self::SIZE,
        })?;
        Self::ref_from_bytes(slice)
            .map_err(|_| ProtocolError::HeaderTooShort { actual: bytes.len(), expected: Self::SIZE })
    }

    /// Serialises this header to its 8-byte wire form.
    #[must_use]
    pub fn to_bytes(self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    /// The `magic` field, as written.
    #[must_use]
    pub fn magic(&self) -> u16 {
        u16::from_be_bytes(self.magic)
    }

    /// `true` if `magic` matches [`Self::MAGIC`].
    #[must_use]
    pub fn magic_valid(&self) -> bool {
        self.magic() == Self::MAGIC
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn payload_len(&self) -> u16 {
        u16::from_be_bytes(self.len)
    }

    /// Raw `kind` field, before interpretation as a [`crate::Kind`].
    #[must_use]
    pub fn kind_raw(&self) -> u16 {
        u16::from_be_bytes(self.kind)
    }

    /// `kind` interpreted as a [`crate::Kind`], or `None` if unrecognised.
    #[must_use]
    pub fn kind(&self) -> Option<crate::Kind> {
        crate::Kind::from_u16(self.kind_raw())
    }

    /// Target object id (or sync tag, for `Sync` frames).
    #[must_use]
    pub fn object_id(&self) -> u16 {
        u16::from_be_bytes(self.object_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::Kind;

    impl Arbitrary for FrameHeader {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>())
                .prop_map(|(magic, len, kind, object_id)| Self {
                    magic: magic.to_be_bytes(),
                    len: len.to_be_bytes(),
                    kind: kind.to_be_bytes(),
                    object_id: object_id.to_be_bytes(),
                })
                .boxed()
        }
    }

    #[test]
    fn header_size_is_eight_bytes() {
        assert_eq!(FrameHeader::SIZE, 8);
        assert_eq!(std::mem::size_of::<FrameHeader>(), 8);
    }

    proptest! {
        #[test]
        fn header_round_trip(kind in any::<u16>(), object_id in any::<u16>(), len in any::<u16>()) {
            prop_assume!(Kind::from_u16(kind).is_some());
            let kind = Kind::from_u16(kind).unwrap();
            let header = FrameHeader::new(kind, object_id, len);
            let bytes = header.to_bytes();
            let parsed = FrameHeader::from_bytes(&bytes).expect("should parse");

            prop_assert_eq!(parsed.magic(), FrameHeader::MAGIC);
            prop_assert_eq!(parsed.payload_len(), len);
            prop_assert_eq!(parsed.kind_raw(), kind.to_u16());
            prop_assert_eq!(parsed.object_id(), object_id);
        }
    }

    #[test]
    fn header_accessors() {
        let header = FrameHeader::new(Kind::Request, 7, 42);
        assert!(header.magic_valid());
        assert_eq!(header.payload_len(), 42);
        assert_eq!(header.kind(), Some(Kind::Request));
        assert_eq!(header.object_id(), 7);
    }

    #[test]
    fn rejects_short_buffer() {
        let bytes = [0u8; 4];
        let result = FrameHeader::from_bytes(&bytes);
        assert!(matches!(result, Err(ProtocolError::HeaderTooShort { actual: 4, expected: 8 })));
    }

    #[test]
    fn detects_invalid_magic() {
        let mut bytes = FrameHeader::new(Kind::Request, 0, 0).to_bytes();
        bytes[0] = 0x00;
        let header = FrameHeader::from_bytes(&bytes).expect("still parses structurally");
        assert!(!header.magic_valid());
    }
}
