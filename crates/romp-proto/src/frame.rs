//! Frame type combining header and payload.
//!
//! A `Frame` is the transport-layer packet: an 8-byte header (see
//! [`crate::FrameHeader`]) followed by `len` raw payload bytes. This is a
//! pure data holder; for high-level value access see [`crate::Value`] and
//! [`crate::Codec`].

use bytes::{BufMut, Bytes};

use crate::{
    FrameHeader,
    errors::{ProtocolError, Result},
};

/// Complete protocol frame (header + raw payload bytes).
///
/// # Invariants
///
/// `payload.len()` always matches `header.payload_len()`; [`Frame::new`]
/// enforces this at construction and [`Frame::decode`] enforces it on the
/// way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame's 8-byte header.
    pub header: FrameHeader,
    /// Raw payload bytes (already encoded by the codec).
    pub payload: Bytes,
}

impl Frame {
    /// Creates a frame, recomputing the header's `len` field from `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PayloadTooLarge`] if `payload` exceeds
    /// [`FrameHeader::MAX_PAYLOAD_SIZE`] (65535 bytes).
    pub fn new(
        kind: crate::Kind,
        object_id: u16,
        payload: impl Into<Bytes>,
    ) -> Result<Self> {
        let payload = payload.into();
        let len = u16::try_from(payload.len()).map_err(|_| ProtocolError::PayloadTooLarge {
            size: payload.len(),
            max: FrameHeader::MAX_PAYLOAD_SIZE as usize,
        })?;
        Ok(Self { header: FrameHeader::new(kind, object_id, len), payload })
    }

    /// Writes `[header bytes][payload bytes]` into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.payload);
    }

    /// Decodes a frame from a buffer already known to start with a valid
    /// header (i.e. after the magic-resync loop in `romp-core` has aligned
    /// the read position). Does not perform magic resynchronisation itself.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::HeaderTooShort`] if fewer than
    ///   [`FrameHeader::SIZE`] bytes are available.
    /// - [`ProtocolError::FrameTruncated`] if fewer than `header.payload_len()`
    ///   bytes follow the header.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = *FrameHeader::from_bytes(bytes)?;
        let payload_len = header.payload_len() as usize;
        let total = FrameHeader::SIZE + payload_len;

        if bytes.len() < total {
            return Err(ProtocolError::FrameTruncated {
                expected: payload_len,
                actual: bytes.len().saturating_sub(FrameHeader::SIZE),
            });
        }

        let payload = Bytes::copy_from_slice(&bytes[FrameHeader::SIZE..total]);
        Ok(Self { header, payload })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::Kind;

    impl Arbitrary for Frame {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            (0u16..=0x4002, any::<u16>(), proptest::collection::vec(any::<u8>(), 0..256))
                .prop_filter_map("kind must be known", |(raw, object_id, payload)| {
                    Kind::from_u16(raw).map(|kind| (kind, object_id, payload))
                })
                .prop_map(|(kind, object_id, payload)| Frame::new(kind, object_id, payload).unwrap())
                .boxed()
        }
    }

    proptest! {
        #[test]
        fn frame_round_trip(frame in any::<Frame>()) {
            let mut wire = Vec::new();
            frame.encode(&mut wire);

            let parsed = Frame::decode(&wire).expect("should decode");
            prop_assert_eq!(frame.payload, parsed.payload);
            prop_assert_eq!(frame.header.kind_raw(), parsed.header.kind_raw());
            prop_assert_eq!(frame.header.object_id(), parsed.header.object_id());
        }
    }

    #[test]
    fn frame_with_payload_sets_len() {
        let frame = Frame::new(Kind::Retval, 0, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(frame.header.payload_len(), 4);

        let mut wire = Vec::new();
        frame.encode(&mut wire);
        let parsed = Frame::decode(&wire).expect("should decode");
        assert_eq!(frame.payload, parsed.payload);
    }

    #[test]
    fn rejects_truncated_frame() {
        let header = FrameHeader::new(Kind::Retval, 0, 100);
        let result = Frame::decode(&header.to_bytes());
        assert!(matches!(result, Err(ProtocolError::FrameTruncated { expected: 100, actual: 0 })));
    }

    #[test]
    fn rejects_oversized_payload() {
        let oversized = vec![0u8; FrameHeader::MAX_PAYLOAD_SIZE as usize + 1];
        let result = Frame::new(Kind::Retval, 0, oversized);
        assert!(matches!(result, Err(ProtocolError::PayloadTooLarge { .. })));
    }
}
