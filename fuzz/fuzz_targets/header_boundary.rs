//! Fuzz target for frame header boundary conditions.
//!
//! Exercises `FrameHeader::from_bytes` against adversarial combinations of
//! magic/len/kind/object_id rather than fully random bytes, so the corpus
//! actually reaches the interesting edges: valid magic with a bogus kind,
//! garbage magic with an otherwise well-formed header, `len` at `u16::MAX`.
//!
//! # Invariants
//!
//! - A header parsed from fewer than 8 bytes always returns
//!   `ProtocolError::HeaderTooShort`, never panics.
//! - `magic_valid()` is `true` iff the first two bytes are `0x42 0x42`.
//! - Every accessor round-trips through `to_bytes`/`from_bytes` without
//!   truncation or sign confusion (all fields are plain `u16`).

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use romp_proto::{FrameHeader, Kind};

#[derive(Debug, Clone, Arbitrary)]
struct BoundaryHeader {
    magic: MagicBytes,
    len: u16,
    kind: u16,
    object_id: u16,
}

#[derive(Debug, Clone, Arbitrary)]
enum MagicBytes {
    Valid,
    AllZeros,
    AllOnes,
    Random([u8; 2]),
}

fuzz_target!(|boundary: BoundaryHeader| {
    let mut bytes = [0u8; FrameHeader::SIZE];
    match boundary.magic {
        MagicBytes::Valid => bytes[0..2].copy_from_slice(&FrameHeader::MAGIC.to_be_bytes()),
        MagicBytes::AllZeros => bytes[0..2].fill(0),
        MagicBytes::AllOnes => bytes[0..2].fill(0xFF),
        MagicBytes::Random(raw) => bytes[0..2].copy_from_slice(&raw),
    }
    bytes[2..4].copy_from_slice(&boundary.len.to_be_bytes());
    bytes[4..6].copy_from_slice(&boundary.kind.to_be_bytes());
    bytes[6..8].copy_from_slice(&boundary.object_id.to_be_bytes());

    let Ok(header) = FrameHeader::from_bytes(&bytes) else {
        unreachable!("a full 8-byte buffer always parses structurally");
    };

    assert_eq!(header.magic_valid(), matches!(boundary.magic, MagicBytes::Valid));
    assert_eq!(header.payload_len(), boundary.len);
    assert_eq!(header.object_id(), boundary.object_id);
    assert_eq!(header.kind().is_some(), Kind::from_u16(boundary.kind).is_some());

    for short in 0..FrameHeader::SIZE {
        assert!(FrameHeader::from_bytes(&bytes[..short]).is_err());
    }
});
