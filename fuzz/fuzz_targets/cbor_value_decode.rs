//! Fuzz target for CBOR value deserialization attacks.
//!
//! Exercises `CborCodec::decode` (and, on the bytes that do decode, a round
//! trip back through `CborCodec::encode`) against deeply nested structures,
//! huge claimed lengths, and plain random bytes.
//!
//! # Invariants
//!
//! - Decoding completes without panicking or looping forever, no matter how
//!   deeply nested or how large the claimed length.
//! - An empty slice always decodes to `Value::Null` (the `NullMsg` wire
//!   convention), never an error.
//! - Anything that decodes successfully re-encodes to bytes that decode
//!   back to an equal `Value`.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use romp_proto::{CborCodec, Codec};

#[derive(Debug, Clone, Arbitrary)]
enum CborAttack {
    DeeplyNested { depth: u8, shape: NestedShape },
    HugeLength { claimed_len_exponent: u8 },
    RandomBytes { bytes: Vec<u8> },
}

#[derive(Debug, Clone, Arbitrary)]
enum NestedShape {
    Array,
    Map,
}

fuzz_target!(|attack: CborAttack| {
    let codec = CborCodec;

    let bytes = match attack {
        CborAttack::DeeplyNested { depth, shape } => nested_cbor((depth % 64) as usize, &shape),
        CborAttack::HugeLength { claimed_len_exponent } => huge_array((claimed_len_exponent % 21) as u32),
        CborAttack::RandomBytes { bytes } => bytes,
    };

    if let Ok(value) = codec.decode(&bytes) {
        let Ok(reencoded) = codec.encode(&value) else { return };
        let Ok(roundtripped) = codec.decode(&reencoded) else {
            panic!("a value we just encoded ourselves must decode back");
        };
        assert_eq!(value, roundtripped);
    }
});

fn nested_cbor(depth: usize, shape: &NestedShape) -> Vec<u8> {
    let mut bytes = Vec::new();
    let wrapper = match shape {
        NestedShape::Array => 0x81u8,
        NestedShape::Map => 0xA1,
    };
    for _ in 0..depth {
        bytes.push(wrapper);
        if matches!(shape, NestedShape::Map) {
            bytes.push(0x61);
            bytes.push(b'k');
        }
    }
    bytes.push(0x01);
    bytes
}

fn huge_array(exponent: u32) -> Vec<u8> {
    let claimed_length = if exponent < 20 { 1u32 << exponent } else { u32::MAX };
    let mut bytes = vec![0x9A];
    bytes.extend_from_slice(&claimed_length.to_be_bytes());
    for _ in 0..(claimed_length as usize).min(5) {
        bytes.push(0x01);
    }
    bytes
}
