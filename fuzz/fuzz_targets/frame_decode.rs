//! Fuzz target for `Frame::decode`.
//!
//! Tests frame decoding with arbitrary byte sequences to find parser
//! crashes, integer overflows in the length calculation, and buffer
//! over-reads. The decoder should never panic; all invalid input must
//! return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use romp_proto::Frame;

fuzz_target!(|data: &[u8]| {
    let _ = Frame::decode(data);
});
