// Whatever decodes successfully must re-encode to a decodable item that
// compares equal: the deterministic profile as a fixpoint.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;
use std::fmt::Debug;

use typed_cbor::{decode_from_slice, encode_to_vec, Decode, Encode};

fn fixpoint<T: Encode + Decode + PartialEq + Debug>(data: &[u8]) {
    let Ok(value) = decode_from_slice::<T>(data) else {
        return;
    };
    let bytes = encode_to_vec(&value).expect("decoded values must re-encode");
    let again: T = decode_from_slice(&bytes).expect("re-encoded values must decode");
    assert_eq!(again, value);
    assert_eq!(encode_to_vec(&again).unwrap(), bytes);
}

fuzz_target!(|data: &[u8]| {
    fixpoint::<u64>(data);
    fixpoint::<i64>(data);
    fixpoint::<String>(data);
    fixpoint::<Vec<u8>>(data);
    fixpoint::<Vec<i64>>(data);
    fixpoint::<BTreeMap<u64, String>>(data);
});
