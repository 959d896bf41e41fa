// Arbitrary input must never panic a typed decode, and a failed decode must
// leave the reader where it started.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

use typed_cbor::{Decode, Reader};

fn probe<T: Decode>(data: &[u8]) {
    let mut reader = Reader::new(data);
    if T::decode(&mut reader).is_err() {
        assert_eq!(reader.position(), 0);
    }
}

fuzz_target!(|data: &[u8]| {
    probe::<u64>(data);
    probe::<i64>(data);
    probe::<f64>(data);
    probe::<bool>(data);
    probe::<String>(data);
    probe::<Vec<u8>>(data);
    probe::<Vec<i64>>(data);
    probe::<Option<f32>>(data);
    probe::<BTreeMap<String, Vec<u8>>>(data);
    probe::<Vec<Vec<u32>>>(data);
});
