// Property-based tests: round-trips, deterministic output, atomicity.
//
// Kept intentionally conservative in size/depth to keep CI fast.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;

use proptest::prelude::*;

use typed_cbor::{
    decode_from_slice, encode_argument, encode_to_vec, Decode, DynamicBuffer, Encode, Major,
    Reader,
};

fn arb_string() -> impl Strategy<Value = String> {
    // Weighted towards the head-length boundaries.
    prop_oneof![
        8 => "[a-z\u{00a1}-\u{00ff}]{0,32}",
        1 => "[a-z]{23}",
        1 => "[a-z]{24}",
        1 => "[a-z]{255}",
        1 => "[a-z]{256}",
    ]
}

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        8 => proptest::collection::vec(any::<u8>(), 0..=64),
        1 => proptest::collection::vec(any::<u8>(), 23..=24),
        1 => proptest::collection::vec(any::<u8>(), 255..=256),
    ]
}

fn arb_argument() -> impl Strategy<Value = u64> {
    prop_oneof![
        3 => any::<u64>(),
        1 => 0u64..=32,
        1 => Just(23u64),
        1 => Just(24u64),
        1 => Just(255u64),
        1 => Just(256u64),
        1 => Just(65_535u64),
        1 => Just(65_536u64),
        1 => Just(u64::from(u32::MAX)),
        1 => Just(u64::from(u32::MAX) + 1),
        1 => Just(u64::MAX),
    ]
}

fn expected_head_len(argument: u64) -> usize {
    match argument {
        0..=23 => 1,
        24..=0xff => 2,
        0x100..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

fn roundtrip<T: Encode + Decode + PartialEq + std::fmt::Debug>(value: &T) {
    let bytes = encode_to_vec(value).unwrap();
    let decoded: T = decode_from_slice(&bytes).unwrap();
    assert_eq!(&decoded, value);

    // Deterministic: re-encoding the decoded value reproduces the bytes.
    assert_eq!(encode_to_vec(&decoded).unwrap(), bytes);
}

proptest! {
    #[test]
    fn head_uses_smallest_argument_form(argument in arb_argument()) {
        let mut out = Vec::new();
        encode_argument(&mut DynamicBuffer::new(&mut out), Major::Unsigned, argument).unwrap();
        prop_assert_eq!(out.len(), expected_head_len(argument));

        let mut reader = Reader::new(&out);
        let head = typed_cbor::Head::read(&mut reader).unwrap();
        prop_assert_eq!(head.argument(), argument);
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn unsigned_roundtrip(v in any::<u64>()) {
        roundtrip(&v);
    }

    #[test]
    fn signed_roundtrip(v in any::<i64>()) {
        roundtrip(&v);
    }

    #[test]
    fn narrow_integers_roundtrip(a in any::<u8>(), b in any::<i8>(), c in any::<u16>(), d in any::<i16>()) {
        roundtrip(&a);
        roundtrip(&b);
        roundtrip(&c);
        roundtrip(&d);
    }

    #[test]
    fn float_roundtrip(v in proptest::num::f64::POSITIVE | proptest::num::f64::NEGATIVE | proptest::num::f64::ZERO | proptest::num::f64::SUBNORMAL | proptest::num::f64::INFINITE) {
        roundtrip(&v);
    }

    #[test]
    fn float_nan_decodes_to_nan(payload in any::<u64>()) {
        let bits = 0x7ff0_0000_0000_0000 | (payload >> 12) | 1;
        let bytes = encode_to_vec(&f64::from_bits(bits)).unwrap();
        prop_assert_eq!(&bytes, &[0xf9, 0x7e, 0x00], "canonical NaN bytes");
        let decoded: f64 = decode_from_slice(&bytes).unwrap();
        prop_assert!(decoded.is_nan());
    }

    #[test]
    fn single_float_roundtrip(v in proptest::num::f32::POSITIVE | proptest::num::f32::NEGATIVE | proptest::num::f32::ZERO | proptest::num::f32::SUBNORMAL) {
        roundtrip(&v);
    }

    #[test]
    fn text_roundtrip(v in arb_string()) {
        roundtrip(&v);
    }

    #[test]
    fn bytes_roundtrip(v in arb_bytes()) {
        roundtrip(&v);
    }

    #[test]
    fn array_roundtrip(v in proptest::collection::vec(any::<u64>(), 0..=48)) {
        roundtrip(&v);
    }

    #[test]
    fn nested_array_roundtrip(v in proptest::collection::vec(proptest::collection::vec(any::<u16>(), 0..=8), 0..=8)) {
        roundtrip(&v);
    }

    #[test]
    fn optional_roundtrip(v in proptest::option::of(any::<i32>())) {
        roundtrip(&v);
    }

    #[test]
    fn map_roundtrip(v in proptest::collection::btree_map(any::<u64>(), arb_string(), 0..=16)) {
        roundtrip(&v);
    }

    #[test]
    fn truncated_input_never_decodes(v in proptest::collection::vec(any::<u32>(), 0..=16), cut in any::<proptest::sample::Index>()) {
        let bytes = encode_to_vec(&v).unwrap();
        // A proper prefix of one definite-length item is always incomplete.
        let cut = cut.index(bytes.len());
        let mut reader = Reader::new(&bytes[..cut]);
        prop_assert!(Vec::<u32>::decode(&mut reader).is_err());
        prop_assert_eq!(reader.position(), 0, "failed decode restores the cursor");
    }

    #[test]
    fn capped_buffer_failures_leave_no_trace(v in proptest::collection::vec(any::<u64>(), 1..=16), cap in 0usize..=8) {
        let full = encode_to_vec(&v).unwrap();
        prop_assume!(full.len() > cap);

        let mut out = Vec::new();
        let mut buf = DynamicBuffer::with_max_capacity(&mut out, cap);
        prop_assert!(v.encode(&mut buf).is_err());
        prop_assert!(out.is_empty());
    }

    #[test]
    fn map_roundtrip_deep(v in proptest::collection::btree_map(arb_string(), proptest::collection::vec(any::<i64>(), 0..=4), 0..=8)) {
        roundtrip(&v);
    }
}

#[test]
fn signed_boundaries_roundtrip() {
    for v in [
        i64::MIN,
        i64::MIN + 1,
        -65_537,
        -65_536,
        -257,
        -256,
        -25,
        -24,
        -1,
        0,
        1,
        23,
        24,
        i64::MAX,
    ] {
        let bytes = encode_to_vec(&v).unwrap();
        assert_eq!(decode_from_slice::<i64>(&bytes).unwrap(), v);
    }
}

#[test]
fn mixed_record_of_containers_roundtrips() {
    let mut map = BTreeMap::new();
    map.insert("alpha".to_string(), vec![1u64, 2, 3]);
    map.insert("beta".to_string(), Vec::new());
    roundtrip(&map);
}
