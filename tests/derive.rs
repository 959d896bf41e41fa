// Derived record, enumeration and tagged-union codecs.

use typed_cbor::{
    decode_from_slice, encode_to_vec, Boxed, Decode, DynamicBuffer, Encode, Error, Reader, TypeId,
};

#[derive(Debug, PartialEq, Encode, Decode)]
#[cbor(type_id = 0xBEEF)]
struct Telemetry {
    channel: i8,
    reading: f64,
    label: String,
}

#[derive(Debug, PartialEq, Encode, Decode)]
#[cbor(type_id = 0xDEAF)]
struct Heartbeat {
    sequence: Option<i32>,
    healthy: bool,
}

#[derive(Debug, PartialEq, Encode, Decode)]
enum Message {
    Telemetry(Telemetry),
    Heartbeat(Heartbeat),
}

#[derive(Debug, PartialEq, Encode, Decode)]
#[cbor(type_id = 0xA0AA)]
struct Tagged(u8);

#[derive(Debug, Clone, Copy, PartialEq, Encode, Decode)]
enum Priority {
    Low = 1,
    Normal = 2,
    High = 10,
}

#[derive(Debug, PartialEq, Encode, Decode)]
struct Nested {
    inner: Telemetry,
    flags: Vec<bool>,
}

fn sample_telemetry() -> Telemetry {
    Telemetry {
        channel: 1,
        reading: 0.0,
        label: "a".to_string(),
    }
}

#[test]
fn record_is_a_bare_field_concatenation() {
    // No array header: just the fields back to back.
    assert_eq!(
        encode_to_vec(&sample_telemetry()).unwrap(),
        [0x01, 0xf9, 0x00, 0x00, 0x61, 0x61]
    );

    let decoded: Telemetry =
        decode_from_slice(&[0x01, 0xf9, 0x00, 0x00, 0x61, 0x61]).unwrap();
    assert_eq!(decoded, sample_telemetry());
}

#[test]
fn record_round_trips() {
    for value in [
        Heartbeat {
            sequence: None,
            healthy: true,
        },
        Heartbeat {
            sequence: Some(77),
            healthy: false,
        },
    ] {
        let bytes = encode_to_vec(&value).unwrap();
        assert_eq!(decode_from_slice::<Heartbeat>(&bytes).unwrap(), value);
    }
}

#[test]
fn type_ids_are_attached() {
    assert_eq!(Telemetry::TYPE_ID, 0xBEEF);
    assert_eq!(Heartbeat::TYPE_ID, 0xDEAF);
    assert_eq!(Tagged::TYPE_ID, 0xA0AA);
}

#[test]
fn variant_envelope_bytes() {
    let message = Message::Telemetry(sample_telemetry());
    assert_eq!(
        encode_to_vec(&message).unwrap(),
        [0x82, 0x19, 0xbe, 0xef, 0x01, 0xf9, 0x00, 0x00, 0x61, 0x61]
    );

    let message = Message::Heartbeat(Heartbeat {
        sequence: None,
        healthy: true,
    });
    assert_eq!(
        encode_to_vec(&message).unwrap(),
        [0x82, 0x19, 0xde, 0xaf, 0xf6, 0xf5]
    );
}

#[test]
fn variant_decodes_by_type_id() {
    let decoded: Message =
        decode_from_slice(&[0x82, 0x19, 0xbe, 0xef, 0x01, 0xf9, 0x00, 0x00, 0x61, 0x61]).unwrap();
    assert_eq!(decoded, Message::Telemetry(sample_telemetry()));

    let decoded: Message = decode_from_slice(&[0x82, 0x19, 0xde, 0xaf, 0xf6, 0xf5]).unwrap();
    assert_eq!(
        decoded,
        Message::Heartbeat(Heartbeat {
            sequence: None,
            healthy: true,
        })
    );
}

#[test]
fn variant_error_cases() {
    // Unknown type ID.
    assert_eq!(
        decode_from_slice::<Message>(&[0x82, 0x19, 0xbe, 0xed, 0xf6, 0xf5]),
        Err(Error::UnexpectedType)
    );
    // Envelope is not an array.
    assert_eq!(
        decode_from_slice::<Message>(&[0x40]),
        Err(Error::UnexpectedType)
    );
    // Envelope has the wrong arity.
    assert_eq!(
        decode_from_slice::<Message>(&[0x83, 0x01, 0x02, 0x03]),
        Err(Error::Decoding)
    );
    // Type ID slot holds a non-integer.
    assert_eq!(
        decode_from_slice::<Message>(&[0x82, 0x61, 0x61, 0xf5]),
        Err(Error::UnexpectedType)
    );
}

#[test]
fn variant_decode_failure_restores_cursor() {
    let bytes = [0x82, 0x19, 0xbe, 0xed, 0xf6, 0xf5];
    let mut reader = Reader::new(&bytes);
    assert_eq!(Message::decode(&mut reader), Err(Error::UnexpectedType));
    assert_eq!(reader.position(), 0);
}

#[test]
fn variant_encode_rolls_back_on_overflow() {
    let message = Message::Telemetry(sample_telemetry());
    for cap in [0usize, 1, 4, 6] {
        let mut vec = Vec::new();
        let mut buf = DynamicBuffer::with_max_capacity(&mut vec, cap);
        assert_eq!(message.encode(&mut buf), Err(Error::BufferOverflow), "cap {cap}");
        assert!(vec.is_empty(), "cap {cap}");
    }
}

#[test]
fn boxed_record_carries_its_type_id() {
    let boxed = Boxed(Tagged(0x62));
    assert_eq!(
        encode_to_vec(&boxed).unwrap(),
        [0x82, 0x19, 0xa0, 0xaa, 0x18, 0x62]
    );
    assert_eq!(
        decode_from_slice::<Boxed<Tagged>>(&[0x82, 0x19, 0xa0, 0xaa, 0x18, 0x62]).unwrap(),
        boxed
    );

    // A bare record has no envelope.
    assert_eq!(encode_to_vec(&Tagged(0x72)).unwrap(), [0x18, 0x72]);

    // A mismatched ID is rejected.
    assert_eq!(
        decode_from_slice::<Boxed<Tagged>>(&[0x82, 0x19, 0xbe, 0xef, 0x18, 0x62]),
        Err(Error::UnexpectedType)
    );
}

#[test]
fn enumeration_codes_through_its_discriminant() {
    assert_eq!(encode_to_vec(&Priority::Low).unwrap(), [0x01]);
    assert_eq!(encode_to_vec(&Priority::High).unwrap(), [0x0a]);

    assert_eq!(decode_from_slice::<Priority>(&[0x02]).unwrap(), Priority::Normal);
    assert_eq!(
        decode_from_slice::<Priority>(&[0x03]),
        Err(Error::ValueNotRepresentable),
        "unknown discriminant"
    );
    assert_eq!(
        decode_from_slice::<Priority>(&[0x61, 0x61]),
        Err(Error::UnexpectedType)
    );
}

#[test]
fn enumeration_decode_failure_restores_cursor() {
    let bytes = [0x03, 0x02];
    let mut reader = Reader::new(&bytes);
    assert_eq!(Priority::decode(&mut reader), Err(Error::ValueNotRepresentable));
    assert_eq!(reader.position(), 0);
    assert_eq!(Priority::decode(&mut reader), Err(Error::ValueNotRepresentable));
}

#[test]
fn records_nest_and_appear_in_arrays() {
    let value = Nested {
        inner: sample_telemetry(),
        flags: vec![true, false],
    };
    let bytes = encode_to_vec(&value).unwrap();
    assert_eq!(
        bytes,
        [0x01, 0xf9, 0x00, 0x00, 0x61, 0x61, 0x82, 0xf5, 0xf4]
    );
    assert_eq!(decode_from_slice::<Nested>(&bytes).unwrap(), value);

    // Records are array elements.
    let list = vec![Tagged(1), Tagged(2)];
    let bytes = encode_to_vec(&list).unwrap();
    assert_eq!(bytes, [0x82, 0x01, 0x02]);
    assert_eq!(decode_from_slice::<Vec<Tagged>>(&bytes).unwrap(), list);
}

#[test]
fn record_decode_is_atomic() {
    // The label field is truncated: every consumed byte is given back.
    let bytes = [0x01, 0xf9, 0x00, 0x00, 0x62, 0x61];
    let mut reader = Reader::new(&bytes);
    assert_eq!(Telemetry::decode(&mut reader), Err(Error::BufferUnderflow));
    assert_eq!(reader.position(), 0);
}

#[test]
fn option_of_record_uses_null_lookahead() {
    let value: Option<Tagged> = Some(Tagged(7));
    assert_eq!(encode_to_vec(&value).unwrap(), [0x07]);
    assert_eq!(decode_from_slice::<Option<Tagged>>(&[0x07]).unwrap(), value);
    assert_eq!(decode_from_slice::<Option<Tagged>>(&[0xf6]).unwrap(), None);
}
