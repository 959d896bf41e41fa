// Head codec: deterministic argument lengths on write, reserved-form
// rejection and cursor discipline on read.

use typed_cbor::{
    encode_argument, Buffer, DynamicBuffer, Error, Head, Major, Reader, Simple, StaticBuffer,
};

fn head_bytes(major: Major, argument: u64) -> Vec<u8> {
    let mut out = Vec::new();
    encode_argument(&mut DynamicBuffer::new(&mut out), major, argument).unwrap();
    out
}

#[test]
fn argument_boundaries_use_smallest_form() {
    // (argument, expected head length, expected initial byte)
    let table: &[(u64, usize, u8)] = &[
        (0, 1, 0x00),
        (23, 1, 0x17),
        (24, 2, 0x18),
        (255, 2, 0x18),
        (256, 3, 0x19),
        (65_535, 3, 0x19),
        (65_536, 5, 0x1a),
        (u64::from(u32::MAX), 5, 0x1a),
        (u64::from(u32::MAX) + 1, 9, 0x1b),
        (u64::MAX, 9, 0x1b),
    ];

    for &(argument, len, initial) in table {
        let bytes = head_bytes(Major::Unsigned, argument);
        assert_eq!(bytes.len(), len, "head length for {argument}");
        if argument > 23 {
            assert_eq!(bytes[0], initial, "size code for {argument}");
        } else {
            assert_eq!(bytes[0], initial, "inline form for {argument}");
        }
    }
}

#[test]
fn argument_survives_head_round_trip() {
    for &argument in &[
        0u64,
        10,
        23,
        24,
        255,
        256,
        1000,
        65_535,
        65_536,
        u64::from(u32::MAX),
        u64::from(u32::MAX) + 1,
        u64::MAX,
    ] {
        for major in [Major::Unsigned, Major::Negative, Major::Bytes, Major::Array] {
            let bytes = head_bytes(major, argument);
            let mut reader = Reader::new(&bytes);
            let head = Head::read(&mut reader).unwrap();
            assert_eq!(head.major, major);
            assert_eq!(head.argument(), argument);
            assert!(reader.is_empty());
        }
    }
}

#[test]
fn reserved_additional_info_is_ill_formed() {
    for low_bits in 28u8..=30 {
        for major in 0u8..8 {
            let byte = (major << 5) | low_bits;
            let bytes = [byte];
            let mut reader = Reader::new(&bytes);
            assert_eq!(
                Head::read(&mut reader),
                Err(Error::IllFormed),
                "byte {byte:#04x}"
            );
        }
    }
}

#[test]
fn break_stop_code_is_ill_formed() {
    let mut reader = Reader::new(&[0xff]);
    assert_eq!(Head::read(&mut reader), Err(Error::IllFormed));
}

#[test]
fn truncated_head_underflows_at_last_good_position() {
    // Nothing to read at all.
    let mut reader = Reader::new(&[]);
    assert_eq!(Head::read(&mut reader), Err(Error::BufferUnderflow));
    assert_eq!(reader.position(), 0);

    // The initial byte promises one argument byte that is missing. The bare
    // head read does not rewind; atomicity is the rollback scope's job.
    let mut reader = Reader::new(&[0x18]);
    assert_eq!(Head::read(&mut reader), Err(Error::BufferUnderflow));
    assert_eq!(reader.position(), 1);
}

#[test]
fn simple_subtype_extraction() {
    let mut reader = Reader::new(&[0xf5]);
    let head = Head::read(&mut reader).unwrap();
    assert_eq!(head.major, Major::Simple);
    assert_eq!(head.simple(), Some(Simple::True));

    let mut reader = Reader::new(&[0xf9, 0x3c, 0x00]);
    let head = Head::read(&mut reader).unwrap();
    assert_eq!(head.simple(), Some(Simple::HalfFloat));
    assert_eq!(head.extra_bytes, 2);
    assert_eq!(head.argument(), 0x3c00);

    // Unassigned subtype values have no Simple mapping.
    let mut reader = Reader::new(&[0xe0]);
    let head = Head::read(&mut reader).unwrap();
    assert_eq!(head.simple(), None);
}

#[test]
fn head_emission_is_atomic_on_full_buffer() {
    let mut storage = [0u8; 2];
    let mut buf = StaticBuffer::new(&mut storage);
    buf.write_u8(0xaa).unwrap();

    // A three-byte head does not fit into the single remaining byte.
    assert_eq!(
        encode_argument(&mut buf, Major::Unsigned, 256),
        Err(Error::BufferOverflow)
    );
    assert_eq!(buf.as_bytes(), [0xaa]);
}
