//! Deterministic float narrowing.
//!
//! Every NaN encodes as the canonical half-precision NaN and every infinity
//! as the canonical half-precision infinity, regardless of payload bits.
//! Finite values encode at the smallest width that round-trips exactly;
//! half-precision packing is delegated to the `half` crate.

use half::f16;

use crate::head::{encode_argument_u16, encode_argument_u32, encode_argument_u64};
use crate::{Buffer, Error, Head, Major, Simple};

const CANONICAL_NAN: [u8; 3] = [0xf9, 0x7e, 0x00];
const CANONICAL_POS_INF: [u8; 3] = [0xf9, 0x7c, 0x00];
const CANONICAL_NEG_INF: [u8; 3] = [0xf9, 0xfc, 0x00];

const HALF_POS_INF: u16 = 0x7c00;
const HALF_NEG_INF: u16 = 0xfc00;
const HALF_NAN: u16 = 0x7e00;

const SINGLE_POS_INF: u32 = 0x7f80_0000;
const SINGLE_NEG_INF: u32 = 0xff80_0000;
const SINGLE_NAN: u32 = 0x7fc0_0000;

const DOUBLE_POS_INF: u64 = 0x7ff0_0000_0000_0000;
const DOUBLE_NEG_INF: u64 = 0xfff0_0000_0000_0000;
const DOUBLE_NAN: u64 = 0x7ff8_0000_0000_0000;

fn encode_special<B: Buffer + ?Sized>(buf: &mut B, v: f64) -> Option<Result<(), Error>> {
    if v.is_nan() {
        return Some(buf.write(&CANONICAL_NAN));
    }
    if v.is_infinite() {
        let bytes = if v > 0.0 {
            &CANONICAL_POS_INF
        } else {
            &CANONICAL_NEG_INF
        };
        return Some(buf.write(bytes));
    }
    None
}

fn encode_finite_f32<B: Buffer + ?Sized>(buf: &mut B, v: f32) -> Result<(), Error> {
    let packed = f16::from_f32(v);
    if packed.to_f32() == v {
        return encode_argument_u16(buf, Major::Simple, packed.to_bits());
    }
    encode_argument_u32(buf, Major::Simple, v.to_bits())
}

pub(crate) fn encode_f32<B: Buffer + ?Sized>(buf: &mut B, v: f32) -> Result<(), Error> {
    if let Some(res) = encode_special(buf, f64::from(v)) {
        return res;
    }
    encode_finite_f32(buf, v)
}

pub(crate) fn encode_f64<B: Buffer + ?Sized>(buf: &mut B, v: f64) -> Result<(), Error> {
    if let Some(res) = encode_special(buf, v) {
        return res;
    }

    #[allow(clippy::cast_possible_truncation)]
    let single = v as f32;
    if f64::from(single) == v {
        return encode_finite_f32(buf, single);
    }
    encode_argument_u64(buf, Major::Simple, v.to_bits())
}

#[allow(clippy::cast_possible_truncation)]
fn half_bits(head: &Head) -> u16 {
    head.argument() as u16
}

#[allow(clippy::cast_possible_truncation)]
fn single_bits(head: &Head) -> u32 {
    head.argument() as u32
}

pub(crate) fn decode_f32(head: &Head) -> Result<f32, Error> {
    if head.major != Major::Simple {
        return Err(Error::UnexpectedType);
    }

    match head.simple() {
        Some(Simple::HalfFloat) => Ok(match half_bits(head) {
            HALF_POS_INF => f32::INFINITY,
            HALF_NEG_INF => f32::NEG_INFINITY,
            HALF_NAN => f32::NAN,
            bits => f16::from_bits(bits).to_f32(),
        }),
        Some(Simple::SingleFloat) => Ok(match single_bits(head) {
            SINGLE_POS_INF => f32::INFINITY,
            SINGLE_NEG_INF => f32::NEG_INFINITY,
            SINGLE_NAN => f32::NAN,
            bits => f32::from_bits(bits),
        }),
        Some(Simple::DoubleFloat) => match head.argument() {
            DOUBLE_POS_INF => Ok(f32::INFINITY),
            DOUBLE_NEG_INF => Ok(f32::NEG_INFINITY),
            DOUBLE_NAN => Ok(f32::NAN),
            bits => {
                let wide = f64::from_bits(bits);
                if wide.is_nan() {
                    return Ok(f32::NAN);
                }
                #[allow(clippy::cast_possible_truncation)]
                let narrow = wide as f32;
                if f64::from(narrow) == wide {
                    Ok(narrow)
                } else {
                    Err(Error::ValueNotRepresentable)
                }
            }
        },
        _ => Err(Error::UnexpectedType),
    }
}

pub(crate) fn decode_f64(head: &Head) -> Result<f64, Error> {
    if head.major != Major::Simple {
        return Err(Error::UnexpectedType);
    }

    match head.simple() {
        Some(Simple::HalfFloat) => Ok(match half_bits(head) {
            HALF_POS_INF => f64::INFINITY,
            HALF_NEG_INF => f64::NEG_INFINITY,
            HALF_NAN => f64::NAN,
            bits => f64::from(f16::from_bits(bits).to_f32()),
        }),
        Some(Simple::SingleFloat) => Ok(match single_bits(head) {
            SINGLE_POS_INF => f64::INFINITY,
            SINGLE_NEG_INF => f64::NEG_INFINITY,
            SINGLE_NAN => f64::NAN,
            bits => f64::from(f32::from_bits(bits)),
        }),
        Some(Simple::DoubleFloat) => Ok(match head.argument() {
            DOUBLE_POS_INF => f64::INFINITY,
            DOUBLE_NEG_INF => f64::NEG_INFINITY,
            DOUBLE_NAN => f64::NAN,
            bits => f64::from_bits(bits),
        }),
        _ => Err(Error::UnexpectedType),
    }
}
