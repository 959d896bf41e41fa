//! [`Encode`] implementations for the supported host types.

#[cfg(feature = "alloc")]
use alloc::collections::BTreeMap;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::codec::{ArrayItem, Encode};
use crate::float;
use crate::head::NULL_BYTE;
use crate::{encode_argument, Buffer, Error, Major, Simple, WriteRollback};

fn encode_len<B: Buffer + ?Sized>(buf: &mut B, major: Major, len: usize) -> Result<(), Error> {
    let len = u64::try_from(len).map_err(|_| Error::ValueNotRepresentable)?;
    encode_argument(buf, major, len)
}

/// The negative mapping `-1 - v`, computed in unsigned arithmetic so that
/// `i64::MIN` maps to `i64::MAX` without overflow.
#[allow(clippy::cast_sign_loss)]
const fn negative_argument(v: i64) -> u64 {
    !(v as u64)
}

#[allow(clippy::cast_sign_loss)]
fn encode_signed<B: Buffer + ?Sized>(buf: &mut B, v: i64) -> Result<(), Error> {
    if v >= 0 {
        encode_argument(buf, Major::Unsigned, v as u64)
    } else {
        encode_argument(buf, Major::Negative, negative_argument(v))
    }
}

fn encode_text<B: Buffer + ?Sized>(buf: &mut B, v: &str) -> Result<(), Error> {
    let bytes = v.as_bytes();
    let mut scope = WriteRollback::new(buf);
    encode_len(&mut *scope, Major::Text, bytes.len())?;
    scope.write(bytes)?;
    scope.commit();
    Ok(())
}

fn encode_bytes<B: Buffer + ?Sized>(buf: &mut B, v: &[u8]) -> Result<(), Error> {
    let mut scope = WriteRollback::new(buf);
    encode_len(&mut *scope, Major::Bytes, v.len())?;
    scope.write(v)?;
    scope.commit();
    Ok(())
}

impl Encode for u8 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_argument(buf, Major::Unsigned, u64::from(*self))
    }
}

impl Encode for u16 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_argument(buf, Major::Unsigned, u64::from(*self))
    }
}

impl Encode for u32 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_argument(buf, Major::Unsigned, u64::from(*self))
    }
}

impl Encode for u64 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_argument(buf, Major::Unsigned, *self)
    }
}

impl Encode for usize {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        let v = u64::try_from(*self).map_err(|_| Error::ValueNotRepresentable)?;
        encode_argument(buf, Major::Unsigned, v)
    }
}

impl Encode for i8 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_signed(buf, i64::from(*self))
    }
}

impl Encode for i16 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_signed(buf, i64::from(*self))
    }
}

impl Encode for i32 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_signed(buf, i64::from(*self))
    }
}

impl Encode for i64 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_signed(buf, *self)
    }
}

impl Encode for isize {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        let v = i64::try_from(*self).map_err(|_| Error::ValueNotRepresentable)?;
        encode_signed(buf, v)
    }
}

impl Encode for bool {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        let simple = if *self { Simple::True } else { Simple::False };
        buf.write_u8(simple.initial_byte())
    }
}

impl Encode for () {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        buf.write_u8(NULL_BYTE)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        match self {
            Some(v) => v.encode(buf),
            None => buf.write_u8(NULL_BYTE),
        }
    }
}

impl Encode for f32 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        float::encode_f32(buf, *self)
    }
}

impl Encode for f64 {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        float::encode_f64(buf, *self)
    }
}

impl Encode for &str {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_text(buf, self)
    }
}

#[cfg(feature = "alloc")]
impl Encode for String {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_text(buf, self)
    }
}

impl Encode for [u8] {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_bytes(buf, self)
    }
}

impl Encode for &[u8] {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_bytes(buf, self)
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_bytes(buf, self)
    }
}

#[cfg(feature = "alloc")]
impl Encode for Vec<u8> {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        encode_bytes(buf, self)
    }
}

impl<T: Encode + ArrayItem> Encode for [T] {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        let mut scope = WriteRollback::new(buf);
        encode_len(&mut *scope, Major::Array, self.len())?;
        for item in self {
            item.encode(&mut *scope)?;
        }
        scope.commit();
        Ok(())
    }
}

impl<T: Encode + ArrayItem> Encode for &[T] {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        (**self).encode(buf)
    }
}

impl<T: Encode + ArrayItem, const N: usize> Encode for [T; N] {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        self.as_slice().encode(buf)
    }
}

#[cfg(feature = "alloc")]
impl<T: Encode + ArrayItem> Encode for Vec<T> {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        self.as_slice().encode(buf)
    }
}

// Keys and values are emitted in the container's iteration order; the
// library never re-orders entries, so deterministic map ordering is the
// caller's contract with its container.
#[cfg(feature = "alloc")]
impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        let mut scope = WriteRollback::new(buf);
        encode_len(&mut *scope, Major::Map, self.len())?;
        for (key, value) in self {
            key.encode(&mut *scope)?;
            value.encode(&mut *scope)?;
        }
        scope.commit();
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        let mut scope = WriteRollback::new(buf);
        encode_len(&mut *scope, Major::Map, self.len())?;
        for (key, value) in self {
            key.encode(&mut *scope)?;
            value.encode(&mut *scope)?;
        }
        scope.commit();
        Ok(())
    }
}

impl ArrayItem for bool {}
impl ArrayItem for () {}
impl ArrayItem for u16 {}
impl ArrayItem for u32 {}
impl ArrayItem for u64 {}
impl ArrayItem for usize {}
impl ArrayItem for i8 {}
impl ArrayItem for i16 {}
impl ArrayItem for i32 {}
impl ArrayItem for i64 {}
impl ArrayItem for isize {}
impl ArrayItem for f32 {}
impl ArrayItem for f64 {}
impl ArrayItem for &str {}
#[cfg(feature = "alloc")]
impl ArrayItem for String {}
impl ArrayItem for &[u8] {}
impl<const N: usize> ArrayItem for [u8; N] {}
#[cfg(feature = "alloc")]
impl ArrayItem for Vec<u8> {}
impl<T: ArrayItem> ArrayItem for Option<T> {}
impl<T: ArrayItem> ArrayItem for &[T] {}
impl<T: ArrayItem, const N: usize> ArrayItem for [T; N] {}
#[cfg(feature = "alloc")]
impl<T: ArrayItem> ArrayItem for Vec<T> {}
#[cfg(feature = "alloc")]
impl<K, V> ArrayItem for BTreeMap<K, V> {}
#[cfg(feature = "std")]
impl<K, V, S> ArrayItem for HashMap<K, V, S> {}
