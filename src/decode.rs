//! [`Decode`] implementations and the size-capped decode entry points.
//!
//! Trait implementations bound the decoded length only by the target
//! container's own maximum; the free functions take an explicit `max_size`
//! for callers that decode untrusted input.

use core::cmp::Ordering;

#[cfg(feature = "alloc")]
use alloc::borrow::ToOwned;
#[cfg(feature = "alloc")]
use alloc::collections::BTreeMap;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::collections::HashMap;
#[cfg(feature = "std")]
use std::hash::Hash;

use crate::codec::{ArrayItem, Decode};
use crate::float;
use crate::head::NULL_BYTE;
use crate::{Error, Head, Major, ReadRollback, Reader, Simple};

fn argument_to_len(argument: u64, max_size: usize) -> Result<usize, Error> {
    let len = usize::try_from(argument).map_err(|_| Error::BufferOverflow)?;
    if len > max_size {
        return Err(Error::BufferOverflow);
    }
    Ok(len)
}

fn check_extent(argument: u64, extent: usize) -> Result<(), Error> {
    match argument.cmp(&(extent as u64)) {
        Ordering::Less => Err(Error::BufferUnderflow),
        Ordering::Greater => Err(Error::BufferOverflow),
        Ordering::Equal => Ok(()),
    }
}

fn read_expected(reader: &mut Reader<'_>, major: Major) -> Result<Head, Error> {
    let head = Head::read(reader)?;
    if head.major != major {
        return Err(Error::UnexpectedType);
    }
    Ok(head)
}

fn decode_unsigned(reader: &mut Reader<'_>) -> Result<u64, Error> {
    let head = read_expected(reader, Major::Unsigned)?;
    Ok(head.argument())
}

fn decode_signed(reader: &mut Reader<'_>) -> Result<i64, Error> {
    let head = Head::read(reader)?;
    match head.major {
        // A positive value stored with the unsigned major type.
        Major::Unsigned => {
            i64::try_from(head.argument()).map_err(|_| Error::ValueNotRepresentable)
        }
        // The argument holds `-1 - n`; undo the mapping.
        Major::Negative => {
            let argument =
                i64::try_from(head.argument()).map_err(|_| Error::ValueNotRepresentable)?;
            Ok(-1 - argument)
        }
        _ => Err(Error::UnexpectedType),
    }
}

impl Decode for u8 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_unsigned(&mut scope)?;
        let v = Self::try_from(v).map_err(|_| Error::ValueNotRepresentable)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for u16 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_unsigned(&mut scope)?;
        let v = Self::try_from(v).map_err(|_| Error::ValueNotRepresentable)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for u32 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_unsigned(&mut scope)?;
        let v = Self::try_from(v).map_err(|_| Error::ValueNotRepresentable)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for u64 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_unsigned(&mut scope)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for usize {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_unsigned(&mut scope)?;
        let v = Self::try_from(v).map_err(|_| Error::ValueNotRepresentable)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for i8 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_signed(&mut scope)?;
        let v = Self::try_from(v).map_err(|_| Error::ValueNotRepresentable)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for i16 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_signed(&mut scope)?;
        let v = Self::try_from(v).map_err(|_| Error::ValueNotRepresentable)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for i32 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_signed(&mut scope)?;
        let v = Self::try_from(v).map_err(|_| Error::ValueNotRepresentable)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for i64 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_signed(&mut scope)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for isize {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let v = decode_signed(&mut scope)?;
        let v = Self::try_from(v).map_err(|_| Error::ValueNotRepresentable)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for bool {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let head = read_expected(&mut scope, Major::Simple)?;
        let v = match head.simple() {
            Some(Simple::False) => false,
            Some(Simple::True) => true,
            _ => return Err(Error::UnexpectedType),
        };
        scope.commit();
        Ok(v)
    }
}

impl Decode for () {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let head = read_expected(&mut scope, Major::Simple)?;
        if head.simple() != Some(Simple::Null) {
            return Err(Error::UnexpectedType);
        }
        scope.commit();
        Ok(())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        // One byte of lookahead: null means empty; anything else rewinds and
        // decodes the inner value from the original position.
        let mut scope = ReadRollback::new(reader);
        if scope.read_u8()? == NULL_BYTE {
            scope.commit();
            return Ok(None);
        }
        drop(scope);
        T::decode(reader).map(Some)
    }
}

impl Decode for f32 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let head = Head::read(&mut scope)?;
        let v = float::decode_f32(&head)?;
        scope.commit();
        Ok(v)
    }
}

impl Decode for f64 {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let head = Head::read(&mut scope)?;
        let v = float::decode_f64(&head)?;
        scope.commit();
        Ok(v)
    }
}

/// Decode a text string of at most `max_size` bytes.
///
/// # Errors
///
/// - [`Error::UnexpectedType`] if the next item is not a text string.
/// - [`Error::BufferOverflow`] if the encoded length exceeds `max_size`.
/// - [`Error::Decoding`] if the content is not valid UTF-8.
#[cfg(feature = "alloc")]
pub fn decode_text(reader: &mut Reader<'_>, max_size: usize) -> Result<String, Error> {
    let mut scope = ReadRollback::new(reader);
    let head = read_expected(&mut scope, Major::Text)?;
    let len = argument_to_len(head.argument(), max_size)?;
    let bytes = scope.read_slice(len)?;
    let text = simdutf8::basic::from_utf8(bytes).map_err(|_| Error::Decoding)?;
    let text = text.to_owned();
    scope.commit();
    Ok(text)
}

/// Decode a byte string of at most `max_size` bytes.
///
/// # Errors
///
/// - [`Error::UnexpectedType`] if the next item is not a byte string.
/// - [`Error::BufferOverflow`] if the encoded length exceeds `max_size`.
#[cfg(feature = "alloc")]
pub fn decode_bytes(reader: &mut Reader<'_>, max_size: usize) -> Result<Vec<u8>, Error> {
    let mut scope = ReadRollback::new(reader);
    let head = read_expected(&mut scope, Major::Bytes)?;
    let len = argument_to_len(head.argument(), max_size)?;
    let bytes = scope.read_slice(len)?.to_owned();
    scope.commit();
    Ok(bytes)
}

/// Decode a byte string into a fixed-extent target.
///
/// The encoded length must match `out.len()` exactly.
///
/// # Errors
///
/// - [`Error::UnexpectedType`] if the next item is not a byte string.
/// - [`Error::BufferUnderflow`] / [`Error::BufferOverflow`] if the encoded
///   length is shorter / longer than `out`.
pub fn decode_into_bytes(reader: &mut Reader<'_>, out: &mut [u8]) -> Result<(), Error> {
    let mut scope = ReadRollback::new(reader);
    let head = read_expected(&mut scope, Major::Bytes)?;
    check_extent(head.argument(), out.len())?;
    scope.read_exact(out)?;
    scope.commit();
    Ok(())
}

/// Decode an array of at most `max_size` elements.
///
/// # Errors
///
/// - [`Error::UnexpectedType`] if the next item is not an array.
/// - [`Error::BufferOverflow`] if the encoded length exceeds `max_size`.
#[cfg(feature = "alloc")]
pub fn decode_array<T: Decode + ArrayItem>(
    reader: &mut Reader<'_>,
    max_size: usize,
) -> Result<Vec<T>, Error> {
    let mut scope = ReadRollback::new(reader);
    let head = read_expected(&mut scope, Major::Array)?;
    let len = argument_to_len(head.argument(), max_size)?;
    // Every element takes at least one byte, so the remaining input bounds a
    // sane pre-allocation even for hostile length claims.
    let mut out = Vec::with_capacity(len.min(scope.remaining()));
    for _ in 0..len {
        out.push(T::decode(&mut scope)?);
    }
    scope.commit();
    Ok(out)
}

/// Decode an array into a caller-owned fixed-extent span.
///
/// The encoded length must match `out.len()` exactly; elements are decoded
/// in place.
///
/// # Errors
///
/// - [`Error::UnexpectedType`] if the next item is not an array.
/// - [`Error::BufferUnderflow`] / [`Error::BufferOverflow`] if the encoded
///   length is shorter / longer than `out`.
pub fn decode_into_slice<T: Decode + ArrayItem>(
    reader: &mut Reader<'_>,
    out: &mut [T],
) -> Result<(), Error> {
    let mut scope = ReadRollback::new(reader);
    let head = read_expected(&mut scope, Major::Array)?;
    check_extent(head.argument(), out.len())?;
    for slot in out.iter_mut() {
        *slot = T::decode(&mut scope)?;
    }
    scope.commit();
    Ok(())
}

/// Decode a map of at most `max_size` entries.
///
/// Duplicate keys are not detected; the last occurrence wins, per the
/// container's insert semantics.
///
/// # Errors
///
/// - [`Error::UnexpectedType`] if the next item is not a map.
/// - [`Error::BufferOverflow`] if the encoded entry count exceeds `max_size`.
#[cfg(feature = "alloc")]
pub fn decode_map<K: Decode + Ord, V: Decode>(
    reader: &mut Reader<'_>,
    max_size: usize,
) -> Result<BTreeMap<K, V>, Error> {
    let mut scope = ReadRollback::new(reader);
    let head = read_expected(&mut scope, Major::Map)?;
    let len = argument_to_len(head.argument(), max_size)?;
    let mut out = BTreeMap::new();
    for _ in 0..len {
        let key = K::decode(&mut scope)?;
        let value = V::decode(&mut scope)?;
        out.insert(key, value);
    }
    scope.commit();
    Ok(out)
}

/// Decode a map of at most `max_size` entries into a `HashMap`.
///
/// # Errors
///
/// See [`decode_map`].
#[cfg(feature = "std")]
pub fn decode_hash_map<K: Decode + Eq + Hash, V: Decode>(
    reader: &mut Reader<'_>,
    max_size: usize,
) -> Result<HashMap<K, V>, Error> {
    let mut scope = ReadRollback::new(reader);
    let head = read_expected(&mut scope, Major::Map)?;
    let len = argument_to_len(head.argument(), max_size)?;
    let mut out = HashMap::with_capacity(len.min(scope.remaining()));
    for _ in 0..len {
        let key = K::decode(&mut scope)?;
        let value = V::decode(&mut scope)?;
        out.insert(key, value);
    }
    scope.commit();
    Ok(out)
}

#[cfg(feature = "alloc")]
impl Decode for String {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        decode_text(reader, usize::MAX)
    }
}

#[cfg(feature = "alloc")]
impl Decode for Vec<u8> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        decode_bytes(reader, usize::MAX)
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut out = [0u8; N];
        decode_into_bytes(reader, &mut out)?;
        Ok(out)
    }
}

#[cfg(feature = "alloc")]
impl<T: Decode + ArrayItem> Decode for Vec<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        decode_array(reader, usize::MAX)
    }
}

#[cfg(feature = "alloc")]
impl<T: Decode + ArrayItem, const N: usize> Decode for [T; N] {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let head = read_expected(&mut scope, Major::Array)?;
        check_extent(head.argument(), N)?;
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode(&mut scope)?);
        }
        scope.commit();
        items.try_into().map_err(|_| Error::Decoding)
    }
}

#[cfg(feature = "alloc")]
impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        decode_map(reader, usize::MAX)
    }
}

#[cfg(feature = "std")]
impl<K: Decode + Eq + Hash, V: Decode> Decode for HashMap<K, V> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        decode_hash_map(reader, usize::MAX)
    }
}
