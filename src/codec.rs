#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::{
    encode_argument, Buffer, Error, Head, Major, ReadRollback, Reader, WriteRollback,
};

#[cfg(feature = "alloc")]
use crate::DynamicBuffer;

/// Encode a value into a CBOR data item.
///
/// Dispatch is fully static: the compiler selects the implementation for the
/// value's type, and a call for an unsupported type does not compile. Every
/// implementation either writes one complete item or, on failure, leaves the
/// buffer byte-identical to its state before the call.
pub trait Encode {
    /// Append the encoding of `self` to `buf`.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any nested write; the buffer is rewound
    /// to its pre-call size.
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error>;
}

/// Decode a value from a CBOR data item.
///
/// The counterpart of [`Encode`]; each call consumes exactly one data item.
/// On failure the reader's cursor is restored to its pre-call position.
pub trait Decode: Sized {
    /// Read one data item from `reader` and convert it to `Self`.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any nested read; the cursor is restored
    /// to its pre-call position.
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error>;
}

/// The wire identifier of an aggregate type.
///
/// Tagged-union alternatives are told apart on the wire by this constant, so
/// every alternative of one union must carry a distinct, positive ID. The
/// derive macros check distinctness at compile time; an ID is attached with
/// `#[cbor(type_id = ...)]` on the record definition.
pub trait TypeId {
    /// The identifier encoded ahead of the record in boxed and tagged-union
    /// framings.
    const TYPE_ID: i64;
}

/// Marker for types that may appear as array elements.
///
/// `u8` deliberately does not implement this: a sequence of `u8` is a CBOR
/// byte string (major type 2), not an array, and the marker is what keeps
/// the two encodings from overlapping in trait resolution.
pub trait ArrayItem {}

/// A record wrapped in its type-identifying envelope.
///
/// Encodes as the two-element array `[type_id, record]` instead of the bare
/// field concatenation, which lets a reader dispatch on the identifier
/// before committing to a record layout. Decoding checks the identifier
/// against `T`'s and rejects a mismatch with [`Error::UnexpectedType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Boxed<T>(pub T);

impl<T: Encode + TypeId> Encode for Boxed<T> {
    fn encode<B: Buffer + ?Sized>(&self, buf: &mut B) -> Result<(), Error> {
        let mut scope = WriteRollback::new(buf);
        encode_argument(&mut *scope, Major::Array, 2)?;
        T::TYPE_ID.encode(&mut *scope)?;
        self.0.encode(&mut *scope)?;
        scope.commit();
        Ok(())
    }
}

impl<T: Decode + TypeId> Decode for Boxed<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, Error> {
        let mut scope = ReadRollback::new(reader);
        let id = decode_variant_id(&mut scope)?;
        if id != T::TYPE_ID {
            return Err(Error::UnexpectedType);
        }
        let value = T::decode(&mut scope)?;
        scope.commit();
        Ok(Self(value))
    }
}

impl<T> ArrayItem for Boxed<T> {}

/// Read the `[type_id, payload]` envelope head and return the type ID.
///
/// Used by the generated tagged-union decoders and by hand-written variant
/// codecs. The cursor is left in front of the payload; the caller decodes it
/// (or rolls back via its own scope).
///
/// # Errors
///
/// - [`Error::UnexpectedType`] if the next item is not an array.
/// - [`Error::Decoding`] if the array does not have exactly two elements.
pub fn decode_variant_id(reader: &mut Reader<'_>) -> Result<i64, Error> {
    let head = Head::read(reader)?;
    if head.major != Major::Array {
        return Err(Error::UnexpectedType);
    }
    if head.argument() != 2 {
        return Err(Error::Decoding);
    }
    i64::decode(reader)
}

/// Encode `value` into a freshly allocated byte vector.
///
/// # Errors
///
/// Returns any error produced by the value's [`Encode`] implementation.
#[cfg(feature = "alloc")]
pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let mut buf = DynamicBuffer::new(&mut out);
    value.encode(&mut buf)?;
    Ok(out)
}

/// Decode a single value from the front of `bytes`.
///
/// Trailing bytes after the decoded item are not an error; use a [`Reader`]
/// directly to decode several consecutive items.
///
/// # Errors
///
/// Returns any error produced by the target type's [`Decode`]
/// implementation.
pub fn decode_from_slice<T: Decode>(bytes: &[u8]) -> Result<T, Error> {
    let mut reader = Reader::new(bytes);
    T::decode(&mut reader)
}
