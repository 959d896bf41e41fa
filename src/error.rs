use core::fmt;

/// The closed set of failure conditions reported by this crate.
///
/// The enum is intentionally `Copy` and string-free so that error paths stay
/// allocation-free and usable in `no_std` builds. Errors from nested codecs
/// propagate to the caller unchanged; the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Internal encoder inconsistency. Does not occur on well-formed inputs.
    Encoding,

    /// Structural mismatch while decoding, e.g. a tagged-union envelope that
    /// is not a two-element array.
    Decoding,

    /// Read past the end of the input, or the encoded item is shorter than a
    /// fixed-extent target.
    BufferUnderflow,

    /// Write past the buffer capacity, or the encoded item is larger than a
    /// fixed-extent target or a caller-supplied size limit.
    BufferOverflow,

    /// The value does not fit the target type, or cannot be represented in
    /// 64-bit CBOR, or a float would lose precision when narrowed.
    ValueNotRepresentable,

    /// API misuse, e.g. repositioning a reader past the end of its input.
    InvalidUsage,

    /// The head's major type or simple subtype disagrees with what the codec
    /// expects.
    UnexpectedType,

    /// The head uses a reserved additional-information code (28..=30), or the
    /// "break" stop code, neither of which is valid here.
    IllFormed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Encoding => "encoding error",
            Self::Decoding => "decoding error",
            Self::BufferUnderflow => "not enough buffer space left to read an entry",
            Self::BufferOverflow => "not enough buffer space left to write an entry",
            Self::ValueNotRepresentable => "value cannot be represented in CBOR",
            Self::InvalidUsage => "invalid library usage",
            Self::UnexpectedType => "encountered an unexpected type while decoding",
            Self::IllFormed => "reserved or ill-formed head encoding",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
