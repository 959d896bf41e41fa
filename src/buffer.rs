use core::ops::{Deref, DerefMut};

use crate::Error;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// An append-only byte sink used by every encoder in this crate.
///
/// Implementations guarantee that a failing write leaves the buffer
/// untouched: capacity is checked up front, so there are no partial writes.
/// Composite encoders additionally wrap their writes in a [`WriteRollback`]
/// scope so that a failure deep inside a nested encode rewinds every byte
/// emitted since the scope was opened.
pub trait Buffer {
    /// Append `bytes` to the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if the bytes do not fit. The buffer
    /// contents are unchanged in that case.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error>;

    /// Append a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferOverflow`] if the byte does not fit.
    fn write_u8(&mut self, byte: u8) -> Result<(), Error> {
        self.write(&[byte])
    }

    /// The number of bytes written so far.
    fn len(&self) -> usize;

    /// Returns `true` if no bytes have been written.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all bytes past `len`.
    ///
    /// Called by [`WriteRollback`] to rewind to a checkpoint; `len` never
    /// exceeds a previously observed [`Buffer::len`]. A `len` larger than the
    /// current size is a no-op.
    fn truncate(&mut self, len: usize);
}

/// A growable write buffer backed by a caller-owned byte vector.
///
/// An optional maximum capacity turns the buffer into a bounded sink: the
/// logical size is never allowed to exceed the cap, and a write that would do
/// so fails with [`Error::BufferOverflow`] without any partial effect.
#[cfg(feature = "alloc")]
pub struct DynamicBuffer<'v> {
    vec: &'v mut Vec<u8>,
    max_capacity: Option<usize>,
}

#[cfg(feature = "alloc")]
impl<'v> DynamicBuffer<'v> {
    /// Wrap `vec` as an unbounded write buffer.
    pub fn new(vec: &'v mut Vec<u8>) -> Self {
        Self {
            vec,
            max_capacity: None,
        }
    }

    /// Wrap `vec` as a write buffer whose logical size may not exceed
    /// `max_capacity` bytes.
    pub fn with_max_capacity(vec: &'v mut Vec<u8>, max_capacity: usize) -> Self {
        Self {
            vec,
            max_capacity: Some(max_capacity),
        }
    }

    /// Wrap `vec` as a bounded write buffer and pre-reserve `initial` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUsage`] if `initial` exceeds `max_capacity`.
    pub fn with_initial_capacity(
        vec: &'v mut Vec<u8>,
        initial: usize,
        max_capacity: usize,
    ) -> Result<Self, Error> {
        if initial > max_capacity {
            return Err(Error::InvalidUsage);
        }
        if initial != 0 {
            vec.reserve(initial);
        }
        Ok(Self {
            vec,
            max_capacity: Some(max_capacity),
        })
    }

    fn ensure_capacity(&self, num_bytes: usize) -> Result<(), Error> {
        let Some(cap) = self.max_capacity else {
            return Ok(());
        };
        let target = self
            .vec
            .len()
            .checked_add(num_bytes)
            .ok_or(Error::BufferOverflow)?;
        if target > cap {
            return Err(Error::BufferOverflow);
        }
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl Buffer for DynamicBuffer<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.ensure_capacity(bytes.len())?;
        self.vec.extend_from_slice(bytes);
        Ok(())
    }

    fn len(&self) -> usize {
        self.vec.len()
    }

    fn truncate(&mut self, len: usize) {
        self.vec.truncate(len);
    }
}

/// A fixed-capacity write buffer backed by a caller-owned byte region.
///
/// Bytes are written at a running index; once the region is full every
/// further write fails with [`Error::BufferOverflow`].
pub struct StaticBuffer<'b> {
    data: &'b mut [u8],
    len: usize,
}

impl<'b> StaticBuffer<'b> {
    /// Wrap `data` as an empty write buffer of capacity `data.len()`.
    pub fn new(data: &'b mut [u8]) -> Self {
        Self { data, len: 0 }
    }

    /// The total capacity of the underlying region.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Borrow the bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    fn ensure_capacity(&self, num_bytes: usize) -> Result<(), Error> {
        if self.data.len() - self.len < num_bytes {
            return Err(Error::BufferOverflow);
        }
        Ok(())
    }
}

impl Buffer for StaticBuffer<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.ensure_capacity(bytes.len())?;
        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    fn len(&self) -> usize {
        self.len
    }

    fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }
}

/// A scoped checkpoint on a write buffer.
///
/// On construction the current buffer size is recorded; when the scope is
/// dropped the buffer is rewound to that size unless [`commit`] was called.
/// Exactly one of commit or rewind happens per scope, on every exit path.
///
/// The scope dereferences to the underlying buffer, so nested encoders write
/// through it directly:
///
/// ```
/// use typed_cbor::{encode_argument, Buffer, DynamicBuffer, Error, Major, WriteRollback};
///
/// fn encode_pair<B: Buffer + ?Sized>(buf: &mut B, a: u64, b: u64) -> Result<(), Error> {
///     let mut scope = WriteRollback::new(buf);
///     encode_argument(&mut *scope, Major::Array, 2)?;
///     encode_argument(&mut *scope, Major::Unsigned, a)?;
///     encode_argument(&mut *scope, Major::Unsigned, b)?;
///     scope.commit();
///     Ok(())
/// }
///
/// let mut out = Vec::new();
/// encode_pair(&mut DynamicBuffer::new(&mut out), 1, 2).unwrap();
/// assert_eq!(out, [0x82, 0x01, 0x02]);
/// ```
///
/// [`commit`]: WriteRollback::commit
pub struct WriteRollback<'b, B: Buffer + ?Sized> {
    buf: &'b mut B,
    mark: usize,
    committed: bool,
}

impl<'b, B: Buffer + ?Sized> WriteRollback<'b, B> {
    /// Record the current size of `buf` as the rollback checkpoint.
    pub fn new(buf: &'b mut B) -> Self {
        let mark = buf.len();
        Self {
            buf,
            mark,
            committed: false,
        }
    }

    /// Keep everything written since the scope was opened.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl<B: Buffer + ?Sized> Deref for WriteRollback<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.buf
    }
}

impl<B: Buffer + ?Sized> DerefMut for WriteRollback<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.buf
    }
}

impl<B: Buffer + ?Sized> Drop for WriteRollback<'_, B> {
    fn drop(&mut self) {
        if !self.committed {
            self.buf.truncate(self.mark);
        }
    }
}
