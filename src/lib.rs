//! # typed-cbor
//!
//! Statically-typed, deterministic CBOR (RFC 8949) encoding and decoding
//! against caller-provided in-memory buffers.
//!
//! ## Design principles
//!
//! - **One encoding per value.**
//!   Heads always use the smallest-argument form, floats the smallest width
//!   that round-trips exactly, and every NaN/infinity the canonical
//!   half-precision bytes. Re-encoding a decoded value reproduces the input
//!   byte for byte.
//! - **Dispatch is resolved at compile time.**
//!   [`Encode`] and [`Decode`] are selected per host type; a codec call for
//!   an unsupported type is a compile error, as is a tagged union with
//!   colliding type IDs.
//! - **Failure is transactional.**
//!   Every composite codec runs inside a [`WriteRollback`] / [`ReadRollback`]
//!   scope; a failing encode or decode leaves its buffer byte-identical to
//!   the state before the call.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`Error`] and
//!   enables the `HashMap` codecs.
//! - `alloc` *(default)*: enables [`DynamicBuffer`] and the owned-container
//!   codecs (`String`, `Vec`, `BTreeMap`).
//! - `derive` *(default)*: re-exports the [`Encode`]/[`Decode`] derive
//!   macros for records, enumerations and tagged unions.
//!
//! ## Out of scope
//!
//! Indefinite-length items, tagged items (major type 6) and the "break"
//! stop code are not supported: reserved head forms are rejected as
//! [`Error::IllFormed`], and a tag in front of a typed value decodes as
//! [`Error::UnexpectedType`].
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible. Fixed buffers and slice-backed decoding
//! work without `alloc`; owned containers require the `alloc` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod buffer;
mod codec;
mod decode;
mod encode;
mod error;
mod float;
mod head;
mod reader;

pub use crate::buffer::{Buffer, StaticBuffer, WriteRollback};
pub use crate::codec::{decode_from_slice, decode_variant_id, ArrayItem, Boxed, Decode, Encode, TypeId};
pub use crate::decode::{decode_into_bytes, decode_into_slice};
pub use crate::error::Error;
pub use crate::head::{encode_argument, Head, Major, Simple, MAX_INLINE_ARGUMENT};
pub use crate::reader::{ReadRollback, Reader};

#[cfg(feature = "alloc")]
pub use crate::buffer::DynamicBuffer;
#[cfg(feature = "alloc")]
pub use crate::codec::encode_to_vec;
#[cfg(feature = "alloc")]
pub use crate::decode::{decode_array, decode_bytes, decode_map, decode_text};
#[cfg(feature = "std")]
pub use crate::decode::decode_hash_map;

#[cfg(feature = "derive")]
pub use typed_cbor_derive::{Decode, Encode};
