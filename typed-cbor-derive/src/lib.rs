//! Procedural macro derives for `typed-cbor`.

#![deny(clippy::all)]
#![deny(missing_docs)]

extern crate proc_macro;

mod attrs;
mod decode;
mod encode;
mod shape;
mod util;

use proc_macro::TokenStream;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput};

use crate::shape::{classify_enum, EnumShape};

/// Derive CBOR encoding for records, enumerations and tagged unions.
///
/// - A struct encodes as the bare concatenation of its fields, in
///   declaration order, with no array header. `#[cbor(type_id = N)]`
///   additionally implements `TypeId` so the record can appear as a
///   tagged-union alternative or inside `Boxed`.
/// - A fieldless enum encodes through its discriminant as a signed integer.
/// - An enum whose variants each hold exactly one value encodes as the
///   tagged-union envelope `[type_id, payload]`; every payload type must
///   implement `TypeId`, and the IDs must be pairwise distinct (checked at
///   compile time).
#[proc_macro_derive(Encode, attributes(cbor))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = (|| -> syn::Result<proc_macro2::TokenStream> {
        match &input.data {
            Data::Struct(data) => {
                encode::encode_struct(&input.ident, &input.generics, data, &input.attrs)
            }
            Data::Enum(data) => match classify_enum(data)? {
                EnumShape::Fieldless => {
                    encode::encode_fieldless_enum(&input.ident, &input.generics, data)
                }
                EnumShape::Variant => {
                    encode::encode_variant_enum(&input.ident, &input.generics, data)
                }
            },
            Data::Union(u) => Err(syn::Error::new(
                u.union_token.span(),
                "Encode not supported for unions",
            )),
        }
    })();

    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

/// Derive CBOR decoding for records, enumerations and tagged unions.
///
/// Mirrors [`macro@Encode`]: struct fields decode in declaration order
/// inside one rollback scope; fieldless enums decode from a signed integer
/// and reject unknown discriminants; tagged unions read the
/// `[type_id, payload]` envelope and select the first alternative whose
/// `TypeId` matches.
#[proc_macro_derive(Decode, attributes(cbor))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = (|| -> syn::Result<proc_macro2::TokenStream> {
        match &input.data {
            Data::Struct(data) => {
                decode::decode_struct(&input.ident, &input.generics, data, &input.attrs)
            }
            Data::Enum(data) => match classify_enum(data)? {
                EnumShape::Fieldless => decode::decode_fieldless_enum(&input.ident, &input.generics, data),
                EnumShape::Variant => decode::decode_variant_enum(&input.ident, &input.generics, data),
            },
            Data::Union(u) => Err(syn::Error::new(
                u.union_token.span(),
                "Decode not supported for unions",
            )),
        }
    })();

    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}
