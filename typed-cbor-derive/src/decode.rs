use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, DataEnum, DataStruct, Fields, Generics, Ident, Type};

use crate::attrs::{ensure_no_cbor_attrs, parse_struct_attrs};
use crate::util::{add_where_bound, type_id_uniqueness_check, type_mentions_self};

fn bounded_where_clause(
    generics: &Generics,
    bounds: &[&Type],
    bound: &TokenStream,
) -> Option<syn::WhereClause> {
    let mut wc = generics.where_clause.clone();
    if !bounds.is_empty() {
        let wc = wc.get_or_insert_with(|| syn::WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });
        for ty in bounds {
            add_where_bound(wc, ty, bound.clone());
        }
    }
    wc
}

pub(crate) fn decode_struct(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
    attrs: &[Attribute],
) -> syn::Result<TokenStream> {
    // `type_id` is consumed by the Encode derive; re-parse here so the
    // attribute also validates when only Decode is derived.
    let _ = parse_struct_attrs(attrs)?;

    let mut bounds = Vec::new();
    let mut lets = Vec::new();

    let construct = match &data.fields {
        Fields::Named(named) => {
            let mut idents = Vec::new();
            for field in &named.named {
                ensure_no_cbor_attrs(&field.attrs, "record fields")?;
                if !type_mentions_self(&field.ty, name) {
                    bounds.push(&field.ty);
                }
                let ident = field.ident.as_ref().unwrap();
                idents.push(ident);
                // Bound via the double-underscored scope so a field named
                // `scope` cannot shadow the guard.
                lets.push(quote! {
                    let #ident = ::typed_cbor::Decode::decode(&mut *__scope)?;
                });
            }
            quote! { Self { #(#idents),* } }
        }
        Fields::Unnamed(unnamed) => {
            let mut vars = Vec::new();
            for (idx, field) in unnamed.unnamed.iter().enumerate() {
                ensure_no_cbor_attrs(&field.attrs, "record fields")?;
                if !type_mentions_self(&field.ty, name) {
                    bounds.push(&field.ty);
                }
                let var = format_ident!("v{idx}");
                lets.push(quote! {
                    let #var = ::typed_cbor::Decode::decode(&mut *__scope)?;
                });
                vars.push(var);
            }
            quote! { Self( #(#vars),* ) }
        }
        Fields::Unit => quote! { Self },
    };

    let (impl_generics, ty_generics, _) = generics.split_for_impl();
    let where_clause = bounded_where_clause(generics, &bounds, &quote!(::typed_cbor::Decode));

    let body = if lets.is_empty() {
        quote! {
            let _ = reader;
            Ok(#construct)
        }
    } else {
        quote! {
            let mut __scope = ::typed_cbor::ReadRollback::new(reader);
            #(#lets)*
            __scope.commit();
            Ok(#construct)
        }
    };

    Ok(quote! {
        impl #impl_generics ::typed_cbor::Decode for #name #ty_generics #where_clause {
            fn decode(reader: &mut ::typed_cbor::Reader<'_>) -> Result<Self, ::typed_cbor::Error> {
                #body
            }
        }
    })
}

pub(crate) fn decode_fieldless_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    let mut arms = Vec::new();
    for variant in &data.variants {
        ensure_no_cbor_attrs(&variant.attrs, "enumeration variants")?;
        let ident = &variant.ident;
        arms.push(quote! {
            if value == Self::#ident as i64 {
                scope.commit();
                return Ok(Self::#ident);
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::typed_cbor::Decode for #name #ty_generics #where_clause {
            fn decode(reader: &mut ::typed_cbor::Reader<'_>) -> Result<Self, ::typed_cbor::Error> {
                let mut scope = ::typed_cbor::ReadRollback::new(reader);
                let value = <i64 as ::typed_cbor::Decode>::decode(&mut *scope)?;
                #(#arms)*
                // An integer that matches no declared discriminant.
                Err(::typed_cbor::Error::ValueNotRepresentable)
            }
        }
    })
}

pub(crate) fn decode_variant_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    let mut arms = Vec::new();
    let mut bounds = Vec::new();
    let mut payloads = Vec::new();

    for variant in &data.variants {
        ensure_no_cbor_attrs(&variant.attrs, "tagged-union variants")?;
        let ident = &variant.ident;
        let Fields::Unnamed(fields) = &variant.fields else {
            unreachable!("classify_enum admits only single-payload variants");
        };
        let field = fields.unnamed.first().unwrap();
        ensure_no_cbor_attrs(&field.attrs, "tagged-union payloads")?;
        let ty = &field.ty;
        payloads.push(ty);
        if !type_mentions_self(ty, name) {
            bounds.push(ty);
        }

        // The first alternative whose static type ID matches wins.
        arms.push(quote! {
            if id == <#ty as ::typed_cbor::TypeId>::TYPE_ID {
                let value = Self::#ident(::typed_cbor::Decode::decode(&mut *scope)?);
                scope.commit();
                return Ok(value);
            }
        });
    }

    let uniqueness = type_id_uniqueness_check(generics, &payloads);
    let (impl_generics, ty_generics, _) = generics.split_for_impl();
    let where_clause = bounded_where_clause(
        generics,
        &bounds,
        &quote!(::typed_cbor::Decode + ::typed_cbor::TypeId),
    );

    Ok(quote! {
        #uniqueness

        impl #impl_generics ::typed_cbor::Decode for #name #ty_generics #where_clause {
            fn decode(reader: &mut ::typed_cbor::Reader<'_>) -> Result<Self, ::typed_cbor::Error> {
                let mut scope = ::typed_cbor::ReadRollback::new(reader);
                let id = ::typed_cbor::decode_variant_id(&mut *scope)?;
                #(#arms)*
                Err(::typed_cbor::Error::UnexpectedType)
            }
        }
    })
}
