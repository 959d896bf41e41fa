use proc_macro2::TokenStream;
use quote::quote;
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

fn struct_field_encodes<'a>(
    name: &Ident,
    fields: &'a Fields,
    bounds: &mut Vec<&'a Type>,
) -> syn::Result<Vec<TokenStream>> {
    let mut items = Vec::new();
    match fields {
        Fields::Named(named) => {
            for field in &named.named {
                ensure_no_cbor_attrs(&field.attrs, "record fields")?;
                if !type_mentions_self(&field.ty, name) {
                    bounds.push(&field.ty);
                }
                let ident = field.ident.as_ref().unwrap();
                items.push(quote! {
                    ::typed_cbor::Encode::encode(&self.#ident, &mut *scope)?;
                });
            }
        }
        Fields::Unnamed(unnamed) => {
            for (idx, field) in unnamed.unnamed.iter().enumerate() {
                ensure_no_cbor_attrs(&field.attrs, "record fields")?;
                if !type_mentions_self(&field.ty, name) {
                    bounds.push(&field.ty);
                }
                let index = syn::Index::from(idx);
                items.push(quote! {
                    ::typed_cbor::Encode::encode(&self.#index, &mut *scope)?;
                });
            }
        }
        Fields::Unit => {}
    }
    Ok(items)
}

fn type_id_impl(
    name: &Ident,
    generics: &Generics,
    attrs: &[Attribute],
) -> syn::Result<TokenStream> {
    let attr = parse_struct_attrs(attrs)?;
    let Some(type_id) = attr.type_id else {
        return Ok(TokenStream::new());
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::typed_cbor::TypeId for #name #ty_generics #where_clause {
            const TYPE_ID: i64 = #type_id;
        }
    })
}

pub(crate) fn encode_struct(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
    attrs: &[Attribute],
) -> syn::Result<TokenStream> {
    let mut bounds = Vec::new();
    let items = struct_field_encodes(name, &data.fields, &mut bounds)?;
    let type_id = type_id_impl(name, generics, attrs)?;

    let (impl_generics, ty_generics, _) = generics.split_for_impl();
    let where_clause = bounded_where_clause(generics, &bounds, &quote!(::typed_cbor::Encode));

    let body = if items.is_empty() {
        // A record with no fields contributes no bytes.
        quote! {
            let _ = buf;
            Ok(())
        }
    } else {
        quote! {
            let mut scope = ::typed_cbor::WriteRollback::new(buf);
            #(#items)*
            scope.commit();
            Ok(())
        }
    };

    Ok(quote! {
        impl #impl_generics ::typed_cbor::Encode for #name #ty_generics #where_clause {
            fn encode<__B: ::typed_cbor::Buffer + ?Sized>(
                &self,
                buf: &mut __B,
            ) -> Result<(), ::typed_cbor::Error> {
                #body
            }
        }

        impl #impl_generics ::typed_cbor::ArrayItem for #name #ty_generics #where_clause {}

        #type_id
    })
}

pub(crate) fn encode_fieldless_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<TokenStream> {
    let mut arms = Vec::new();
    for variant in &data.variants {
        ensure_no_cbor_attrs(&variant.attrs, "enumeration variants")?;
        let ident = &variant.ident;
        // A fresh unit value keeps the cast free of any Copy requirement.
        arms.push(quote! {
            Self::#ident => Self::#ident as i64,
        });
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::typed_cbor::Encode for #name #ty_generics #where_clause {
            fn encode<__B: ::typed_cbor::Buffer + ?Sized>(
                &self,
                buf: &mut __B,
            ) -> Result<(), ::typed_cbor::Error> {
                let value = match self {
                    #(#arms)*
                };
                ::typed_cbor::Encode::encode(&value, buf)
            }
        }

        impl #impl_generics ::typed_cbor::ArrayItem for #name #ty_generics #where_clause {}
    })
}

pub(crate) fn encode_variant_enum(
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

        arms.push(quote! {
            Self::#ident(value) => {
                let mut scope = ::typed_cbor::WriteRollback::new(buf);
                ::typed_cbor::encode_argument(&mut *scope, ::typed_cbor::Major::Array, 2u64)?;
                ::typed_cbor::Encode::encode(&<#ty as ::typed_cbor::TypeId>::TYPE_ID, &mut *scope)?;
                ::typed_cbor::Encode::encode(value, &mut *scope)?;
                scope.commit();
                Ok(())
            }
        });
    }

    let uniqueness = type_id_uniqueness_check(generics, &payloads);
    let (impl_generics, ty_generics, _) = generics.split_for_impl();
    let where_clause = bounded_where_clause(
        generics,
        &bounds,
        &quote!(::typed_cbor::Encode + ::typed_cbor::TypeId),
    );

    Ok(quote! {
        #uniqueness

        impl #impl_generics ::typed_cbor::Encode for #name #ty_generics #where_clause {
            fn encode<__B: ::typed_cbor::Buffer + ?Sized>(
                &self,
                buf: &mut __B,
            ) -> Result<(), ::typed_cbor::Error> {
                match self {
                    #(#arms)*
                }
            }
        }

        impl #impl_generics ::typed_cbor::ArrayItem for #name #ty_generics #where_clause {}
    })
}
