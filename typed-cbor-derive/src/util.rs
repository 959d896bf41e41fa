use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, GenericArgument, Ident, Path, PathArguments, Type, WhereClause, WherePredicate};

pub(crate) fn add_where_bound(wc: &mut WhereClause, ty: &Type, bound: TokenStream) {
    let pred: WherePredicate = parse_quote!(#ty: #bound);
    wc.predicates.push(pred);
}

fn path_might_be_self(path: &Path, self_ident: &Ident) -> bool {
    let Some(last) = path.segments.last() else {
        return false;
    };
    if last.ident != *self_ident {
        return false;
    }
    if path.segments.len() == 1 {
        return true;
    }
    path.segments
        .iter()
        .take(path.segments.len() - 1)
        .all(|seg| matches!(seg.ident.to_string().as_str(), "crate" | "self" | "super"))
}

pub(crate) fn type_mentions_self(ty: &Type, self_ident: &Ident) -> bool {
    match ty {
        Type::Path(tp) => {
            if tp.qself.is_none() && path_might_be_self(&tp.path, self_ident) {
                return true;
            }
            if let Some(q) = &tp.qself {
                if type_mentions_self(&q.ty, self_ident) {
                    return true;
                }
            }
            tp.path.segments.iter().any(|seg| match &seg.arguments {
                PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| match arg {
                    GenericArgument::Type(inner) => type_mentions_self(inner, self_ident),
                    _ => false,
                }),
                _ => false,
            })
        }
        Type::Reference(tr) => type_mentions_self(&tr.elem, self_ident),
        Type::Tuple(tt) => tt.elems.iter().any(|t| type_mentions_self(t, self_ident)),
        Type::Array(ta) => type_mentions_self(&ta.elem, self_ident),
        Type::Slice(ts) => type_mentions_self(&ts.elem, self_ident),
        Type::Group(tg) => type_mentions_self(&tg.elem, self_ident),
        Type::Paren(tp) => type_mentions_self(&tp.elem, self_ident),
        _ => false,
    }
}

/// The compile-time distinctness check for tagged-union type IDs. Both
/// derives emit it, so a collision is reported even when only one direction
/// is derived. Skipped for generic unions, whose payload types are not
/// nameable in a free `const` block.
pub(crate) fn type_id_uniqueness_check(
    generics: &syn::Generics,
    payloads: &[&Type],
) -> TokenStream {
    if payloads.len() < 2 || !generics.params.is_empty() {
        return TokenStream::new();
    }
    let len = payloads.len();
    quote! {
        const _: () = {
            let ids: [i64; #len] = [#(<#payloads as ::typed_cbor::TypeId>::TYPE_ID),*];
            let mut i = 0;
            while i < ids.len() {
                let mut j = i + 1;
                while j < ids.len() {
                    assert!(ids[i] != ids[j], "tagged-union alternatives must have distinct type IDs");
                    j += 1;
                }
                i += 1;
            }
        };
    }
}
