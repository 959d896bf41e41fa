use syn::{spanned::Spanned, Attribute, LitInt};

#[derive(Default, Clone)]
pub(crate) struct StructAttr {
    pub(crate) type_id: Option<LitInt>,
}

pub(crate) fn ensure_no_cbor_attrs(attrs: &[Attribute], ctx: &str) -> syn::Result<()> {
    for a in attrs {
        if a.path().is_ident("cbor") {
            return Err(syn::Error::new(
                a.span(),
                format!("`#[cbor(...)]` is not supported on {ctx}"),
            ));
        }
    }
    Ok(())
}

pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttr> {
    let mut out = StructAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("cbor") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("type_id") {
                if out.type_id.is_some() {
                    return Err(meta.error("duplicate `cbor(type_id=...)`"));
                }
                let lit: LitInt = meta.value()?.parse()?;
                let value: i64 = lit.base10_parse()?;
                if value <= 0 {
                    return Err(meta.error("`cbor(type_id=...)` must be a positive integer"));
                }
                out.type_id = Some(lit);
                return Ok(());
            }
            Err(meta.error("unsupported `cbor(...)` struct attribute (allowed: type_id)"))
        })?;
    }
    Ok(out)
}
