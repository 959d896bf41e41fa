use syn::{spanned::Spanned, DataEnum, Fields};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EnumShape {
    /// Every variant is a unit variant: codes through the discriminant.
    Fieldless,
    /// Every variant holds exactly one payload: the tagged-union codec.
    Variant,
}

pub(crate) fn classify_enum(data: &DataEnum) -> syn::Result<EnumShape> {
    if data.variants.is_empty() {
        return Err(syn::Error::new(
            data.enum_token.span(),
            "cannot derive CBOR codecs for empty enums",
        ));
    }

    let mut unit = 0usize;
    let mut single = 0usize;

    for variant in &data.variants {
        match &variant.fields {
            Fields::Unit => unit += 1,
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => single += 1,
            Fields::Unnamed(fields) => {
                return Err(syn::Error::new(
                    fields.span(),
                    "tagged-union variants must hold exactly one payload; wrap the values in a record",
                ));
            }
            Fields::Named(fields) => {
                return Err(syn::Error::new(
                    fields.span(),
                    "tagged-union variants cannot have named fields; wrap them in a record",
                ));
            }
        }
    }

    let total = data.variants.len();
    if unit == total {
        Ok(EnumShape::Fieldless)
    } else if single == total {
        Ok(EnumShape::Variant)
    } else {
        Err(syn::Error::new(
            data.enum_token.span(),
            "enums must be all-unit (integer enumeration) or all-single-payload (tagged union)",
        ))
    }
}
