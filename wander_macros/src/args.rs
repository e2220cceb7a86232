use syn::{
    parse::Parser, punctuated::Punctuated, Attribute, Expr, ExprLit, Lit, LitStr, MetaNameValue,
    Token,
};

#[derive(Default)]
pub struct ResponseSchemaArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

/// Parses `#[response_schema(name = "...", description = "...")]`.
pub fn parse_response_schema_args(
    attr: proc_macro::TokenStream,
) -> syn::Result<ResponseSchemaArgs> {
    let mut args = ResponseSchemaArgs::default();
    if attr.is_empty() {
        return Ok(args);
    }

    let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse(attr)?;

    for pair in pairs {
        let key = pair
            .path
            .get_ident()
            .ok_or_else(|| {
                syn::Error::new_spanned(&pair.path, "expected `name` or `description`")
            })?;

        let Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) = &pair.value
        else {
            return Err(syn::Error::new_spanned(
                &pair.value,
                "expected a string literal",
            ));
        };

        let slot = match key.to_string().as_str() {
            "name" => &mut args.name,
            "description" => &mut args.description,
            other => {
                return Err(syn::Error::new(
                    key.span(),
                    format!("unknown `response_schema` argument `{other}`"),
                ))
            }
        };

        if slot.replace(value.clone()).is_some() {
            return Err(syn::Error::new(key.span(), format!("`{key}` given twice")));
        }
    }

    Ok(args)
}

/// Joins the `///` lines of an item into one description string.
pub fn doc_summary(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(MetaNameValue {
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(doc), ..
                    }),
                ..
            }) => Some(doc.value().trim().to_string()),
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}
