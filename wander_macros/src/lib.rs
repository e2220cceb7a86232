//! Procedural macros for `wander-rs`.
//!
//! `#[response_schema]` wires a `schemars`-derived struct into the crate's
//! `ResponseSchema` trait so its JSON Schema is built once and shared.

mod args;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Fields, ItemStruct, LitStr};

use crate::args::{doc_summary, parse_response_schema_args};

#[proc_macro_attribute]
pub fn response_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse_response_schema_args(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let item_struct = parse_macro_input!(item as ItemStruct);

    if !matches!(item_struct.fields, Fields::Named(_)) {
        return syn::Error::new(
            item_struct.struct_token.span(),
            "`#[response_schema]` only supports structs with named fields",
        )
        .to_compile_error()
        .into();
    }

    if !item_struct.generics.params.is_empty() {
        return syn::Error::new(
            item_struct.generics.span(),
            "`#[response_schema]` cannot be applied to generic structs",
        )
        .to_compile_error()
        .into();
    }

    let ident = &item_struct.ident;
    let type_name = LitStr::new(&ident.to_string(), Span::call_site());
    let schema_name = args.name.unwrap_or_else(|| type_name.clone());

    let description = args.description.or_else(|| {
        doc_summary(&item_struct.attrs).map(|doc| LitStr::new(&doc, Span::call_site()))
    });
    let description_tokens = match description {
        Some(lit) => quote! { Some(#lit) },
        None => quote! { None },
    };

    let expanded = quote! {
        #item_struct

        impl wander_rs::schema::ResponseSchema for #ident {
            fn schema() -> &'static wander_rs::schema::SchemaHandle {
                static HANDLE: std::sync::OnceLock<wander_rs::schema::SchemaHandle> =
                    std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    wander_rs::schema::apply_schema_metadata(
                        &mut root,
                        #schema_name,
                        #description_tokens,
                    );
                    wander_rs::schema::SchemaHandle::from_root_schema::<Self>(
                        #schema_name,
                        #type_name,
                        root,
                    )
                })
            }
        }
    };

    expanded.into()
}
