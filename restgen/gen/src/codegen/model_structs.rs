//! Parameter model structs.
//!
//! Query parameters, headers and form bodies are passed to generated
//! methods as plain structs with one `Option` field per declared entry.
//! Absent fields are skipped at request time, so every field is optional
//! regardless of its declared required-ness.

use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use restgen_define::{FieldType, TypeFieldDefinition};

use crate::naming::unique_field_names;

/// Rust type of a declared field.
pub fn field_type_tokens(field_type: FieldType) -> TokenStream {
    match field_type {
        FieldType::String | FieldType::Date => quote! { String },
        FieldType::Integer => quote! { i64 },
        FieldType::Number => quote! { f64 },
        FieldType::Boolean => quote! { bool },
        FieldType::File => quote! { std::path::PathBuf },
        FieldType::Any => quote! { serde_json::Value },
    }
}

/// Generates a parameter struct.
///
/// ## Examples
///
/// For query parameters `limit` (integer) and `sortBy` (string):
///
/// ```ignore
/// /// Query parameters of `GET /users`.
/// #[derive(Debug, Clone, Default)]
/// pub struct UsersGetQueryParam {
///     /// `limit`
///     pub limit: Option<i64>,
///     /// `sortBy`
///     pub sort_by: Option<String>,
/// }
/// ```
pub fn generate_param_struct(
    struct_name: &str,
    doc: &str,
    fields: &IndexMap<String, TypeFieldDefinition>,
) -> TokenStream {
    let name = format_ident!("{}", struct_name);
    let doc = format!(" {doc}");

    let names = unique_field_names(fields.keys().map(String::as_str));
    let fields = fields.iter().zip(names).map(|((wire_name, field), field_name)| {
        let ident = format_ident!("{}", field_name);
        let ty = field_type_tokens(field.field_type);
        let mut field_doc = format!(" `{wire_name}`");
        if field.required {
            field_doc.push_str(" (required)");
        }
        if let Some(description) = &field.description {
            field_doc.push_str(": ");
            field_doc.push_str(description);
        }
        quote! {
            #[doc = #field_doc]
            pub #ident: Option<#ty>
        }
    });

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Default)]
        pub struct #name {
            #(#fields),*
        }
    }
}
