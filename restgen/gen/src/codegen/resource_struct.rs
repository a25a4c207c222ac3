//! Resource and root client structs.
//!
//! Every resource becomes a struct holding its resolved base URL and the
//! HTTP client it shares with its parent. Child resources are reached
//! through accessor methods; URI parameters are percent-encoded into the
//! child's base URL when the accessor is called.
//!
//! ```ignore
//! let client = FooClient::new(FooClient::BASE_URI);
//! let file = client.files().file_name("report.pdf");
//! file.put(bytes, "application/pdf", &FileNamePutHeader::default())?;
//! ```

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::codegen::client_factory::generate_client_factory;
use crate::ir::GeneratedMethod;
use crate::naming::unique_field_names;
use crate::render::render_method;

/// How a parent reaches one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildAccessor {
    /// Accessor method name on the parent.
    pub method_name: String,
    /// Name of the child's struct.
    pub struct_name: String,
    /// URI parameter names of the child's relative URI, in order.
    pub uri_params: Vec<String>,
}

/// Splits a relative URI into a `format!` template and its parameters.
///
/// `/files/{fileName}` becomes `("{}/files/{}", ["fileName"])`; the first
/// placeholder is the parent URL.
pub fn uri_template(relative_uri: &str) -> (String, Vec<String>) {
    let mut template = String::from("{}");
    let mut params = Vec::new();
    let mut rest = relative_uri;

    if !rest.is_empty() && !rest.starts_with('/') {
        template.push('/');
    }

    while let Some(open) = rest.find('{') {
        template.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(close) => {
                let name = &rest[open + 1..open + close];
                if !name.is_empty() {
                    template.push_str("{}");
                    params.push(name.to_string());
                }
                rest = &rest[open + close + 1..];
            }
            None => {
                rest = &rest[open + 1..];
            }
        }
    }
    template.push_str(&rest.replace('}', ""));

    (template, params)
}

/// Parameter idents for URI parameters, distinct from each other and from
/// the `parent_url` and `client` arguments of `new`.
fn uri_param_idents(uri_params: &[String]) -> Vec<Ident> {
    let names = ["parent_url", "client"]
        .into_iter()
        .chain(uri_params.iter().map(String::as_str));
    unique_field_names(names)
        .into_iter()
        .skip(2)
        .map(|name| format_ident!("{}", name))
        .collect()
}

fn accessor_tokens(accessor: &ChildAccessor) -> TokenStream {
    let method = format_ident!("{}", accessor.method_name);
    let child = format_ident!("{}", accessor.struct_name);
    let params = uri_param_idents(&accessor.uri_params);
    let doc = format!(" Accesses the `{}` resource.", accessor.struct_name);

    quote! {
        #[doc = #doc]
        pub fn #method(&self, #(#params: &str),*) -> #child {
            #child::new(&self.base_url, self.client.clone(), #(#params),*)
        }
    }
}

/// Generates a resource struct with its constructor, child accessors,
/// client factory methods and compiled action methods.
pub fn generate_resource_struct(
    struct_name: &str,
    relative_uri: &str,
    full_uri: &str,
    children: &[ChildAccessor],
    methods: &[GeneratedMethod],
) -> TokenStream {
    let name = format_ident!("{}", struct_name);
    let doc = format!(" Resource `{full_uri}`.");
    let (template, uri_params) = uri_template(relative_uri);
    let params = uri_param_idents(&uri_params);

    let accessors = children.iter().map(accessor_tokens);
    let factory = generate_client_factory();
    let methods = methods.iter().map(render_method);

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone)]
        pub struct #name {
            base_url: String,
            client: reqwest::blocking::Client,
        }

        impl #name {
            /// Creates the resource below `parent_url`.
            pub fn new(parent_url: &str, client: reqwest::blocking::Client, #(#params: &str),*) -> Self {
                Self {
                    base_url: format!(#template, parent_url.trim_end_matches('/'), #(urlencoding::encode(#params)),*),
                    client,
                }
            }

            #(#accessors)*

            #factory

            #(#methods)*
        }
    }
}

/// Generates the root client of an API.
pub fn generate_root_client(
    client_name: &str,
    api_title: &str,
    base_uri: &str,
    children: &[ChildAccessor],
) -> TokenStream {
    let name = format_ident!("{}", client_name);
    let doc = format!(" Client for the {api_title} API.");
    let accessors = children.iter().map(accessor_tokens);

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone)]
        pub struct #name {
            base_url: String,
            client: reqwest::blocking::Client,
        }

        impl #name {
            /// Base URI declared by the API.
            pub const BASE_URI: &'static str = #base_uri;

            /// Creates a client for `base_url` with a new HTTP client.
            pub fn new(base_url: impl Into<String>) -> Self {
                Self::with_client(base_url, reqwest::blocking::Client::new())
            }

            /// Creates a client for `base_url` sharing an existing HTTP client.
            pub fn with_client(base_url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
                Self {
                    base_url: base_url.into(),
                    client,
                }
            }

            pub fn base_uri(&self) -> &str {
                &self.base_url
            }

            #(#accessors)*
        }

        impl Default for #name {
            fn default() -> Self {
                Self::new(Self::BASE_URI)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::format_items;

    #[test]
    fn uri_template_extracts_params() {
        assert_eq!(uri_template("/users"), ("{}/users".to_string(), vec![]));
        assert_eq!(
            uri_template("/files/{fileName}"),
            ("{}/files/{}".to_string(), vec!["fileName".to_string()])
        );
        assert_eq!(
            uri_template("/{org}/repos/{repo}"),
            ("{}/{}/repos/{}".to_string(), vec!["org".to_string(), "repo".to_string()])
        );
    }

    #[test]
    fn uri_template_drops_stray_braces() {
        assert_eq!(uri_template("/a{b"), ("{}/ab".to_string(), vec![]));
        assert_eq!(uri_template("/a}b"), ("{}/ab".to_string(), vec![]));
        assert_eq!(uri_template("/{}"), ("{}/".to_string(), vec![]));
        assert_eq!(uri_template("users"), ("{}/users".to_string(), vec![]));
    }

    #[test]
    fn resource_struct_encodes_uri_params() {
        let code = format_items(&generate_resource_struct(
            "FileNameResource",
            "/{fileName}",
            "/files/{fileName}",
            &[],
            &[],
        ));
        assert!(code.contains("pub struct FileNameResource"));
        assert!(code.contains("file_name: &str"));
        assert!(code.contains("urlencoding::encode(file_name)"));
        assert!(code.contains("pub fn new_target(&self) -> WebTarget"));
    }

    #[test]
    fn uri_params_never_shadow_constructor_arguments() {
        let code = format_items(&generate_resource_struct(
            "ClientResource",
            "/{client}/{parent-url}/{a-b}/{a_b}",
            "/{client}/{parent-url}/{a-b}/{a_b}",
            &[],
            &[],
        ));
        assert!(code.contains("client_2: &str"));
        assert!(code.contains("parent_url_2: &str"));
        assert!(code.contains("a_b: &str"));
        assert!(code.contains("a_b_2: &str"));
    }

    #[test]
    fn accessors_forward_client_and_params() {
        let children = vec![ChildAccessor {
            method_name: "file_name".into(),
            struct_name: "FileNameResource".into(),
            uri_params: vec!["fileName".into()],
        }];
        let code = format_items(&generate_resource_struct(
            "FilesResource",
            "/files",
            "/files",
            &children,
            &[],
        ));
        assert!(code.contains("pub fn file_name(&self, file_name: &str) -> FileNameResource"));
        assert!(code.contains("FileNameResource::new(&self.base_url, self.client.clone(), file_name)"));
    }

    #[test]
    fn root_client_has_constructors() {
        let children = vec![ChildAccessor {
            method_name: "users".into(),
            struct_name: "UsersResource".into(),
            uri_params: vec![],
        }];
        let code = format_items(&generate_root_client(
            "FooClient",
            "Foo",
            "https://api.example.com",
            &children,
        ));
        assert!(code.contains("pub const BASE_URI: &'static str = \"https://api.example.com\";"));
        assert!(code.contains("pub fn new(base_url: impl Into<String>) -> Self"));
        assert!(code.contains("pub fn with_client("));
        assert!(code.contains("pub fn users(&self) -> UsersResource"));
        assert!(code.contains("impl Default for FooClient"));
    }
}
