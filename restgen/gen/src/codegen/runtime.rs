//! The shared runtime module of generated crates.
//!
//! Compiled methods are written against a small request/response surface
//! (`WebTarget`, `InvocationBuilder`, `Entity`, `RawResponse`) instead of
//! calling `reqwest` directly. This module generates that surface once per
//! output crate, together with the error types every API shares.

use proc_macro2::TokenStream;
use quote::quote;

/// Names every API module imports from `crate::shared`.
pub const SHARED_IMPORTS: &[&str] = &[
    "ClientError",
    "Entity",
    "FormParams",
    "GenericType",
    "HeaderMultimap",
    "MediaType",
    "MultipartForm",
    "ParamValue",
    "RawResponse",
    "StatusError",
    "WebTarget",
];

/// Media type constants.
pub fn generate_media_types() -> TokenStream {
    quote! {
        /// Media type literals used by generated clients.
        pub struct MediaType;

        impl MediaType {
            pub const APPLICATION_JSON: &'static str = "application/json";
            pub const APPLICATION_OCTET_STREAM: &'static str = "application/octet-stream";
            pub const APPLICATION_FORM_URLENCODED: &'static str = "application/x-www-form-urlencoded";
            pub const MULTIPART_FORM_DATA: &'static str = "multipart/form-data";
            pub const TEXT_PLAIN: &'static str = "text/plain";
        }
    }
}

/// Textual form of query, header and form values.
pub fn generate_param_value() -> TokenStream {
    let display_types = [
        quote! { str },
        quote! { String },
        quote! { i32 },
        quote! { i64 },
        quote! { u32 },
        quote! { u64 },
        quote! { f32 },
        quote! { f64 },
        quote! { bool },
    ];

    quote! {
        /// A value sent as text in a query string, header or form.
        pub trait ParamValue {
            fn param_value(&self) -> String;
        }

        impl<T: ParamValue + ?Sized> ParamValue for &T {
            fn param_value(&self) -> String {
                (**self).param_value()
            }
        }

        #(
            impl ParamValue for #display_types {
                fn param_value(&self) -> String {
                    self.to_string()
                }
            }
        )*

        /// Strings are sent as-is; other values as compact JSON.
        impl ParamValue for serde_json::Value {
            fn param_value(&self) -> String {
                match self {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                }
            }
        }

        impl ParamValue for std::path::Path {
            fn param_value(&self) -> String {
                self.display().to_string()
            }
        }

        impl ParamValue for std::path::PathBuf {
            fn param_value(&self) -> String {
                self.display().to_string()
            }
        }
    }
}

/// Request payloads.
pub fn generate_entity() -> TokenStream {
    quote! {
        /// Response headers; lowercase names mapped to their values in order.
        pub type HeaderMultimap = std::collections::BTreeMap<String, Vec<String>>;

        /// A multipart form under construction.
        pub use reqwest::blocking::multipart::Form as MultipartForm;

        /// Ordered name/value pairs of a URL-encoded form.
        ///
        /// Names may repeat; pairs are sent in insertion order.
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct FormParams {
            pairs: Vec<(String, String)>,
        }

        impl FormParams {
            pub fn new() -> Self {
                Self::default()
            }

            /// Appends a pair using the value's textual form.
            pub fn add(&mut self, name: &str, value: impl ParamValue) {
                self.pairs.push((name.to_string(), value.param_value()));
            }

            pub fn pairs(&self) -> &[(String, String)] {
                &self.pairs
            }

            pub fn len(&self) -> usize {
                self.pairs.len()
            }

            pub fn is_empty(&self) -> bool {
                self.pairs.is_empty()
            }
        }

        /// An encoded request payload.
        #[derive(Debug)]
        pub enum Entity {
            /// Raw bytes sent with an explicit content type.
            Bytes { body: Vec<u8>, media_type: String },
            /// A multipart form; the content type carries its boundary.
            Multipart(MultipartForm),
            /// A URL-encoded form.
            Form(FormParams),
        }

        impl Entity {
            /// Serializes `value` as JSON.
            pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
                Ok(Self::Bytes {
                    body: serde_json::to_vec(value)?,
                    media_type: MediaType::APPLICATION_JSON.to_string(),
                })
            }

            /// Sends `value` as `text/plain`.
            pub fn text(value: impl Into<String>) -> Self {
                Self::Bytes {
                    body: value.into().into_bytes(),
                    media_type: MediaType::TEXT_PLAIN.to_string(),
                }
            }

            /// Sends raw bytes tagged with `media_type`.
            pub fn entity(body: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
                Self::Bytes {
                    body: body.into(),
                    media_type: media_type.into(),
                }
            }

            pub fn multipart(form: MultipartForm) -> Self {
                Self::Multipart(form)
            }

            pub fn form(params: FormParams) -> Self {
                Self::Form(params)
            }

            /// Content type of the payload. Multipart boundaries are chosen at
            /// send time, so only the base type is reported.
            pub fn media_type(&self) -> &str {
                match self {
                    Self::Bytes { media_type, .. } => media_type,
                    Self::Multipart(_) => MediaType::MULTIPART_FORM_DATA,
                    Self::Form(_) => MediaType::APPLICATION_FORM_URLENCODED,
                }
            }
        }
    }
}

/// Request building and invocation.
pub fn generate_request_types() -> TokenStream {
    quote! {
        /// A request URI with its query parameters.
        #[derive(Debug, Clone)]
        pub struct WebTarget {
            client: reqwest::blocking::Client,
            uri: String,
            query: Vec<(String, String)>,
        }

        impl WebTarget {
            pub fn new(client: reqwest::blocking::Client, uri: impl Into<String>) -> Self {
                Self {
                    client,
                    uri: uri.into(),
                    query: Vec::new(),
                }
            }

            pub fn uri(&self) -> &str {
                &self.uri
            }

            /// Appends a query parameter using the value's textual form.
            pub fn query_param(mut self, name: &str, value: impl ParamValue) -> Self {
                self.query.push((name.to_string(), value.param_value()));
                self
            }

            /// Starts a request accepting `accept`.
            pub fn request(self, accept: &str) -> InvocationBuilder {
                InvocationBuilder {
                    client: self.client,
                    uri: self.uri,
                    query: self.query,
                    headers: vec![(reqwest::header::ACCEPT.as_str().to_string(), accept.to_string())],
                }
            }
        }

        /// A request ready to be sent.
        #[derive(Debug, Clone)]
        pub struct InvocationBuilder {
            client: reqwest::blocking::Client,
            uri: String,
            query: Vec<(String, String)>,
            headers: Vec<(String, String)>,
        }

        impl InvocationBuilder {
            /// Adds a header using the value's textual form.
            pub fn header(&mut self, name: &str, value: impl ParamValue) -> &mut Self {
                self.headers.push((name.to_string(), value.param_value()));
                self
            }

            pub fn get(self) -> Result<RawResponse, reqwest::Error> {
                self.method(reqwest::Method::GET, None)
            }

            pub fn delete(self) -> Result<RawResponse, reqwest::Error> {
                self.method(reqwest::Method::DELETE, None)
            }

            pub fn options(self) -> Result<RawResponse, reqwest::Error> {
                self.method(reqwest::Method::OPTIONS, None)
            }

            pub fn post(self, entity: Option<Entity>) -> Result<RawResponse, reqwest::Error> {
                self.method(reqwest::Method::POST, entity)
            }

            pub fn put(self, entity: Option<Entity>) -> Result<RawResponse, reqwest::Error> {
                self.method(reqwest::Method::PUT, entity)
            }

            /// Sends the request with an arbitrary verb.
            pub fn method(
                self,
                method: reqwest::Method,
                entity: Option<Entity>,
            ) -> Result<RawResponse, reqwest::Error> {
                let mut request = self.client.request(method, &self.uri);
                if !self.query.is_empty() {
                    request = request.query(&self.query);
                }
                for (name, value) in &self.headers {
                    request = request.header(name.as_str(), value.as_str());
                }
                request = match entity {
                    Some(Entity::Bytes { body, media_type }) => request
                        .header(reqwest::header::CONTENT_TYPE, media_type)
                        .body(body),
                    Some(Entity::Multipart(form)) => request.multipart(form),
                    Some(Entity::Form(params)) => request.form(params.pairs()),
                    None => request,
                };
                RawResponse::from_response(request.send()?)
            }
        }
    }
}

/// Response access.
pub fn generate_response_types() -> TokenStream {
    quote! {
        /// Status code and reason phrase of a response.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct StatusInfo {
            status_code: u16,
            reason_phrase: String,
        }

        impl StatusInfo {
            pub fn status_code(&self) -> u16 {
                self.status_code
            }

            pub fn reason_phrase(&self) -> &str {
                &self.reason_phrase
            }
        }

        /// Reified type token for decoding generic payloads such as `Vec<T>`.
        pub struct GenericType<T>(std::marker::PhantomData<fn() -> T>);

        impl<T> GenericType<T> {
            pub const fn new() -> Self {
                Self(std::marker::PhantomData)
            }
        }

        impl<T> Default for GenericType<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        /// A fully read HTTP response.
        #[derive(Debug, Clone)]
        pub struct RawResponse {
            status: reqwest::StatusCode,
            reason: Option<String>,
            headers: reqwest::header::HeaderMap,
            body: Vec<u8>,
        }

        impl RawResponse {
            pub fn new(
                status: reqwest::StatusCode,
                headers: reqwest::header::HeaderMap,
                body: impl Into<Vec<u8>>,
            ) -> Self {
                Self {
                    status,
                    reason: None,
                    headers,
                    body: body.into(),
                }
            }

            /// Sets the reason phrase the server sent on the status line.
            pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
                self.reason = Some(reason.into());
                self
            }

            /// Reads the whole body of a response.
            ///
            /// HTTP/1 responses whose reason phrase differs from the canonical
            /// one carry it as a `hyper::ext::ReasonPhrase` extension.
            pub fn from_response(response: reqwest::blocking::Response) -> Result<Self, reqwest::Error> {
                let status = response.status();
                let reason = response
                    .extensions()
                    .get::<hyper::ext::ReasonPhrase>()
                    .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned());
                let headers = response.headers().clone();
                let body = response.bytes()?.to_vec();
                Ok(Self {
                    status,
                    reason,
                    headers,
                    body,
                })
            }

            pub fn status(&self) -> reqwest::StatusCode {
                self.status
            }

            /// Status code and the reason phrase as sent; the canonical phrase
            /// stands in when the server sent the standard one or none.
            pub fn status_info(&self) -> StatusInfo {
                let reason_phrase = match &self.reason {
                    Some(reason) => reason.clone(),
                    None => self
                        .status
                        .canonical_reason()
                        .unwrap_or("Unknown Status")
                        .to_string(),
                };
                StatusInfo {
                    status_code: self.status.as_u16(),
                    reason_phrase,
                }
            }

            /// Headers as a multimap of strings. Non UTF-8 values are decoded lossily.
            pub fn string_headers(&self) -> HeaderMultimap {
                let mut headers = HeaderMultimap::new();
                for (name, value) in &self.headers {
                    headers
                        .entry(name.as_str().to_string())
                        .or_default()
                        .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
                }
                headers
            }

            pub fn body(&self) -> &[u8] {
                &self.body
            }

            /// The raw body, for file content.
            pub fn bytes(&self) -> Vec<u8> {
                self.body.clone()
            }

            pub fn text(&self) -> String {
                String::from_utf8_lossy(&self.body).into_owned()
            }

            /// The body as an untyped value: JSON when it parses, a string
            /// otherwise, null when empty.
            pub fn entity(&self) -> serde_json::Value {
                if self.body.is_empty() {
                    return serde_json::Value::Null;
                }
                serde_json::from_slice(&self.body)
                    .unwrap_or_else(|_| serde_json::Value::String(self.text()))
            }

            /// Decodes the body into `T`. Bodies that are not JSON are offered
            /// to `T` as a plain string, so `String` reads any text body.
            pub fn read_entity<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
                match serde_json::from_slice(&self.body) {
                    Ok(value) => Ok(value),
                    Err(err) => serde_json::from_value(serde_json::Value::String(self.text()))
                        .map_err(|_| err),
                }
            }

            /// Decodes the body into the type carried by `token`.
            pub fn read_entity_generic<T: serde::de::DeserializeOwned>(
                &self,
                token: GenericType<T>,
            ) -> Result<T, serde_json::Error> {
                let GenericType(_) = token;
                serde_json::from_slice(&self.body)
            }
        }
    }
}

/// Error types shared by all APIs.
pub fn generate_error_types() -> TokenStream {
    quote! {
        /// Errors returned by generated methods.
        ///
        /// `E` is the API's own error type, raised for non-success responses.
        #[derive(Debug)]
        pub enum ClientError<E> {
            /// The request could not be sent or the response not read.
            Http(reqwest::Error),
            /// A payload could not be encoded or decoded.
            Json(serde_json::Error),
            /// A file part could not be read.
            Io(std::io::Error),
            /// The API answered with a non-success status.
            Api(E),
        }

        impl<E: std::fmt::Display> std::fmt::Display for ClientError<E> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    Self::Http(err) => write!(f, "HTTP request failed: {err}"),
                    Self::Json(err) => write!(f, "JSON processing failed: {err}"),
                    Self::Io(err) => write!(f, "I/O error: {err}"),
                    Self::Api(err) => write!(f, "{err}"),
                }
            }
        }

        impl<E: std::error::Error + 'static> std::error::Error for ClientError<E> {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                match self {
                    Self::Http(err) => Some(err),
                    Self::Json(err) => Some(err),
                    Self::Io(err) => Some(err),
                    Self::Api(err) => Some(err),
                }
            }
        }

        impl<E> From<reqwest::Error> for ClientError<E> {
            fn from(err: reqwest::Error) -> Self {
                Self::Http(err)
            }
        }

        impl<E> From<serde_json::Error> for ClientError<E> {
            fn from(err: serde_json::Error) -> Self {
                Self::Json(err)
            }
        }

        impl<E> From<std::io::Error> for ClientError<E> {
            fn from(err: std::io::Error) -> Self {
                Self::Io(err)
            }
        }

        /// Generic error for non-success responses.
        ///
        /// Used by APIs whose own error type could not be generated.
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        #[error("API request failed with status {status_code}: {reason}")]
        pub struct StatusError {
            status_code: u16,
            reason: String,
        }

        impl StatusError {
            pub fn new(status_code: u16, reason: impl Into<String>) -> Self {
                Self {
                    status_code,
                    reason: reason.into(),
                }
            }

            pub fn status_code(&self) -> u16 {
                self.status_code
            }

            pub fn reason(&self) -> &str {
                &self.reason
            }
        }
    }
}

/// Assembles the complete shared module.
pub fn generate_runtime() -> TokenStream {
    let media_types = generate_media_types();
    let param_value = generate_param_value();
    let entity = generate_entity();
    let request = generate_request_types();
    let response = generate_response_types();
    let errors = generate_error_types();

    quote! {
        //! Shared request/response runtime for generated API clients.

        #media_types

        #param_value

        #entity

        #request

        #response

        #errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::format_items;

    #[test]
    fn runtime_is_valid_rust() {
        let code = format_items(&generate_runtime());
        for name in SHARED_IMPORTS {
            assert!(
                code.contains(&format!("pub struct {name}"))
                    || code.contains(&format!("pub enum {name}"))
                    || code.contains(&format!("pub type {name}"))
                    || code.contains(&format!("pub trait {name}"))
                    || code.contains(&format!("as {name};")),
                "shared module does not define {name}"
            );
        }
    }

    #[test]
    fn invocation_builder_has_all_verbs() {
        let code = format_items(&generate_request_types());
        for verb in ["get", "delete", "options"] {
            assert!(code.contains(&format!("pub fn {verb}(self) -> Result<RawResponse, reqwest::Error>")));
        }
        for verb in ["post", "put"] {
            assert!(code.contains(&format!("pub fn {verb}(self, entity: Option<Entity>)")));
        }
    }

    #[test]
    fn client_error_converts_transport_errors() {
        let code = format_items(&generate_error_types());
        assert!(code.contains("impl<E> From<reqwest::Error> for ClientError<E>"));
        assert!(code.contains("impl<E> From<serde_json::Error> for ClientError<E>"));
        assert!(code.contains("impl<E> From<std::io::Error> for ClientError<E>"));
    }

    #[test]
    fn parameters_are_sent_through_param_value() {
        let code = format_items(&generate_param_value());
        assert!(code.contains("pub trait ParamValue"));
        assert!(code.contains("serde_json::Value::String(s) => s.clone()"));
        assert!(code.contains("impl ParamValue for std::path::PathBuf"));

        let request = format_items(&generate_request_types());
        assert!(request.contains("pub fn query_param(mut self, name: &str, value: impl ParamValue)"));
        assert!(!request.contains("impl ToString"));
    }

    #[test]
    fn status_info_prefers_the_sent_reason() {
        let code = format_items(&generate_response_types());
        assert!(code.contains(".get::<hyper::ext::ReasonPhrase>()"));
        assert!(code.contains("Some(reason) => reason.clone()"));
        assert!(code.contains("pub fn bytes(&self) -> Vec<u8>"));
    }

    #[test]
    fn string_text_bodies_are_readable() {
        let code = format_items(&generate_response_types());
        assert!(code.contains("serde_json::Value::String(self.text())"));
    }
}
