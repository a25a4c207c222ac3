//! Per-API response envelope synthesis.
//!
//! Envelope output returns `{Title}Response<T>` from every method, bundling
//! the decoded body with the response headers and the raw response. Unlike
//! the error type there is no fallback: a taken name stops generation for
//! the API.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::debug;

use crate::code_model::CodeModel;
use crate::context::WrapperType;
use crate::errors::GeneratorError;
use crate::naming::response_type_name;

/// Generates the envelope type definition.
pub fn generate_wrapper_type(type_name: &str, api_title: &str) -> TokenStream {
    let name = format_ident!("{}", type_name);
    let doc = format!(" Successful response of the {api_title} API.");

    quote! {
        #[doc = #doc]
        ///
        /// `T` is the decoded body; `()` for actions without a response body.
        #[derive(Debug, Clone)]
        pub struct #name<T> {
            body: T,
            headers: HeaderMultimap,
            response: RawResponse,
        }

        impl<T> #name<T> {
            /// Bundles a decoded body with the response it came from.
            pub fn new(body: T, headers: HeaderMultimap, response: RawResponse) -> Self {
                Self { body, headers, response }
            }

            /// The decoded body.
            pub fn body(&self) -> &T {
                &self.body
            }

            /// Consumes the envelope, returning the decoded body.
            pub fn into_body(self) -> T {
                self.body
            }

            /// Response headers; names are lowercase, values keep their order.
            pub fn headers(&self) -> &HeaderMultimap {
                &self.headers
            }

            /// The raw response.
            pub fn response(&self) -> &RawResponse {
                &self.response
            }
        }
    }
}

/// Defines the API's envelope type in `model`, once.
///
/// ## Errors
///
/// Returns [`GeneratorError::TypeAlreadyExists`] if the name is taken.
pub fn synthesize_wrapper_type(
    api_title: &str,
    module: &str,
    model: &mut CodeModel,
) -> Result<WrapperType, GeneratorError> {
    let name = response_type_name(api_title);
    let tokens = generate_wrapper_type(&name, api_title);

    let path = model
        .define_type(module, &name, tokens)
        .map_err(|_| GeneratorError::TypeAlreadyExists {
            type_name: CodeModel::qualified(module, &name),
        })?;
    debug!(%path, "defined response envelope type");

    Ok(WrapperType { name, path })
}
