//! Per-API error type synthesis.
//!
//! Every API gets one error type named after its title, e.g.
//! `SimpleApiException`. Generated methods raise it for non-success
//! responses. If the name is taken, generation goes on with the generic
//! `StatusError` from the shared module instead.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::{debug, warn};

use crate::code_model::CodeModel;
use crate::context::ExceptionType;
use crate::naming::exception_type_name;

/// Generates the error type definition.
///
/// ## Generated Code
///
/// ```ignore
/// #[derive(Debug, thiserror::Error)]
/// #[error("API request failed with status {status_code}: {reason}")]
/// pub struct SimpleApiException {
///     status_code: u16,
///     reason: String,
///     headers: Option<HeaderMultimap>,
///     response: Option<RawResponse>,
/// }
///
/// impl SimpleApiException {
///     pub fn new(status_code: u16, reason: impl Into<String>) -> Self { .. }
///     pub fn with_details(status_code: u16, reason: impl Into<String>,
///         headers: HeaderMultimap, response: RawResponse) -> Self { .. }
/// }
/// ```
pub fn generate_exception_type(type_name: &str, api_title: &str) -> TokenStream {
    let name = format_ident!("{}", type_name);
    let doc = format!(" Error returned by the {api_title} API for non-success responses.");

    quote! {
        #[doc = #doc]
        ///
        /// Carries the status code and reason phrase. Clients generated with
        /// envelope output also attach the response headers and raw response.
        #[derive(Debug, thiserror::Error)]
        #[error("API request failed with status {status_code}: {reason}")]
        pub struct #name {
            status_code: u16,
            reason: String,
            headers: Option<HeaderMultimap>,
            response: Option<RawResponse>,
        }

        impl #name {
            /// Creates an error from a status code and reason phrase.
            pub fn new(status_code: u16, reason: impl Into<String>) -> Self {
                Self {
                    status_code,
                    reason: reason.into(),
                    headers: None,
                    response: None,
                }
            }

            /// Creates an error that also keeps the response headers and the
            /// raw response.
            pub fn with_details(
                status_code: u16,
                reason: impl Into<String>,
                headers: HeaderMultimap,
                response: RawResponse,
            ) -> Self {
                Self {
                    status_code,
                    reason: reason.into(),
                    headers: Some(headers),
                    response: Some(response),
                }
            }

            /// HTTP status code of the failed response.
            pub fn status_code(&self) -> u16 {
                self.status_code
            }

            /// Reason phrase of the failed response.
            pub fn reason(&self) -> &str {
                &self.reason
            }

            /// Response headers, when captured.
            pub fn headers(&self) -> Option<&HeaderMultimap> {
                self.headers.as_ref()
            }

            /// Raw response, when captured.
            pub fn response(&self) -> Option<&RawResponse> {
                self.response.as_ref()
            }
        }
    }
}

/// Defines the API's error type in `model`, once.
///
/// Never fails: on a name collision the API degrades to
/// [`ExceptionType::Generic`] for the rest of the run and a warning is
/// logged.
pub fn synthesize_exception_type(
    api_title: &str,
    module: &str,
    model: &mut CodeModel,
) -> ExceptionType {
    let name = exception_type_name(api_title);
    let tokens = generate_exception_type(&name, api_title);

    match model.define_type(module, &name, tokens) {
        Ok(path) => {
            debug!(%path, "defined exception type");
            ExceptionType::Synthesized { name, path }
        }
        Err(err) => {
            warn!(
                api = %api_title,
                error = %err,
                "exception type name is taken; falling back to StatusError"
            );
            ExceptionType::Generic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::format_items;

    #[test]
    fn exception_type_is_valid_rust() {
        let code = format_items(&generate_exception_type("FooException", "Foo"));
        assert!(code.contains("pub struct FooException"));
        assert!(code.contains("pub fn new(status_code: u16, reason: impl Into<String>) -> Self"));
        assert!(code.contains("pub fn with_details("));
        assert!(code.contains("headers: Option<HeaderMultimap>"));
        assert!(code.contains("response: Option<RawResponse>"));
    }

    #[test]
    fn synthesizes_once_per_module() {
        let mut model = CodeModel::new();
        let first = synthesize_exception_type("Foo", "foo", &mut model);
        assert_eq!(
            first,
            ExceptionType::Synthesized {
                name: "FooException".into(),
                path: "crate::foo::FooException".into()
            }
        );

        let second = synthesize_exception_type("Foo", "foo", &mut model);
        assert_eq!(second, ExceptionType::Generic);
    }

    #[tracing_test::traced_test]
    #[test]
    fn collision_logs_warning() {
        let mut model = CodeModel::new();
        model.reserve("crate::foo::FooException");
        let exception = synthesize_exception_type("Foo", "foo", &mut model);
        assert_eq!(exception, ExceptionType::Generic);
        assert!(logs_contain("falling back to StatusError"));
    }
}
