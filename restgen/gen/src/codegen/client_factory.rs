//! Client and target acquisition methods.

use proc_macro2::TokenStream;
use quote::quote;

/// Generates `new_target` and `base_uri` for a resource struct.
///
/// `new_target` builds a fresh HTTP client bound to the resource's base
/// URI; compiled actions reuse the resource's own client instead.
pub fn generate_client_factory() -> TokenStream {
    quote! {
        /// Creates a request target bound to this resource, using a new HTTP client.
        pub fn new_target(&self) -> WebTarget {
            WebTarget::new(reqwest::blocking::Client::new(), self.base_uri())
        }

        /// Base URI of this resource.
        pub fn base_uri(&self) -> &str {
            &self.base_url
        }
    }
}
