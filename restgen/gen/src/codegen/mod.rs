//! Code generation modules for restgen.
//!
//! Each submodule produces one part of a generated client. The action
//! compiler builds IR ([`crate::ir`]) that [`crate::render`] prints; every
//! other generator returns `proc_macro2::TokenStream` directly.
//!
//! ## Submodules
//!
//! - [`action`] - Compiles one declared action into a method
//! - [`body_encoding`] - Payload construction per media type category
//! - [`signature`] - Method names, parameter types and return types of an action
//! - [`exception`] - Per-API error type synthesis
//! - [`wrapper`] - Per-API response envelope synthesis
//! - [`client_factory`] - `new_target` / `base_uri` on resource structs
//! - [`model_structs`] - Query, header and form body structs
//! - [`resource_struct`] - Resource structs and the root client
//! - [`runtime`] - The shared request/response runtime module
//! - [`module_docs`] - Module-level documentation of an API module
//!
//! ## Output Format
//!
//! Generated tokens are validated with `syn::parse2` and formatted with
//! `prettyplease`; see [`crate::output`].

pub mod action;
pub mod body_encoding;
pub mod client_factory;
pub mod exception;
pub mod model_structs;
pub mod module_docs;
pub mod resource_struct;
pub mod runtime;
pub mod signature;
pub mod wrapper;

pub use action::{CompileOutcome, compile_action};
pub use module_docs::ModuleDocBuilder;
pub use signature::{ActionSignature, resolve_signatures};
