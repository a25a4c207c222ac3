//! Restgen code generator library.
//!
//! This crate compiles declared API actions (from `restgen-define`) into
//! strongly-typed, blocking Rust client methods. For every API it
//! generates:
//!
//! - A root `{Title}Client` with accessors for the top-level resources
//! - One struct per resource, holding its base URI and HTTP client
//! - One method per action and request body variant (PATCH is skipped)
//! - Query, header and form body parameter structs
//! - A per-API error type `{Title}Exception`, and for v2 output a response
//!   envelope `{Title}Response<T>`
//!
//! ## Modules
//!
//! - [`compiler`] - Whole-API compilation into a [`code_model::CodeModel`]
//! - [`codegen`] - The action compiler and the individual generators
//! - [`context`] - Per-API compilation context
//! - [`ir`] / [`render`] - Method IR and its printer
//! - [`output`] - Final assembly, validation, and file writing
//! - [`cargo_gen`] - Cargo.toml generation for the output crate
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use restgen_define::{Action, ActionResponse, ActionType, ApiModel, Resource, TypeDecl};
//! use restgen_gen::options::{GeneratorOptions, OutputVersion};
//! use restgen_gen::output::generate_and_write;
//!
//! let api = ApiModel::new("Foo", "https://api.example.com").with_resource(
//!     Resource::new("/users").with_action(
//!         Action::new(ActionType::Get)
//!             .with_response(ActionResponse::ok(TypeDecl::list(TypeDecl::named("UserDto")))),
//!     ),
//! );
//!
//! let options = GeneratorOptions::new(OutputVersion::V1);
//! let code = generate_and_write(&api, &options, Path::new("generated/src")).unwrap();
//! println!("{}", code);
//! ```
//!
//! ## Generated Code Structure
//!
//! ```text
//! pub struct FooException { .. }
//!
//! pub struct UsersResource { base_url: String, client: reqwest::blocking::Client }
//!
//! impl UsersResource {
//!     /// Returns the list of all users
//!     pub fn get(&self) -> Result<Vec<UserDto>, ClientError<FooException>>;
//! }
//!
//! pub struct FooClient { .. }
//!
//! impl FooClient {
//!     pub fn users(&self) -> UsersResource;
//! }
//! ```

pub mod cargo_gen;
pub mod code_model;
pub mod codegen;
pub mod compiler;
pub mod context;
pub mod errors;
pub mod ir;
pub mod naming;
pub mod options;
pub mod output;
pub mod render;

#[cfg(test)]
pub(crate) mod test_utils;
