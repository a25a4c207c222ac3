//! Restgen Definition Library
//!
//! This crate provides the already-parsed, declarative description of an API
//! that the `restgen-gen` compiler turns into client code. Parsing a concrete
//! description format is left to front-ends; they hand over these types
//! (directly or as JSON via serde).
//!
//! ## Core Types
//!
//! - [`ApiModel`] - API title, base URI, global security schemes, resources
//! - [`Resource`] - A URI segment with actions and nested resources
//! - [`Action`] - Verb, description, query parameters, headers, bodies, responses
//! - [`ActionType`] - HTTP verbs (GET, POST, PUT, DELETE, OPTIONS, PATCH, HEAD)
//! - [`TypeFieldDefinition`] - Semantic type tag and required flag of a field
//! - [`BodyVariant`] - A request body for one media type
//! - [`MimeCategory`] - Closed classification of media types
//! - [`TypeDecl`] / [`Schema`] - Payload type references
//! - [`SecurityScheme`] / [`Secured`] - Security declarations and the OAuth 2.0 predicate
//!
//! ## Examples
//!
//! ```
//! use restgen_define::{Action, ActionType, ActionResponse, ApiModel, Resource, TypeDecl};
//!
//! let api = ApiModel::new("Foo", "https://api.example.com").with_resource(
//!     Resource::new("/users").with_action(
//!         Action::new(ActionType::Get)
//!             .with_description("Returns the list of all users")
//!             .with_response(ActionResponse::ok(TypeDecl::list(TypeDecl::named("UserDto")))),
//!     ),
//! );
//!
//! assert_eq!(api.title, "Foo");
//! assert_eq!(api.resources[0].actions.len(), 1);
//! ```

pub mod field;
pub mod mime;
pub mod prelude;
pub mod response;
pub mod schema;
pub mod security;
pub mod types;

// Re-export main types at crate root
pub use field::{FieldType, TypeFieldDefinition};
pub use mime::{BodyVariant, MimeCategory};
pub use response::ActionResponse;
pub use schema::{Schema, TypeDecl};
pub use security::{Secured, SecurityScheme, SecuritySchemeKind};
pub use types::{Action, ActionType, ApiModel, Resource};
