//! Convenient re-exports for building API models.
//!
//! ## Examples
//!
//! ```
//! use restgen_define::prelude::*;
//!
//! let api = ApiModel::new("Foo", "https://api.example.com").with_resource(
//!     Resource::new("/users").with_action(
//!         Action::new(ActionType::Get)
//!             .with_response(ActionResponse::ok(TypeDecl::list(TypeDecl::named("UserDto")))),
//!     ),
//! );
//! assert_eq!(api.resources.len(), 1);
//! ```

pub use crate::field::{FieldType, TypeFieldDefinition};
pub use crate::mime::{BodyVariant, MimeCategory};
pub use crate::response::ActionResponse;
pub use crate::schema::{Schema, TypeDecl};
pub use crate::security::{Secured, SecurityScheme, SecuritySchemeKind};
pub use crate::types::{Action, ActionType, ApiModel, Resource};
