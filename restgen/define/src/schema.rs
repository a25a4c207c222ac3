//! Payload type declarations for request and response bodies.
//!
//! The compiler needs to know four shapes of payload: nothing, an opaque
//! value, a named type, or a collection of another declaration. Named types
//! are referenced by name only; generating their definitions is the job of a
//! separate model generator.

use serde::{Deserialize, Serialize};

/// A reference to a named, externally defined type.
///
/// ## Examples
///
/// ```
/// use restgen_define::Schema;
///
/// let schema = Schema::new("UserDto");
/// assert_eq!(schema.full_path(), "UserDto");
///
/// let qualified = Schema::with_path("UserDto", "crate::model");
/// assert_eq!(qualified.full_path(), "crate::model::UserDto");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schema {
    /// The Rust type name (e.g., "UserDto").
    pub type_name: String,
    /// Module path where this type is defined (e.g., "crate::model").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,
}

impl Schema {
    /// Creates a schema with just a type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            module_path: None,
        }
    }

    /// Creates a schema with a module path.
    pub fn with_path(type_name: impl Into<String>, module_path: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            module_path: Some(module_path.into()),
        }
    }

    /// Returns the fully qualified type path.
    pub fn full_path(&self) -> String {
        match &self.module_path {
            Some(path) => format!("{}::{}", path, self.type_name),
            None => self.type_name.clone(),
        }
    }
}

/// Declared type of a body payload.
///
/// ## Examples
///
/// ```
/// use restgen_define::TypeDecl;
///
/// let users = TypeDecl::list(TypeDecl::named("UserDto"));
/// assert!(matches!(users, TypeDecl::List(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDecl {
    /// Untyped payload; decoded without coercion.
    Any,
    /// Raw file contents.
    File,
    /// Plain string payload.
    String,
    /// A named type.
    Named(Schema),
    /// An ordered collection of another declaration.
    List(Box<TypeDecl>),
}

impl TypeDecl {
    /// Shorthand for [`TypeDecl::Named`] without a module path.
    pub fn named(type_name: impl Into<String>) -> Self {
        Self::Named(Schema::new(type_name))
    }

    /// Shorthand for [`TypeDecl::List`].
    pub fn list(item: TypeDecl) -> Self {
        Self::List(Box::new(item))
    }

    /// Returns true for declarations that carry no usable type information.
    pub fn is_untyped(&self) -> bool {
        matches!(self, Self::Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_path_without_module() {
        assert_eq!(Schema::new("Response").full_path(), "Response");
    }

    #[test]
    fn full_path_with_module() {
        assert_eq!(
            Schema::with_path("Response", "api::types").full_path(),
            "api::types::Response"
        );
    }

    #[test]
    fn list_of_named_deserializes() {
        let decl: TypeDecl =
            serde_json::from_str(r#"{"list":{"named":{"type_name":"UserDto"}}}"#).unwrap();
        assert_eq!(decl, TypeDecl::list(TypeDecl::named("UserDto")));
    }

    #[test]
    fn unit_variants_deserialize_from_strings() {
        let any: TypeDecl = serde_json::from_str(r#""any""#).unwrap();
        assert!(any.is_untyped());
        let file: TypeDecl = serde_json::from_str(r#""file""#).unwrap();
        assert!(!file.is_untyped());
    }
}
