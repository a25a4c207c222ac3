//! Field definitions for query parameters, headers and form bodies.
//!
//! Query parameters, headers and the fields of multipart / URL-encoded bodies
//! all share one shape: a semantic type tag plus a required flag. The
//! compiler only ever branches on the [`FieldType::File`] marker; every other
//! tag is used for picking the Rust type of the generated accessor.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Semantic type tag of a declared field.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use restgen_define::FieldType;
///
/// assert_eq!(FieldType::from_str("file").unwrap(), FieldType::File);
/// assert_eq!(FieldType::Integer.to_string(), "integer");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldType {
    /// Free-form text.
    #[default]
    String,
    /// Whole number.
    Integer,
    /// Floating point number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// Date or date-time, carried as text.
    Date,
    /// File upload. Only meaningful inside multipart bodies.
    File,
    /// Untyped value.
    Any,
}

/// A declared query parameter, header or form field.
///
/// ## Examples
///
/// ```
/// use restgen_define::{FieldType, TypeFieldDefinition};
///
/// let limit = TypeFieldDefinition::new(FieldType::Integer).with_description("Page size");
/// assert!(!limit.required);
/// assert!(!limit.is_file());
///
/// let upload = TypeFieldDefinition::file().required();
/// assert!(upload.required);
/// assert!(upload.is_file());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFieldDefinition {
    /// Semantic type tag.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Whether the API marks this field as required.
    #[serde(default)]
    pub required: bool,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TypeFieldDefinition {
    /// Creates an optional field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            description: None,
        }
    }

    /// Creates an optional text field.
    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    /// Creates an optional file field.
    pub fn file() -> Self {
        Self::new(FieldType::File)
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds a description to the field.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Returns true if the field carries the file marker.
    pub fn is_file(&self) -> bool {
        self.field_type == FieldType::File
    }
}
