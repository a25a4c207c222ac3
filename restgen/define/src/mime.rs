//! Request body variants and MIME classification.
//!
//! An action may accept several body variants, one per declared media type.
//! Each literal media type is classified into a closed [`MimeCategory`] which
//! drives how the generated client encodes the payload.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::field::TypeFieldDefinition;
use crate::schema::TypeDecl;

/// Encoding family of a body media type.
///
/// Classification never fails: anything unrecognized lands in
/// [`MimeCategory::Generic`].
///
/// ## Examples
///
/// ```
/// use restgen_define::MimeCategory;
///
/// assert_eq!(MimeCategory::classify("application/json"), MimeCategory::Json);
/// assert_eq!(MimeCategory::classify("application/vnd.api+json"), MimeCategory::Json);
/// assert_eq!(MimeCategory::classify("multipart/form-data"), MimeCategory::Multipart);
/// assert_eq!(MimeCategory::classify("application/xml"), MimeCategory::Generic);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MimeCategory {
    /// `application/json` and `+json` suffixed types.
    Json,
    /// `text/*`.
    Text,
    /// `application/octet-stream`.
    Binary,
    /// `multipart/form-data`.
    Multipart,
    /// `application/x-www-form-urlencoded`.
    FormUrlEncoded,
    /// Any other media type.
    Generic,
}

impl MimeCategory {
    /// Classifies a literal media type. Parameters (`; charset=...`) and case
    /// are ignored.
    pub fn classify(media_type: &str) -> Self {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/json" => Self::Json,
            "application/octet-stream" => Self::Binary,
            "multipart/form-data" => Self::Multipart,
            "application/x-www-form-urlencoded" => Self::FormUrlEncoded,
            other if other.ends_with("+json") => Self::Json,
            other if other.starts_with("text/") => Self::Text,
            _ => Self::Generic,
        }
    }
}

/// One accepted request body of an action.
///
/// ## Examples
///
/// ```
/// use restgen_define::{BodyVariant, MimeCategory, TypeFieldDefinition};
///
/// let upload = BodyVariant::new("multipart/form-data")
///     .with_field("file", TypeFieldDefinition::file())
///     .with_field("text", TypeFieldDefinition::string());
///
/// assert_eq!(upload.category(), MimeCategory::Multipart);
/// assert_eq!(upload.form_parameters.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyVariant {
    /// Literal media type as declared (e.g. `application/json`).
    #[serde(rename = "type")]
    pub media_type: String,
    /// Payload type, when the API declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TypeDecl>,
    /// Ordered form fields. Only used by multipart and URL-encoded bodies.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub form_parameters: IndexMap<String, TypeFieldDefinition>,
}

impl BodyVariant {
    /// Creates an untyped body variant for the given media type.
    pub fn new(media_type: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            schema: None,
            form_parameters: IndexMap::new(),
        }
    }

    /// Creates a JSON body carrying the named type.
    pub fn json(type_name: impl Into<String>) -> Self {
        Self::new("application/json").with_schema(TypeDecl::named(type_name))
    }

    /// Sets the payload type.
    pub fn with_schema(mut self, schema: TypeDecl) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Appends a form field, keeping declaration order.
    pub fn with_field(mut self, name: impl Into<String>, field: TypeFieldDefinition) -> Self {
        self.form_parameters.insert(name.into(), field);
        self
    }

    /// Returns the encoding family of this body.
    pub fn category(&self) -> MimeCategory {
        MimeCategory::classify(&self.media_type)
    }
}
