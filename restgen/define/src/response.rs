//! Declared responses of an action.

use serde::{Deserialize, Serialize};

use crate::schema::TypeDecl;

/// One declared response of an action, keyed by status code.
///
/// ## Examples
///
/// ```
/// use restgen_define::{ActionResponse, TypeDecl};
///
/// let ok = ActionResponse::ok(TypeDecl::named("User"));
/// assert!(ok.is_success());
/// assert!(!ActionResponse::empty(404).is_success());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    /// HTTP status code.
    pub status: u16,
    /// Literal media type of the body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Declared body type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TypeDecl>,
}

impl ActionResponse {
    /// A `200 OK` JSON response carrying the given type.
    pub fn ok(schema: TypeDecl) -> Self {
        Self {
            status: 200,
            media_type: Some("application/json".to_string()),
            schema: Some(schema),
        }
    }

    /// A response without a body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            media_type: None,
            schema: None,
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx_only() {
        assert!(ActionResponse::empty(200).is_success());
        assert!(ActionResponse::empty(204).is_success());
        assert!(ActionResponse::empty(299).is_success());
        assert!(!ActionResponse::empty(199).is_success());
        assert!(!ActionResponse::empty(300).is_success());
    }
}
