//! Security scheme declarations.
//!
//! An API declares named security schemes globally; the API itself and any
//! resource may then be `secured_by` a list of those names. The compiler only
//! asks one question of this model: is a given target protected by an
//! OAuth 2.0 scheme?

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of a declared security scheme.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum SecuritySchemeKind {
    /// OAuth 2.0; callers pass a bearer token.
    #[serde(rename = "OAuth 2.0")]
    #[strum(serialize = "OAuth 2.0")]
    OAuth2,
    /// OAuth 1.0.
    #[serde(rename = "OAuth 1.0")]
    #[strum(serialize = "OAuth 1.0")]
    OAuth1,
    /// HTTP Basic authentication.
    #[serde(rename = "Basic Authentication")]
    #[strum(serialize = "Basic Authentication")]
    Basic,
    /// HTTP Digest authentication.
    #[serde(rename = "Digest Authentication")]
    #[strum(serialize = "Digest Authentication")]
    Digest,
    /// Credentials passed through unchanged.
    #[serde(rename = "Pass Through")]
    #[strum(serialize = "Pass Through")]
    PassThrough,
    /// Vendor-specific scheme.
    #[serde(other)]
    Custom,
}

/// A named security scheme declared at API level.
///
/// ## Examples
///
/// ```
/// use restgen_define::{SecurityScheme, SecuritySchemeKind};
///
/// let scheme = SecurityScheme::new("oauth_2_0", SecuritySchemeKind::OAuth2);
/// assert_eq!(scheme.kind.to_string(), "OAuth 2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScheme {
    /// Name used by `secured_by` references.
    pub name: String,
    /// Scheme kind.
    #[serde(rename = "type")]
    pub kind: SecuritySchemeKind,
}

impl SecurityScheme {
    /// Creates a scheme.
    pub fn new(name: impl Into<String>, kind: SecuritySchemeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Anything that can reference security schemes by name.
pub trait Secured {
    /// Names of the schemes protecting this target.
    fn secured_by(&self) -> &[String];

    /// Returns true if any referenced scheme is OAuth 2.0.
    ///
    /// Unknown names are ignored.
    fn is_oauth2_secured(&self, schemes: &[SecurityScheme]) -> bool {
        self.secured_by().iter().any(|name| {
            schemes
                .iter()
                .any(|scheme| &scheme.name == name && scheme.kind == SecuritySchemeKind::OAuth2)
        })
    }
}
