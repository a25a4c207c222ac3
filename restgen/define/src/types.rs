//! Core types for declared APIs.
//!
//! This module provides the already-parsed model a front-end hands to the
//! compiler:
//!
//! - [`ApiModel`] - The top-level API with its global security schemes
//! - [`Resource`] - A URI segment owning actions and child resources
//! - [`Action`] - One declared operation on a resource
//! - [`ActionType`] - HTTP verb enumeration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::field::TypeFieldDefinition;
use crate::mime::BodyVariant;
use crate::response::ActionResponse;
use crate::security::{Secured, SecurityScheme};

/// HTTP verb of an action.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use restgen_define::ActionType;
///
/// assert_eq!(ActionType::from_str("PUT").unwrap(), ActionType::Put);
/// assert_eq!(ActionType::Delete.to_string(), "DELETE");
/// assert_eq!(ActionType::Get.method_name(), "get");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ActionType {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP DELETE
    Delete,
    /// HTTP OPTIONS
    Options,
    /// HTTP PATCH
    Patch,
    /// HTTP HEAD
    Head,
}

impl ActionType {
    /// Lowercased verb, used as the generated method name.
    pub fn method_name(&self) -> String {
        self.to_string().to_lowercase()
    }

    /// Returns true for verbs invoked without a payload argument.
    pub fn is_payloadless(&self) -> bool {
        matches!(self, Self::Get | Self::Options | Self::Delete)
    }
}

/// One declared operation on a resource.
///
/// The owning resource is not stored here; the compiler receives it next to
/// the action so security can be resolved on both levels.
///
/// ## Examples
///
/// ```
/// use restgen_define::{Action, ActionType, TypeFieldDefinition, FieldType};
///
/// let action = Action::new(ActionType::Get)
///     .with_description("Returns the list of all users")
///     .with_query_parameter("limit", TypeFieldDefinition::new(FieldType::Integer));
///
/// assert_eq!(action.query_parameters.len(), 1);
/// assert!(action.bodies.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// HTTP verb.
    #[serde(rename = "method")]
    pub action_type: ActionType,
    /// Human-readable description, copied into the generated doc comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Query parameters in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query_parameters: IndexMap<String, TypeFieldDefinition>,
    /// Headers in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, TypeFieldDefinition>,
    /// Accepted request bodies, one per media type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bodies: Vec<BodyVariant>,
    /// Declared responses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<ActionResponse>,
}

impl Action {
    /// Creates an action with no parameters, bodies or responses.
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            description: None,
            query_parameters: IndexMap::new(),
            headers: IndexMap::new(),
            bodies: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a query parameter.
    pub fn with_query_parameter(
        mut self,
        name: impl Into<String>,
        field: TypeFieldDefinition,
    ) -> Self {
        self.query_parameters.insert(name.into(), field);
        self
    }

    /// Appends a header.
    pub fn with_header(mut self, name: impl Into<String>, field: TypeFieldDefinition) -> Self {
        self.headers.insert(name.into(), field);
        self
    }

    /// Appends a body variant.
    pub fn with_body(mut self, body: BodyVariant) -> Self {
        self.bodies.push(body);
        self
    }

    /// Appends a response.
    pub fn with_response(mut self, response: ActionResponse) -> Self {
        self.responses.push(response);
        self
    }
}

/// A URI segment of the API.
///
/// ## Examples
///
/// ```
/// use restgen_define::{Action, ActionType, Resource};
///
/// let users = Resource::new("/users")
///     .with_action(Action::new(ActionType::Get))
///     .with_child(Resource::new("/{userId}"));
///
/// assert_eq!(users.resources.len(), 1);
/// assert_eq!(users.resources[0].uri_parameter_names(), vec!["userId"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// URI relative to the parent (e.g., "/users", "/{name}").
    pub relative_uri: String,
    /// Optional display name; used for the generated struct name when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Declared URI parameters.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub uri_parameters: IndexMap<String, TypeFieldDefinition>,
    /// Security scheme names protecting this resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secured_by: Vec<String>,
    /// Declared actions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    /// Nested resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl Resource {
    /// Creates an empty resource.
    pub fn new(relative_uri: impl Into<String>) -> Self {
        Self {
            relative_uri: relative_uri.into(),
            display_name: None,
            uri_parameters: IndexMap::new(),
            secured_by: Vec::new(),
            actions: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Adds a security scheme reference.
    pub fn with_security(mut self, scheme: impl Into<String>) -> Self {
        self.secured_by.push(scheme.into());
        self
    }

    /// Appends an action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Appends a nested resource.
    pub fn with_child(mut self, child: Resource) -> Self {
        self.resources.push(child);
        self
    }

    /// Extracts `{param}` names from the relative URI, in order.
    pub fn uri_parameter_names(&self) -> Vec<&str> {
        let mut params = Vec::new();
        let mut start = None;

        for (idx, c) in self.relative_uri.char_indices() {
            match c {
                '{' => start = Some(idx + 1),
                '}' => {
                    if let Some(begin) = start.take() {
                        let param = &self.relative_uri[begin..idx];
                        if !param.is_empty() {
                            params.push(param);
                        }
                    }
                }
                _ => {}
            }
        }

        params
    }
}

impl Secured for Resource {
    fn secured_by(&self) -> &[String] {
        &self.secured_by
    }
}

/// A complete, already-parsed API description.
///
/// ## Examples
///
/// ```
/// use restgen_define::{ApiModel, Resource, SecurityScheme, SecuritySchemeKind, Secured};
///
/// let api = ApiModel::new("Simple API", "https://api.example.com")
///     .with_security_scheme(SecurityScheme::new("oauth", SecuritySchemeKind::OAuth2))
///     .with_security("oauth")
///     .with_resource(Resource::new("/users"));
///
/// assert!(api.is_oauth2_secured(&api.security_schemes));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiModel {
    /// API title; names the generated exception, response and client types.
    pub title: String,
    /// Default base URI of the API.
    #[serde(default)]
    pub base_uri: String,
    /// API version label, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Global security scheme declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_schemes: Vec<SecurityScheme>,
    /// Schemes applying to every resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secured_by: Vec<String>,
    /// Top-level resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl ApiModel {
    /// Creates an API with no resources.
    pub fn new(title: impl Into<String>, base_uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            base_uri: base_uri.into(),
            version: None,
            security_schemes: Vec::new(),
            secured_by: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Declares a security scheme.
    pub fn with_security_scheme(mut self, scheme: SecurityScheme) -> Self {
        self.security_schemes.push(scheme);
        self
    }

    /// Applies a scheme to the whole API.
    pub fn with_security(mut self, scheme: impl Into<String>) -> Self {
        self.secured_by.push(scheme.into());
        self
    }

    /// Appends a top-level resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Returns true if the action on `resource` needs a bearer token, either
    /// because the resource or the whole API is OAuth 2.0 secured.
    pub fn requires_bearer_token(&self, resource: &Resource) -> bool {
        resource.is_oauth2_secured(&self.security_schemes)
            || self.is_oauth2_secured(&self.security_schemes)
    }
}

impl Secured for ApiModel {
    fn secured_by(&self) -> &[String] {
        &self.secured_by
    }
}
