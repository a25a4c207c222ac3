//! Shared test utilities for restgen-gen tests.
//!
//! Fixtures mirror the two reference APIs used throughout the tests: a
//! user listing (`GET /users`) and a file upload (`PUT /files/{fileName}`).

use proc_macro2::TokenStream;
use restgen_define::{
    Action, ActionResponse, ActionType, ApiModel, BodyVariant, Resource, SecurityScheme,
    SecuritySchemeKind, TypeDecl, TypeFieldDefinition,
};

/// `GET /users` returning a list of `UserDto`, no parameters, no security.
pub fn make_users_api() -> ApiModel {
    ApiModel::new("Foo", "https://api.example.com").with_resource(
        Resource::new("/users").with_action(
            Action::new(ActionType::Get)
                .with_description("Returns the list of all users")
                .with_response(ActionResponse::ok(TypeDecl::list(TypeDecl::named("UserDto")))),
        ),
    )
}

/// `PUT /files/{fileName}` taking an untyped octet-stream body and two
/// optional headers, returning nothing.
pub fn make_files_api() -> ApiModel {
    ApiModel::new("Foo", "https://api.example.com").with_resource(
        Resource::new("/files").with_child(
            Resource::new("/{fileName}").with_action(
                Action::new(ActionType::Put)
                    .with_header("x-base-commit-id", TypeFieldDefinition::string())
                    .with_header("x-commit-message", TypeFieldDefinition::string())
                    .with_body(BodyVariant::new("application/octet-stream"))
                    .with_response(ActionResponse::empty(204)),
            ),
        ),
    )
}

/// An API with an OAuth 2.0 secured resource.
pub fn make_secured_api() -> ApiModel {
    ApiModel::new("Secure", "https://secure.example.com")
        .with_security_scheme(SecurityScheme::new("oauth_2_0", SecuritySchemeKind::OAuth2))
        .with_resource(
            Resource::new("/me")
                .with_security("oauth_2_0")
                .with_action(Action::new(ActionType::Get).with_response(ActionResponse::ok(TypeDecl::Any))),
        )
}

/// Validates that generated code is syntactically correct.
///
/// ## Errors
///
/// Returns an error string if the generated code fails to parse.
pub fn validate_generated_code(tokens: &TokenStream) -> Result<(), String> {
    syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(())
}

/// Formats generated code using prettyplease.
///
/// ## Errors
///
/// Returns an error string if the code fails to parse.
pub fn format_generated_code(tokens: &TokenStream) -> Result<String, String> {
    let file = syn::parse2::<syn::File>(tokens.clone()).map_err(|e| e.to_string())?;
    Ok(prettyplease::unparse(&file))
}

/// Formats generated items, panicking with the parse error if they are not
/// valid Rust.
pub fn format_items(tokens: &TokenStream) -> String {
    format_generated_code(tokens).unwrap_or_else(|e| panic!("generated code is invalid: {e}\n{tokens}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_api_has_one_get() {
        let api = make_users_api();
        assert_eq!(api.resources.len(), 1);
        assert_eq!(api.resources[0].actions[0].action_type, ActionType::Get);
    }

    #[test]
    fn files_api_nests_parameterized_resource() {
        let api = make_files_api();
        let file = &api.resources[0].resources[0];
        assert_eq!(file.uri_parameter_names(), vec!["fileName"]);
        assert_eq!(file.actions[0].headers.len(), 2);
    }

    #[test]
    fn validation_rejects_broken_tokens() {
        assert!(validate_generated_code(&quote::quote! { pub struct Ok; }).is_ok());
        assert!(validate_generated_code(&quote::quote! { pub struct }).is_err());
    }

    #[test]
    fn secured_api_requires_token() {
        let api = make_secured_api();
        assert!(api.requires_bearer_token(&api.resources[0]));
    }
}
