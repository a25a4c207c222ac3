//! Derives the compile inputs of an action.
//!
//! The compiler itself only sees resolved types: what the method returns,
//! what the body parameter looks like, whether query and header objects
//! exist. This module makes those decisions from the declared model and
//! owns the naming of the parameter model structs.

use indexmap::IndexMap;
use restgen_define::{
    Action, ActionType, ApiModel, BodyVariant, MimeCategory, Resource, TypeDecl,
    TypeFieldDefinition,
};

use crate::ir::TypeRef;
use crate::naming::{to_pascal_case, to_snake_case};
use crate::options::OutputVersion;

/// The body parameter of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyParam {
    /// Type of the `body` parameter.
    pub ty: TypeRef,
    pub category: MimeCategory,
    /// Literal media type as declared.
    pub media_type: String,
    /// Form fields for multipart and URL-encoded bodies.
    pub fields: IndexMap<String, TypeFieldDefinition>,
    /// True when the caller supplies the media type (`mime_type` parameter).
    pub caller_mime_type: bool,
    /// Name of the generated body struct, for multipart and form bodies.
    pub model_name: Option<String>,
}

/// Everything needed to compile one method for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSignature {
    pub method_name: String,
    /// Declared return type, before any envelope is applied.
    pub return_type: TypeRef,
    pub body: Option<BodyParam>,
    pub query_param_type: Option<TypeRef>,
    pub header_param_type: Option<TypeRef>,
    pub output_version: OutputVersion,
    /// True when the resource or the whole API is OAuth 2.0 secured.
    pub oauth2_secured: bool,
}

/// Maps a payload declaration to a Rust type.
pub fn type_ref_for(decl: &TypeDecl) -> TypeRef {
    match decl {
        TypeDecl::Any => TypeRef::Any,
        TypeDecl::File => TypeRef::bytes(),
        TypeDecl::String => TypeRef::path("String"),
        TypeDecl::Named(schema) => TypeRef::path(schema.full_path()),
        TypeDecl::List(item) => TypeRef::generic("Vec", vec![type_ref_for(item)]),
    }
}

/// Return type: the schema of the first success response declaring one,
/// `()` otherwise.
pub fn return_type(action: &Action) -> TypeRef {
    action
        .responses
        .iter()
        .filter(|response| response.is_success())
        .find_map(|response| response.schema.as_ref())
        .map(type_ref_for)
        .unwrap_or(TypeRef::Unit)
}

/// `{Resource}{Verb}` prefix shared by the parameter struct names.
pub fn model_prefix(resource_base: &str, action_type: ActionType) -> String {
    format!("{resource_base}{}", to_pascal_case(&action_type.method_name()))
}

/// Name of the query parameter struct.
pub fn query_param_type_name(resource_base: &str, action_type: ActionType) -> String {
    format!("{}QueryParam", model_prefix(resource_base, action_type))
}

/// Name of the header struct.
pub fn header_type_name(resource_base: &str, action_type: ActionType) -> String {
    format!("{}Header", model_prefix(resource_base, action_type))
}

/// Name of the body struct for the `index`-th body variant.
pub fn body_type_name(resource_base: &str, action_type: ActionType, index: usize, category: MimeCategory) -> String {
    let prefix = model_prefix(resource_base, action_type);
    if index == 0 {
        format!("{prefix}Body")
    } else {
        format!("{prefix}{}Body", to_pascal_case(&category.to_string()))
    }
}

fn body_param(
    variant: &BodyVariant,
    resource_base: &str,
    action_type: ActionType,
    index: usize,
) -> BodyParam {
    let category = variant.category();
    let untyped = variant.schema.as_ref().is_none_or(TypeDecl::is_untyped);

    let (ty, model_name) = match category {
        MimeCategory::Json => (
            variant.schema.as_ref().map(type_ref_for).unwrap_or(TypeRef::Any),
            None,
        ),
        MimeCategory::Text => (TypeRef::path("String"), None),
        MimeCategory::Binary | MimeCategory::Generic => (TypeRef::bytes(), None),
        MimeCategory::Multipart | MimeCategory::FormUrlEncoded => {
            let name = body_type_name(resource_base, action_type, index, category);
            (TypeRef::path(name.clone()), Some(name))
        }
    };

    BodyParam {
        ty,
        category,
        media_type: variant.media_type.clone(),
        fields: variant.form_parameters.clone(),
        caller_mime_type: category == MimeCategory::Binary && untyped,
        model_name,
    }
}

/// Resolves one signature per body variant of `action`.
///
/// The first variant keeps the bare verb as method name; later variants
/// get a `_{category}` suffix. Verbs sent without a payload (GET, DELETE,
/// OPTIONS) ignore declared bodies and resolve to a single signature.
///
/// ## Examples
///
/// ```
/// use restgen_define::{Action, ActionType, ApiModel, BodyVariant, Resource};
/// use restgen_gen::codegen::signature::resolve_signatures;
/// use restgen_gen::options::OutputVersion;
///
/// let action = Action::new(ActionType::Post)
///     .with_body(BodyVariant::json("UserDto"))
///     .with_body(BodyVariant::new("multipart/form-data"));
/// let resource = Resource::new("/users").with_action(action.clone());
/// let api = ApiModel::new("Foo", "https://x").with_resource(resource.clone());
///
/// let signatures = resolve_signatures(&api, &resource, "Users", &action, OutputVersion::V1);
/// let names: Vec<_> = signatures.iter().map(|s| s.method_name.as_str()).collect();
/// assert_eq!(names, vec!["post", "post_multipart"]);
/// ```
pub fn resolve_signatures(
    api: &ApiModel,
    resource: &Resource,
    resource_base: &str,
    action: &Action,
    output_version: OutputVersion,
) -> Vec<ActionSignature> {
    let verb = action.action_type;
    let base_name = verb.method_name();

    let query_param_type = (!action.query_parameters.is_empty())
        .then(|| TypeRef::path(query_param_type_name(resource_base, verb)));
    let header_param_type = (!action.headers.is_empty())
        .then(|| TypeRef::path(header_type_name(resource_base, verb)));

    let template = ActionSignature {
        method_name: base_name.clone(),
        return_type: return_type(action),
        body: None,
        query_param_type,
        header_param_type,
        output_version,
        oauth2_secured: api.requires_bearer_token(resource),
    };

    if verb.is_payloadless() || action.bodies.is_empty() {
        return vec![template];
    }

    let mut used: Vec<String> = Vec::new();
    action
        .bodies
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            let mut method_name = if index == 0 {
                base_name.clone()
            } else {
                format!("{base_name}_{}", to_snake_case(&variant.category().to_string()))
            };
            if used.contains(&method_name) {
                method_name = format!("{method_name}_{}", index + 1);
            }
            used.push(method_name.clone());

            ActionSignature {
                method_name,
                body: Some(body_param(variant, resource_base, verb, index)),
                ..template.clone()
            }
        })
        .collect()
}
