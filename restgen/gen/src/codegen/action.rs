//! Action-to-method compilation.
//!
//! [`compile_action`] turns one declared action plus its resolved
//! [`ActionSignature`] into a [`GeneratedMethod`]. The statement sequence
//! is fixed:
//!
//! 1. bind a `WebTarget` to the resource's base URI
//! 2. append each present query parameter, in declaration order
//! 3. open a request builder accepting JSON
//! 4. attach each present header, in declaration order
//! 5. attach `Authorization: Bearer <token>` for OAuth 2.0 secured actions
//! 6. encode the payload (verbs other than GET, OPTIONS and DELETE)
//! 7. invoke the verb
//! 8. raise the API error type on a non-success status
//! 9. decode the body and return it, wrapped in the envelope for v2 output;
//!    file content is returned as raw bytes
//!
//! PATCH is not supported and compiles to [`CompileOutcome::Skipped`].

use restgen_define::{Action, ActionType};
use tracing::{debug, warn};

use crate::codegen::body_encoding::{BODY, MIME_TYPE, PAYLOAD, encode_payload};
use crate::codegen::signature::ActionSignature;
use crate::context::{ApiContext, WrapperType};
use crate::errors::GeneratorError;
use crate::ir::{Expr, GeneratedMethod, Param, ParamKind, Stmt, TypeRef};
use crate::naming::unique_field_names;

const TARGET: &str = "target";
const INVOCATION_BUILDER: &str = "invocation_builder";
const RESPONSE: &str = "response";
const STATUS_INFO: &str = "status_info";
const VALUE: &str = "value";
const QUERY_PARAMETERS: &str = "query_parameters";
const HEADERS: &str = "headers";
const AUTHORIZATION_TOKEN: &str = "authorization_token";
const DECODED: &str = "entity";

/// Result of compiling one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Method(GeneratedMethod),
    /// Nothing is emitted; `warning` says why.
    Skipped { warning: String },
}

/// Compiles one action into a method.
///
/// ## Errors
///
/// Returns [`GeneratorError::MissingWrapperType`] if the signature asks for
/// envelope output but `ctx` has no envelope type.
pub fn compile_action(
    ctx: &ApiContext,
    action: &Action,
    signature: &ActionSignature,
) -> Result<CompileOutcome, GeneratorError> {
    if action.action_type == ActionType::Patch {
        let warning = format!(
            "PATCH is not supported; skipped `{}` in API '{}'",
            signature.method_name,
            ctx.title()
        );
        warn!(api = %ctx.title(), method = %signature.method_name, "skipping PATCH action");
        return Ok(CompileOutcome::Skipped { warning });
    }

    let wrapper = if signature.output_version.supports_envelope() {
        Some(ctx.wrapper().ok_or_else(|| GeneratorError::MissingWrapperType {
            api: ctx.title().to_string(),
        })?)
    } else {
        None
    };

    let query_type = signature
        .query_param_type
        .as_ref()
        .filter(|_| !action.query_parameters.is_empty());
    let header_type = signature
        .header_param_type
        .as_ref()
        .filter(|_| !action.headers.is_empty());

    let params = params(signature, query_type, header_type);

    let mut statements = Vec::new();

    // 1-2
    statements.push(Stmt::Let {
        name: TARGET.into(),
        mutable: query_type.is_some(),
        value: Expr::call(
            "WebTarget::new",
            vec![
                Expr::this().field("client").method("clone", vec![]),
                Expr::this().method("base_uri", vec![]),
            ],
        ),
    });
    if query_type.is_some() {
        let names = unique_field_names(action.query_parameters.keys().map(String::as_str));
        statements.extend(action.query_parameters.keys().zip(names).map(|(name, field_name)| {
            guard(
                QUERY_PARAMETERS,
                field_name,
                Stmt::assign(
                    TARGET,
                    Expr::var(TARGET).method("query_param", vec![Expr::str(name), Expr::var(VALUE)]),
                ),
            )
        }));
    }

    // 3-5
    statements.push(Stmt::Let {
        name: INVOCATION_BUILDER.into(),
        mutable: header_type.is_some() || signature.oauth2_secured,
        value: Expr::var(TARGET).method(
            "request",
            vec![Expr::constant("MediaType::APPLICATION_JSON")],
        ),
    });
    if header_type.is_some() {
        let names = unique_field_names(action.headers.keys().map(String::as_str));
        statements.extend(action.headers.keys().zip(names).map(|(name, field_name)| {
            guard(
                HEADERS,
                field_name,
                Stmt::Expr(
                    Expr::var(INVOCATION_BUILDER).method("header", vec![Expr::str(name), Expr::var(VALUE)]),
                ),
            )
        }));
    }
    if signature.oauth2_secured {
        statements.push(Stmt::Expr(Expr::var(INVOCATION_BUILDER).method(
            "header",
            vec![
                Expr::str("Authorization"),
                Expr::Format {
                    template: "Bearer {}".into(),
                    args: vec![Expr::var(AUTHORIZATION_TOKEN)],
                },
            ],
        )));
    }

    // 6-7
    let verb = action.action_type;
    let invocation = if verb.is_payloadless() {
        Expr::var(INVOCATION_BUILDER).method(verb.method_name(), vec![])
    } else {
        statements.extend(encode_payload(signature.body.as_ref()));
        match verb {
            ActionType::Head => Expr::var(INVOCATION_BUILDER).method(
                "method",
                vec![Expr::constant("reqwest::Method::HEAD"), Expr::var(PAYLOAD)],
            ),
            _ => Expr::var(INVOCATION_BUILDER).method(verb.method_name(), vec![Expr::var(PAYLOAD)]),
        }
    };
    statements.push(Stmt::let_(RESPONSE, invocation.try_()));

    // 8
    statements.push(status_check(ctx, wrapper.is_some()));

    // 9
    statements.extend(decode(&signature.return_type, wrapper));

    let return_type = match wrapper {
        Some(wrapper) => wrapper.wrap(signature.return_type.clone()),
        None => signature.return_type.clone(),
    };

    debug!(
        api = %ctx.title(),
        method = %signature.method_name,
        params = params.len(),
        "compiled action"
    );

    Ok(CompileOutcome::Method(GeneratedMethod {
        name: signature.method_name.clone(),
        doc: doc_lines(action, signature),
        params,
        statements,
        return_type,
        error_type: ctx.exception().type_ref(),
    }))
}

fn params(
    signature: &ActionSignature,
    query_type: Option<&TypeRef>,
    header_type: Option<&TypeRef>,
) -> Vec<Param> {
    let mut params = Vec::new();
    if let Some(body) = &signature.body {
        params.push(Param::new(BODY, body.ty.clone(), ParamKind::Body));
        if body.caller_mime_type {
            params.push(Param::new(MIME_TYPE, TypeRef::str_ref(), ParamKind::MimeType));
        }
    }
    if let Some(ty) = query_type {
        params.push(Param::new(
            QUERY_PARAMETERS,
            TypeRef::reference(ty.clone()),
            ParamKind::QueryParameters,
        ));
    }
    if let Some(ty) = header_type {
        params.push(Param::new(HEADERS, TypeRef::reference(ty.clone()), ParamKind::Headers));
    }
    if signature.oauth2_secured {
        params.push(Param::new(
            AUTHORIZATION_TOKEN,
            TypeRef::str_ref(),
            ParamKind::AuthorizationToken,
        ));
    }
    params
}

// if let Some(value) = &<object>.<field> { <append> }
fn guard(object: &str, field_name: String, append: Stmt) -> Stmt {
    Stmt::IfSome {
        binding: VALUE.into(),
        value: Expr::var(object).field(field_name),
        body: vec![append],
    }
}

fn status_check(ctx: &ApiContext, with_details: bool) -> Stmt {
    let exception = ctx.exception();
    let code = Expr::var(STATUS_INFO).method("status_code", vec![]);
    let reason = Expr::var(STATUS_INFO).method("reason_phrase", vec![]);

    let error = if with_details && exception.supports_details() {
        Expr::call(
            format!("{}::with_details", exception.name()),
            vec![
                code,
                reason,
                Expr::var(RESPONSE).method("string_headers", vec![]),
                Expr::var(RESPONSE),
            ],
        )
    } else {
        Expr::call(format!("{}::new", exception.name()), vec![code, reason])
    };

    Stmt::IfNot {
        condition: Expr::var(RESPONSE)
            .method("status", vec![])
            .method("is_success", vec![]),
        body: vec![
            Stmt::let_(STATUS_INFO, Expr::var(RESPONSE).method("status_info", vec![])),
            Stmt::Raise(error),
        ],
    }
}

fn decode(return_type: &TypeRef, wrapper: Option<&WrapperType>) -> Vec<Stmt> {
    let decoded = if return_type.is_void() {
        Expr::Unit
    } else if return_type.is_any() {
        Expr::var(RESPONSE).method("entity", vec![])
    } else if return_type.is_bytes() {
        Expr::var(RESPONSE).method("bytes", vec![])
    } else if return_type.is_parameterized() {
        Expr::var(RESPONSE)
            .method("read_entity_generic", vec![Expr::TypeToken(return_type.clone())])
            .try_()
    } else {
        Expr::var(RESPONSE)
            .method("read_entity", vec![])
            .with_turbofish(vec![return_type.clone()])
            .try_()
    };

    match wrapper {
        None => vec![Stmt::Return(decoded)],
        Some(wrapper) => {
            let mut statements = Vec::new();
            let body = if return_type.is_void() {
                Expr::Unit
            } else {
                statements.push(Stmt::let_(DECODED, decoded));
                Expr::var(DECODED)
            };
            statements.push(Stmt::Return(Expr::call(
                format!("{}::new", wrapper.name),
                vec![
                    body,
                    Expr::var(RESPONSE).method("string_headers", vec![]),
                    Expr::var(RESPONSE),
                ],
            )));
            statements
        }
    }
}

fn doc_lines(action: &Action, signature: &ActionSignature) -> Vec<String> {
    let mut doc: Vec<String> = action
        .description
        .as_deref()
        .map(|d| d.lines().map(str::to_string).collect())
        .unwrap_or_default();
    if doc.is_empty() {
        doc.push(format!("Sends a {} request.", action.action_type));
    }
    if let Some(body) = &signature.body {
        doc.push(String::new());
        doc.push(format!("Request body: `{}`.", body.media_type));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::signature::resolve_signatures;
    use crate::context::ExceptionType;
    use crate::options::OutputVersion;
    use restgen_define::{
        ActionResponse, ApiModel, BodyVariant, FieldType, Resource, TypeDecl, TypeFieldDefinition,
    };

    fn ctx(version: OutputVersion) -> ApiContext {
        let wrapper = version.supports_envelope().then(|| WrapperType {
            name: "FooResponse".into(),
            path: "crate::foo::FooResponse".into(),
        });
        ApiContext::from_parts(
            "Foo",
            "foo",
            version,
            ExceptionType::Synthesized {
                name: "FooException".into(),
                path: "crate::foo::FooException".into(),
            },
            wrapper,
        )
    }

    fn signature(action: &Action, version: OutputVersion) -> ActionSignature {
        let resource = Resource::new("/users");
        let api = ApiModel::new("Foo", "https://x");
        resolve_signatures(&api, &resource, "Users", action, version).remove(0)
    }

    fn compile(action: &Action, version: OutputVersion) -> GeneratedMethod {
        match compile_action(&ctx(version), action, &signature(action, version)).unwrap() {
            CompileOutcome::Method(method) => method,
            CompileOutcome::Skipped { warning } => panic!("unexpected skip: {warning}"),
        }
    }

    #[test]
    fn patch_is_skipped() {
        let action = Action::new(ActionType::Patch);
        let outcome = compile_action(&ctx(OutputVersion::V1), &action, &signature(&action, OutputVersion::V1)).unwrap();
        match outcome {
            CompileOutcome::Skipped { warning } => assert!(warning.contains("PATCH")),
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn v2_without_wrapper_is_an_error() {
        let action = Action::new(ActionType::Get);
        let err = compile_action(&ctx(OutputVersion::V1), &action, &signature(&action, OutputVersion::V2))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::MissingWrapperType { api } if api == "Foo"));
    }

    #[test]
    fn void_v1_returns_unit() {
        let method = compile(&Action::new(ActionType::Delete), OutputVersion::V1);
        assert_eq!(method.name, "delete");
        assert!(method.params.is_empty());
        assert_eq!(method.return_type, TypeRef::Unit);
        assert_eq!(method.statements.last(), Some(&Stmt::Return(Expr::Unit)));
    }

    #[test]
    fn step_order_is_fixed() {
        let action = Action::new(ActionType::Post)
            .with_query_parameter("limit", TypeFieldDefinition::new(FieldType::Integer))
            .with_header("x-trace", TypeFieldDefinition::string())
            .with_body(BodyVariant::json("UserDto"));
        let method = compile(&action, OutputVersion::V1);

        let kinds: Vec<&str> = method
            .statements
            .iter()
            .map(|s| match s {
                Stmt::Let { name, .. } => name.as_str(),
                Stmt::IfSome { .. } => "guard",
                Stmt::IfNot { .. } => "check",
                Stmt::Return(_) => "return",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "target",
                "guard",
                "invocation_builder",
                "guard",
                "payload",
                "response",
                "check",
                "return"
            ]
        );
    }

    #[test]
    fn target_is_mutable_only_with_query_parameters() {
        let method = compile(&Action::new(ActionType::Get), OutputVersion::V1);
        assert!(matches!(&method.statements[0], Stmt::Let { mutable: false, .. }));
        assert!(matches!(&method.statements[1], Stmt::Let { mutable: false, .. }));
    }

    #[test]
    fn v1_raises_two_argument_error() {
        let method = compile(&Action::new(ActionType::Get), OutputVersion::V1);
        let check = method
            .statements
            .iter()
            .find_map(|s| match s {
                Stmt::IfNot { body, .. } => Some(body),
                _ => None,
            })
            .unwrap();
        match &check[1] {
            Stmt::Raise(Expr::Call { path, args, .. }) => {
                assert_eq!(path, "FooException::new");
                assert_eq!(args.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn v2_raises_four_argument_error() {
        let method = compile(&Action::new(ActionType::Get), OutputVersion::V2);
        let raise = method
            .statements
            .iter()
            .find_map(|s| match s {
                Stmt::IfNot { body, .. } => body.last(),
                _ => None,
            })
            .unwrap();
        match raise {
            Stmt::Raise(Expr::Call { path, args, .. }) => {
                assert_eq!(path, "FooException::with_details");
                assert_eq!(args.len(), 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn generic_fallback_only_has_two_arguments() {
        let ctx = ApiContext::from_parts(
            "Foo",
            "foo",
            OutputVersion::V2,
            ExceptionType::Generic,
            Some(WrapperType {
                name: "FooResponse".into(),
                path: "crate::foo::FooResponse".into(),
            }),
        );
        let action = Action::new(ActionType::Get);
        let method = match compile_action(&ctx, &action, &signature(&action, OutputVersion::V2)).unwrap() {
            CompileOutcome::Method(m) => m,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(method.error_type, TypeRef::path("StatusError"));
        let code = crate::render::render_block(&method.statements).to_string();
        assert!(code.contains("StatusError :: new"));
        assert!(!code.contains("with_details"));
    }

    #[test]
    fn v2_wraps_return_type() {
        let action = Action::new(ActionType::Get)
            .with_response(ActionResponse::ok(TypeDecl::named("UserDto")));
        let v1 = compile(&action, OutputVersion::V1);
        let v2 = compile(&action, OutputVersion::V2);
        assert_eq!(v1.return_type, TypeRef::path("UserDto"));
        assert_eq!(
            v2.return_type,
            TypeRef::generic("FooResponse", vec![TypeRef::path("UserDto")])
        );
    }

    #[test]
    fn any_returns_raw_entity() {
        let action = Action::new(ActionType::Get).with_response(ActionResponse::ok(TypeDecl::Any));
        let method = compile(&action, OutputVersion::V1);
        assert_eq!(
            method.statements.last(),
            Some(&Stmt::Return(Expr::var("response").method("entity", vec![])))
        );
    }

    #[test]
    fn file_returns_raw_bytes() {
        let action = Action::new(ActionType::Get).with_response(ActionResponse::ok(TypeDecl::File));

        let v1 = compile(&action, OutputVersion::V1);
        assert_eq!(v1.return_type, TypeRef::bytes());
        assert_eq!(
            v1.statements.last(),
            Some(&Stmt::Return(Expr::var("response").method("bytes", vec![])))
        );

        let v2 = compile(&action, OutputVersion::V2);
        assert!(v2.statements.contains(&Stmt::let_(
            "entity",
            Expr::var("response").method("bytes", vec![])
        )));
        let code = crate::render::render_block(&v2.statements).to_string();
        assert!(!code.contains("read_entity_generic"));
    }

    #[test]
    fn lists_still_decode_through_type_token() {
        let action = Action::new(ActionType::Get)
            .with_response(ActionResponse::ok(TypeDecl::list(TypeDecl::String)));
        let method = compile(&action, OutputVersion::V1);
        let code = crate::render::render_block(&method.statements).to_string();
        assert!(code.contains("read_entity_generic"));
    }

    #[test]
    fn colliding_parameter_names_read_distinct_fields() {
        let action = Action::new(ActionType::Get)
            .with_query_parameter("page-size", TypeFieldDefinition::new(FieldType::Integer))
            .with_query_parameter("page_size", TypeFieldDefinition::new(FieldType::Integer))
            .with_header("try", TypeFieldDefinition::string())
            .with_header("x²", TypeFieldDefinition::string());
        let method = compile(&action, OutputVersion::V1);

        let guarded: Vec<_> = method
            .statements
            .iter()
            .filter_map(|s| match s {
                Stmt::IfSome { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            guarded,
            vec![
                Expr::var("query_parameters").field("page_size"),
                Expr::var("query_parameters").field("page_size_2"),
                Expr::var("headers").field("try_"),
                Expr::var("headers").field("x"),
            ]
        );
    }

    #[test]
    fn head_uses_explicit_method() {
        let method = compile(&Action::new(ActionType::Head), OutputVersion::V1);
        let code = crate::render::render_block(&method.statements).to_string();
        assert!(code.contains("reqwest :: Method :: HEAD"));
    }

    #[test]
    fn oauth_adds_unguarded_bearer_header() {
        let mut sig = signature(&Action::new(ActionType::Get), OutputVersion::V1);
        sig.oauth2_secured = true;
        let action = Action::new(ActionType::Get);
        let method = match compile_action(&ctx(OutputVersion::V1), &action, &sig).unwrap() {
            CompileOutcome::Method(m) => m,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(
            method.param(ParamKind::AuthorizationToken).map(|p| p.ty.clone()),
            Some(TypeRef::str_ref())
        );
        assert!(method.statements.iter().any(|s| matches!(
            s,
            Stmt::Expr(Expr::MethodCall { method, args, .. })
                if method == "header" && args.first() == Some(&Expr::str("Authorization"))
        )));
    }

    #[test]
    fn declared_type_without_entries_adds_no_param() {
        let action = Action::new(ActionType::Get);
        let mut sig = signature(&action, OutputVersion::V1);
        sig.query_param_type = Some(TypeRef::path("UsersGetQueryParam"));
        let method = match compile_action(&ctx(OutputVersion::V1), &action, &sig).unwrap() {
            CompileOutcome::Method(m) => m,
            other => panic!("unexpected {other:?}"),
        };
        assert!(method.param(ParamKind::QueryParameters).is_none());
    }

    #[test]
    fn description_becomes_doc() {
        let action = Action::new(ActionType::Get).with_description("Returns the list of all users");
        let method = compile(&action, OutputVersion::V1);
        assert_eq!(method.doc, vec!["Returns the list of all users".to_string()]);
    }
}
