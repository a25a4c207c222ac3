//! Payload encoding dispatch.
//!
//! Maps a body's [`MimeCategory`] to the statements that turn the `body`
//! parameter into an `Entity`. The match is exhaustive; unknown media types
//! are already classified as [`MimeCategory::Generic`] and tagged with
//! their literal media type.
//!
//! | Category | Payload |
//! |---|---|
//! | JSON | `Entity::json(&body)?` |
//! | Text | `Entity::text(body)` |
//! | Binary | `Entity::entity(body, MediaType::APPLICATION_OCTET_STREAM)` or the caller's `mime_type` |
//! | Multipart | `MultipartForm` with one guarded part per field (files by path, other fields by `ParamValue`), `Entity::multipart(form)` |
//! | URL-encoded | `FormParams` with one guarded pair per field, `Entity::form(form)` |
//! | Generic | `Entity::entity(body, "<media type>")` |

use indexmap::IndexMap;
use restgen_define::{MimeCategory, TypeFieldDefinition};

use crate::codegen::signature::BodyParam;
use crate::ir::{Expr, Stmt};
use crate::naming::unique_field_names;

/// Name of the generated body parameter.
pub const BODY: &str = "body";
/// Name of the generated caller media type parameter.
pub const MIME_TYPE: &str = "mime_type";
/// Local holding the encoded payload.
pub const PAYLOAD: &str = "payload";

const FORM: &str = "form";
const VALUE: &str = "value";

/// How one body category is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingRecipe<'a> {
    Json,
    Text,
    /// Raw bytes; `caller_mime_type` selects the `mime_type` parameter over
    /// octet-stream.
    Binary { caller_mime_type: bool },
    Multipart { fields: &'a IndexMap<String, TypeFieldDefinition> },
    FormUrlEncoded { fields: &'a IndexMap<String, TypeFieldDefinition> },
    Generic { media_type: &'a str },
}

impl<'a> EncodingRecipe<'a> {
    /// Selects the recipe for a body parameter.
    pub fn for_body(body: &'a BodyParam) -> Self {
        match body.category {
            MimeCategory::Json => Self::Json,
            MimeCategory::Text => Self::Text,
            MimeCategory::Binary => Self::Binary {
                caller_mime_type: body.caller_mime_type,
            },
            MimeCategory::Multipart => Self::Multipart {
                fields: &body.fields,
            },
            MimeCategory::FormUrlEncoded => Self::FormUrlEncoded {
                fields: &body.fields,
            },
            MimeCategory::Generic => Self::Generic {
                media_type: &body.media_type,
            },
        }
    }

    /// Statements that bind `payload` to `Some(entity)`.
    pub fn statements(&self) -> Vec<Stmt> {
        let body = || Expr::var(BODY);

        match self {
            Self::Json => vec![payload(Expr::call("Entity::json", vec![Expr::reference(body())]).try_())],
            Self::Text => vec![payload(Expr::call("Entity::text", vec![body()]))],
            Self::Binary { caller_mime_type } => {
                let media_type = if *caller_mime_type {
                    Expr::var(MIME_TYPE)
                } else {
                    Expr::constant("MediaType::APPLICATION_OCTET_STREAM")
                };
                vec![payload(Expr::call("Entity::entity", vec![body(), media_type]))]
            }
            Self::Multipart { fields } => {
                let mut statements = vec![Stmt::Let {
                    name: FORM.into(),
                    mutable: !fields.is_empty(),
                    value: Expr::call("MultipartForm::new", vec![]),
                }];
                let names = unique_field_names(fields.keys().map(String::as_str));
                statements.extend(fields.iter().zip(names).map(|((name, field), field_name)| {
                    let part = if field.is_file() {
                        Expr::var(FORM)
                            .method("file", vec![Expr::str(name), Expr::var(VALUE)])
                            .try_()
                    } else {
                        Expr::var(FORM).method(
                            "text",
                            vec![Expr::str(name), Expr::var(VALUE).method("param_value", vec![])],
                        )
                    };
                    guard(field_name, Stmt::assign(FORM, part))
                }));
                statements.push(payload(Expr::call("Entity::multipart", vec![Expr::var(FORM)])));
                statements
            }
            Self::FormUrlEncoded { fields } => {
                let mut statements = vec![Stmt::Let {
                    name: FORM.into(),
                    mutable: !fields.is_empty(),
                    value: Expr::call("FormParams::new", vec![]),
                }];
                let names = unique_field_names(fields.keys().map(String::as_str));
                statements.extend(fields.keys().zip(names).map(|(name, field_name)| {
                    guard(
                        field_name,
                        Stmt::Expr(Expr::var(FORM).method("add", vec![Expr::str(name), Expr::var(VALUE)])),
                    )
                }));
                statements.push(payload(Expr::call("Entity::form", vec![Expr::var(FORM)])));
                statements
            }
            Self::Generic { media_type } => vec![payload(Expr::call(
                "Entity::entity",
                vec![body(), Expr::str(*media_type)],
            ))],
        }
    }
}

/// Encoding statements for an optional body. No body means a null payload.
pub fn encode_payload(body: Option<&BodyParam>) -> Vec<Stmt> {
    match body {
        Some(body) => EncodingRecipe::for_body(body).statements(),
        None => vec![Stmt::let_(PAYLOAD, Expr::None)],
    }
}

fn payload(entity: Expr) -> Stmt {
    Stmt::let_(PAYLOAD, Expr::some(entity))
}

// if let Some(value) = &body.<field> { <append> }
fn guard(field_name: String, append: Stmt) -> Stmt {
    Stmt::IfSome {
        binding: VALUE.into(),
        value: Expr::var(BODY).field(field_name),
        body: vec![append],
    }
}
