//! Name collision handling for the per-API error and envelope types.

use restgen_define::{Action, ActionResponse, ActionType, ApiModel, Resource, TypeDecl};
use restgen_gen::code_model::CodeModel;
use restgen_gen::compiler::compile_api;
use restgen_gen::context::ExceptionType;
use restgen_gen::errors::GeneratorError;
use restgen_gen::options::{GeneratorOptions, OutputVersion};
use restgen_gen::output::generate_files;

fn simple_api() -> ApiModel {
    ApiModel::new("Simple API", "https://simple.example.com").with_resource(
        Resource::new("/items").with_action(
            Action::new(ActionType::Get).with_response(ActionResponse::ok(TypeDecl::String)),
        ),
    )
}

#[test]
fn taken_exception_name_falls_back_to_status_error() {
    let mut model = CodeModel::new();
    assert!(model.reserve("crate::simple_api::SimpleApiException"));

    let compiled = compile_api(&simple_api(), &GeneratorOptions::default(), &mut model).unwrap();
    assert_eq!(compiled.exception, ExceptionType::Generic);
    assert_eq!(compiled.method_count, 1);
}

#[test]
fn fallback_methods_raise_status_error_even_in_v2() {
    let options = GeneratorOptions::new(OutputVersion::V2).with_module_path("apis");
    let other = ApiModel::new("Simple API", "https://other.example.com").with_resource(
        Resource::new("/other").with_action(Action::new(ActionType::Delete)),
    );

    let mut model = CodeModel::new();
    let first = compile_api(&simple_api(), &options, &mut model).unwrap();
    assert!(first.exception.supports_details());

    // Same title, same module: the envelope type name is taken too.
    let err = compile_api(&other, &options, &mut model).unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::TypeAlreadyExists { ref type_name } if type_name == "crate::apis::SimpleApiResponse"
    ));
}

#[test]
fn fallback_in_v1_compiles_with_two_argument_errors() {
    let options = GeneratorOptions::default().with_module_path("apis");
    let other = ApiModel::new("Simple API", "https://other.example.com").with_resource(
        Resource::new("/other").with_action(Action::new(ActionType::Delete)),
    );

    let generated = generate_files(&[simple_api(), other], &options).unwrap();
    assert_eq!(generated.apis[1].exception, ExceptionType::Generic);
    assert_eq!(generated.apis[1].client_name, "SimpleApi2Client");

    let code: String = generated
        .file("apis.rs")
        .unwrap()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    assert!(code.contains("Result<(),ClientError<StatusError>>"));
    assert!(code.contains("StatusError::new(status_info.status_code(),status_info.reason_phrase()"));
    assert_eq!(code.matches("pubstructSimpleApiException").count(), 1);
}

#[test]
fn taken_envelope_name_aborts_the_api() {
    let mut model = CodeModel::new();
    assert!(model.reserve("crate::simple_api::SimpleApiResponse"));

    let err = compile_api(&simple_api(), &GeneratorOptions::new(OutputVersion::V2), &mut model)
        .unwrap_err();
    assert!(matches!(err, GeneratorError::TypeAlreadyExists { .. }));
    assert!(err.to_string().contains("SimpleApiResponse"));

    // Nothing beyond the error type was emitted for the aborted API.
    let unit = model.module("simple_api").unwrap();
    assert_eq!(unit.types.len(), 1);
    assert!(unit.items.is_empty());
}

#[test]
fn taken_envelope_name_is_irrelevant_for_v1() {
    let mut model = CodeModel::new();
    assert!(model.reserve("crate::simple_api::SimpleApiResponse"));

    let compiled = compile_api(&simple_api(), &GeneratorOptions::default(), &mut model).unwrap();
    assert!(compiled.wrapper.is_none());
}

#[test]
fn generation_stops_at_the_first_fatal_collision() {
    let options = GeneratorOptions::new(OutputVersion::V2).with_module_path("apis");
    let err = generate_files(&[simple_api(), simple_api()], &options).unwrap_err();
    assert!(matches!(err, GeneratorError::TypeAlreadyExists { .. }));
}
