//! Whole-API compilation.
//!
//! [`compile_api`] drives the per-action compiler over every resource of
//! one API and emits the results into a [`CodeModel`]:
//!
//! 1. establish the [`ApiContext`] (error type, then envelope type)
//! 2. record the module documentation
//! 3. compile each resource depth-first into a resource struct, defining
//!    the query, header and form body structs its methods need
//! 4. emit the root `{Title}Client` with accessors for top-level resources
//!
//! Several APIs may be compiled into the same model, and into the same
//! module. Structs are named uniquely per module; per-API error and
//! envelope types follow the collision rules of their synthesizers.

use restgen_define::{Action, ApiModel, Resource};
use tracing::{debug, info};

use crate::code_model::{CodeModel, CodeModelError};
use crate::codegen::action::{CompileOutcome, compile_action};
use crate::codegen::model_structs::generate_param_struct;
use crate::codegen::module_docs::ModuleDocBuilder;
use crate::codegen::resource_struct::{
    ChildAccessor, generate_resource_struct, generate_root_client, uri_template,
};
use crate::codegen::signature::{
    ActionSignature, header_type_name, query_param_type_name, resolve_signatures,
};
use crate::context::{ApiContext, ExceptionType, WrapperType};
use crate::errors::GeneratorError;
use crate::ir::GeneratedMethod;
use crate::naming::{field_name, module_name, resource_type_name, type_name};
use crate::options::GeneratorOptions;

/// Methods every resource struct defines besides its compiled actions.
const RESERVED_METHODS: &[&str] = &["new", "new_target", "base_uri", "with_client"];

/// Summary of one compiled API.
#[derive(Debug, Clone)]
pub struct CompiledApi {
    pub title: String,
    /// Module the API was emitted into.
    pub module: String,
    /// Name of the root client struct.
    pub client_name: String,
    /// Number of generated action methods across all resources.
    pub method_count: usize,
    /// Non-fatal warnings, in the order they were raised.
    pub warnings: Vec<String>,
    pub exception: ExceptionType,
    pub wrapper: Option<WrapperType>,
}

/// Compiles every action of `api` into `model`.
///
/// ## Errors
///
/// - [`GeneratorError::TypeAlreadyExists`] if the envelope type or a
///   parameter struct name is already taken
/// - [`GeneratorError::MissingWrapperType`] if envelope output was requested
///   but no envelope type could be established
pub fn compile_api(
    api: &ApiModel,
    options: &GeneratorOptions,
    model: &mut CodeModel,
) -> Result<CompiledApi, GeneratorError> {
    let module = module_name(options.module_path.as_deref().unwrap_or(&api.title));

    let mut ctx = ApiContext::establish(api, &module, options.output_version, model)?;

    model.add_docs(
        &module,
        ModuleDocBuilder::new(api, options.output_version).sections(),
    );

    let client_base = model.claim_unique(&module, &type_name(&api.title), "Client");
    let client_name = format!("{client_base}Client");

    let mut compiler = ResourceCompiler {
        api,
        ctx: &mut ctx,
        model: &mut *model,
        method_count: 0,
    };
    let accessors = compiler.compile_children(&api.resources, "", RESERVED_METHODS)?;
    let method_count = compiler.method_count;

    model.add_item(
        &module,
        generate_root_client(&client_name, &api.title, &api.base_uri, &accessors),
    );

    info!(
        api = %api.title,
        module = %module,
        methods = method_count,
        warnings = ctx.warnings().len(),
        "compiled API"
    );

    Ok(CompiledApi {
        title: api.title.clone(),
        module,
        client_name,
        method_count,
        warnings: ctx.warnings().to_vec(),
        exception: ctx.exception().clone(),
        wrapper: ctx.wrapper().cloned(),
    })
}

struct ResourceCompiler<'a> {
    api: &'a ApiModel,
    ctx: &'a mut ApiContext,
    model: &'a mut CodeModel,
    method_count: usize,
}

impl ResourceCompiler<'_> {
    /// Compiles `resources` and returns the accessors their parent exposes.
    /// Accessor names avoid `taken` and each other.
    fn compile_children(
        &mut self,
        resources: &[Resource],
        parent_uri: &str,
        taken: &[&str],
    ) -> Result<Vec<ChildAccessor>, GeneratorError> {
        let mut used: Vec<String> = taken.iter().map(|name| name.to_string()).collect();
        let mut accessors = Vec::with_capacity(resources.len());

        for resource in resources {
            let struct_name = self.compile_resource(resource, parent_uri)?;
            let method_name = unique_accessor_name(&resource.relative_uri, &used);
            used.push(method_name.clone());
            accessors.push(ChildAccessor {
                method_name,
                struct_name,
                uri_params: uri_template(&resource.relative_uri).1,
            });
        }

        Ok(accessors)
    }

    /// Compiles one resource and its subtree; returns its struct name.
    fn compile_resource(
        &mut self,
        resource: &Resource,
        parent_uri: &str,
    ) -> Result<String, GeneratorError> {
        let module = self.ctx.module().to_string();
        let full_uri = format!("{parent_uri}{}", resource.relative_uri);
        let base = self.model.claim_unique(
            &module,
            &resource_type_name(resource.display_name.as_deref(), &resource.relative_uri),
            "Resource",
        );
        let struct_name = format!("{base}Resource");

        let mut methods = Vec::new();
        for action in &resource.actions {
            methods.extend(self.compile_actions(resource, &base, &full_uri, action)?);
        }
        self.method_count += methods.len();

        let mut taken: Vec<&str> = RESERVED_METHODS.to_vec();
        taken.extend(methods.iter().map(|m| m.name.as_str()));
        let children = self.compile_children(&resource.resources, &full_uri, &taken)?;

        self.model.add_item(
            &module,
            generate_resource_struct(
                &struct_name,
                &resource.relative_uri,
                &full_uri,
                &children,
                &methods,
            ),
        );

        Ok(struct_name)
    }

    /// Compiles every signature of one action. A skipped action records
    /// one warning and yields no methods.
    fn compile_actions(
        &mut self,
        resource: &Resource,
        base: &str,
        full_uri: &str,
        action: &Action,
    ) -> Result<Vec<GeneratedMethod>, GeneratorError> {
        let signatures = resolve_signatures(
            self.api,
            resource,
            base,
            action,
            self.ctx.output_version(),
        );

        let mut methods = Vec::with_capacity(signatures.len());
        for signature in &signatures {
            match compile_action(&*self.ctx, action, signature)? {
                CompileOutcome::Method(method) => methods.push(method),
                CompileOutcome::Skipped { warning } => {
                    self.ctx.record_warning(warning);
                    return Ok(Vec::new());
                }
            }
        }

        self.define_models(base, full_uri, action, &signatures)?;
        debug!(
            uri = %full_uri,
            verb = %action.action_type,
            methods = methods.len(),
            "compiled action"
        );
        Ok(methods)
    }

    /// Defines the query, header and body structs referenced by the
    /// compiled signatures.
    fn define_models(
        &mut self,
        base: &str,
        full_uri: &str,
        action: &Action,
        signatures: &[ActionSignature],
    ) -> Result<(), GeneratorError> {
        let verb = action.action_type;
        let target = format!("`{verb} {full_uri}`");

        if !action.query_parameters.is_empty() {
            let name = query_param_type_name(base, verb);
            let doc = format!("Query parameters of {target}.");
            self.define(&name, generate_param_struct(&name, &doc, &action.query_parameters))?;
        }
        if !action.headers.is_empty() {
            let name = header_type_name(base, verb);
            let doc = format!("Headers of {target}.");
            self.define(&name, generate_param_struct(&name, &doc, &action.headers))?;
        }
        for body in signatures.iter().filter_map(|s| s.body.as_ref()) {
            if let Some(name) = &body.model_name {
                let doc = format!("`{}` body of {target}.", body.media_type);
                self.define(name, generate_param_struct(name, &doc, &body.fields))?;
            }
        }
        Ok(())
    }

    fn define(&mut self, name: &str, tokens: proc_macro2::TokenStream) -> Result<(), GeneratorError> {
        self.model
            .define_item(self.ctx.module(), name, tokens)
            .map(|_| ())
            .map_err(|CodeModelError::TypeAlreadyDefined { type_name }| {
                GeneratorError::TypeAlreadyExists { type_name }
            })
    }
}

/// Accessor method name for a child resource, suffixed with `_resource`
/// (and then a counter) when the plain name is taken.
fn unique_accessor_name(relative_uri: &str, used: &[String]) -> String {
    let base = field_name(relative_uri);
    let is_free = |name: &str| !used.iter().any(|u| u == name);

    if is_free(&base) {
        return base;
    }
    let suffixed = format!("{base}_resource");
    if is_free(&suffixed) {
        return suffixed;
    }
    (2..)
        .map(|n| format!("{suffixed}{n}"))
        .find(|name| is_free(name))
        .unwrap_or(suffixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OutputVersion;
    use crate::test_utils::{format_items, make_files_api, make_users_api};
    use restgen_define::{ActionType, BodyVariant, TypeFieldDefinition};
    use tracing_test::traced_test;

    fn module_code(model: &CodeModel, module: &str) -> String {
        let unit = model.module(module).unwrap();
        let types = &unit.types;
        let items = &unit.items;
        format_items(&quote::quote! { #(#types)* #(#items)* })
    }

    #[test]
    fn users_api_compiles_into_its_module() {
        let mut model = CodeModel::new();
        let compiled = compile_api(&make_users_api(), &GeneratorOptions::default(), &mut model).unwrap();

        assert_eq!(compiled.module, "foo");
        assert_eq!(compiled.client_name, "FooClient");
        assert_eq!(compiled.method_count, 1);
        assert!(compiled.warnings.is_empty());

        let code = module_code(&model, "foo");
        assert!(code.contains("pub struct FooException"));
        assert!(code.contains("pub struct UsersResource"));
        assert!(code.contains("pub fn users(&self) -> UsersResource"));
        assert!(code.contains("pub fn get(&self) -> Result<Vec<UserDto>, ClientError<FooException>>"));
    }

    #[test]
    fn files_api_defines_header_struct() {
        let mut model = CodeModel::new();
        compile_api(&make_files_api(), &GeneratorOptions::default(), &mut model).unwrap();

        let code = module_code(&model, "foo");
        assert!(code.contains("pub struct FileNamePutHeader"));
        assert!(code.contains("pub fn file_name(&self, file_name: &str) -> FileNameResource"));
        assert!(code.contains("mime_type: &str"));
        assert!(model.is_defined("crate::foo::FileNamePutHeader"));
    }

    #[test]
    fn module_override_is_sanitized() {
        let mut model = CodeModel::new();
        let options = GeneratorOptions::default().with_module_path("Users API");
        let compiled = compile_api(&make_users_api(), &options, &mut model).unwrap();
        assert_eq!(compiled.module, "users_api");
        assert!(model.module("users_api").is_some());
    }

    #[test]
    fn form_bodies_define_body_structs() {
        let api = ApiModel::new("Forms", "https://x").with_resource(
            Resource::new("/upload").with_action(
                Action::new(ActionType::Post)
                    .with_body(
                        BodyVariant::new("multipart/form-data")
                            .with_field("file", TypeFieldDefinition::file())
                            .with_field("name", TypeFieldDefinition::string()),
                    )
                    .with_body(
                        BodyVariant::new("application/x-www-form-urlencoded")
                            .with_field("name", TypeFieldDefinition::string()),
                    ),
            ),
        );
        let mut model = CodeModel::new();
        let compiled = compile_api(&api, &GeneratorOptions::default(), &mut model).unwrap();

        assert_eq!(compiled.method_count, 2);
        let code = module_code(&model, "forms");
        assert!(code.contains("pub struct UploadPostBody"));
        assert!(code.contains("pub struct UploadPostFormUrlEncodedBody"));
        assert!(code.contains("pub fn post_form_url_encoded("));
    }

    #[test]
    #[traced_test]
    fn patch_records_one_warning() {
        let api = ApiModel::new("Foo", "https://x").with_resource(
            Resource::new("/users").with_action(
                Action::new(ActionType::Patch)
                    .with_body(BodyVariant::json("UserDto"))
                    .with_body(BodyVariant::new("text/plain")),
            ),
        );
        let mut model = CodeModel::new();
        let compiled = compile_api(&api, &GeneratorOptions::new(OutputVersion::V2), &mut model).unwrap();

        assert_eq!(compiled.method_count, 0);
        assert_eq!(compiled.warnings.len(), 1);
        assert!(compiled.wrapper.is_none());
        assert!(logs_contain("PATCH is not supported"));
    }

    #[test]
    fn sibling_resources_get_unique_names() {
        let api = ApiModel::new("Foo", "https://x")
            .with_resource(Resource::new("/a").with_child(Resource::new("/{id}")))
            .with_resource(Resource::new("/b").with_child(Resource::new("/{id}")));
        let mut model = CodeModel::new();
        compile_api(&api, &GeneratorOptions::default(), &mut model).unwrap();

        let code = module_code(&model, "foo");
        assert!(code.contains("pub struct IdResource"));
        assert!(code.contains("pub struct Id2Resource"));
    }

    #[test]
    fn accessor_names_avoid_reserved_methods() {
        let used: Vec<String> = RESERVED_METHODS.iter().map(|s| s.to_string()).collect();
        assert_eq!(unique_accessor_name("/users", &used), "users");
        assert_eq!(unique_accessor_name("/new", &used), "new_resource");

        let mut used = used;
        used.push("get".into());
        used.push("get_resource".into());
        assert_eq!(unique_accessor_name("/get", &used), "get_resource2");
    }

    #[test]
    fn two_apis_share_one_module() {
        let mut model = CodeModel::new();
        let options = GeneratorOptions::default().with_module_path("shared_clients");
        let first = compile_api(&make_users_api(), &options, &mut model).unwrap();
        let second = compile_api(&make_files_api(), &options, &mut model).unwrap();

        assert_eq!(first.client_name, "FooClient");
        assert_eq!(second.client_name, "Foo2Client");
        assert!(first.exception.supports_details());
        assert_eq!(second.exception, ExceptionType::Generic);
    }
}
