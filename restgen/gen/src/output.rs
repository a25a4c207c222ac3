//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: compiling every
//! API into a shared [`CodeModel`], assembling the model's modules into Rust
//! files, validating and formatting them, and writing them to disk
//! atomically.
//!
//! ## Output Structure
//!
//! ```text
//! generated/src/
//! ├── lib.rs         # Module declarations
//! ├── shared.rs      # Request/response runtime and shared error types
//! ├── prelude.rs     # Re-exports of every client
//! └── simple_api.rs  # One module per API (or per `--module` override)
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use restgen_define::ApiModel;
use tracing::{debug, info};

use crate::code_model::{CodeModel, ModuleUnit};
use crate::codegen::module_docs::render_module_docs;
use crate::codegen::runtime::{SHARED_IMPORTS, generate_runtime};
use crate::compiler::{CompiledApi, compile_api};
use crate::context::ExceptionType;
use crate::errors::GeneratorError;
use crate::options::GeneratorOptions;

/// One formatted output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory.
    pub file_name: String,
    pub content: String,
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratedCrate {
    /// Per-API summaries, in input order.
    pub apis: Vec<CompiledApi>,
    /// `lib.rs`, `shared.rs`, `prelude.rs`, then one file per module.
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCrate {
    /// Returns the content of `file_name`, if it was generated.
    pub fn file(&self, file_name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.file_name == file_name)
            .map(|f| f.content.as_str())
    }

    /// Warnings of every API, in order.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.apis.iter().flat_map(|api| api.warnings.iter().map(String::as_str))
    }
}

/// Assembles the shared module (`shared.rs`).
pub fn assemble_shared_module() -> TokenStream {
    generate_runtime()
}

/// Assembles one API module from its code model unit.
///
/// The module contains its documentation, the shared runtime imports, the
/// per-API types (error and envelope) and then every other item in
/// emission order.
pub fn assemble_api_module(unit: &ModuleUnit) -> TokenStream {
    let docs = render_module_docs(&unit.docs);
    let imports = SHARED_IMPORTS.iter().map(|name| format_ident!("{}", name));
    let types = &unit.types;
    let items = &unit.items;

    quote! {
        #docs

        #[allow(unused_imports)]
        use crate::shared::{#(#imports),*};

        #(#types)*

        #(#items)*
    }
}

/// Assembles `lib.rs` for the given API modules.
pub fn assemble_lib_rs(modules: &[&str]) -> TokenStream {
    let module_decls = modules.iter().map(|module| {
        let module = format_ident!("{}", module);
        quote! { pub mod #module; }
    });

    quote! {
        //! Generated REST API clients.
        //!
        //! Each API lives in its own module with a root client, one struct
        //! per resource and the parameter structs its methods take.
        //!
        //! ```ignore
        //! use generated::prelude::*;
        //! ```

        pub mod shared;

        pub mod prelude;

        #(#module_decls)*
    }
}

/// Assembles `prelude.rs`: shared types plus each API's client, error and
/// envelope types. A name already re-exported is skipped.
pub fn assemble_prelude(apis: &[CompiledApi]) -> TokenStream {
    let mut exported: BTreeSet<String> = ["ClientError", ExceptionType::GENERIC_NAME]
        .into_iter()
        .map(String::from)
        .collect();

    let reexports: Vec<_> = apis
        .iter()
        .filter_map(|api| {
            let candidates = std::iter::once(api.client_name.as_str())
                .chain(match &api.exception {
                    ExceptionType::Synthesized { name, .. } => Some(name.as_str()),
                    ExceptionType::Generic => None,
                })
                .chain(api.wrapper.as_ref().map(|w| w.name.as_str()));

            let names: Vec<_> = candidates
                .filter(|name| exported.insert(name.to_string()))
                .map(|name| format_ident!("{}", name))
                .collect();
            if names.is_empty() {
                return None;
            }
            let module = format_ident!("{}", api.module);
            Some(quote! { pub use crate::#module::{#(#names),*}; })
        })
        .collect();

    quote! {
        //! Convenient re-exports for working with generated API clients.

        pub use crate::shared::{ClientError, StatusError};

        #(#reexports)*
    }
}

/// Validates generated code using syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease, prepending an auto-generated
/// notice as a regular comment.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by restgen. Do not edit manually.\n\n{}",
        formatted
    )
}

fn render_file(file_name: impl Into<String>, tokens: &TokenStream) -> Result<GeneratedFile, GeneratorError> {
    let file_name = file_name.into();
    let file = validate_code(tokens).map_err(|e| match e {
        GeneratorError::CodeGenError(msg) => GeneratorError::CodeGenError(format!("{file_name}: {msg}")),
        other => other,
    })?;
    Ok(GeneratedFile {
        file_name,
        content: format_code(&file),
    })
}

/// Writes content to a file atomically using temp file + rename.
///
/// Parent directories are created as needed. Readers see either the old or
/// the new content, never a partial write.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Compiles `apis` in order into one code model and renders every file.
///
/// ## Errors
///
/// - `GeneratorError::ConfigError` if `apis` is empty
/// - any error raised while compiling an API (the run stops at the first)
/// - `GeneratorError::CodeGenError` if an assembled file is not valid Rust
pub fn generate_files(
    apis: &[ApiModel],
    options: &GeneratorOptions,
) -> Result<GeneratedCrate, GeneratorError> {
    if apis.is_empty() {
        return Err(GeneratorError::ConfigError(
            "no API definitions given".to_string(),
        ));
    }

    let mut model = CodeModel::new();
    let compiled = apis
        .iter()
        .map(|api| compile_api(api, options, &mut model))
        .collect::<Result<Vec<_>, _>>()?;

    let modules: Vec<&str> = model.modules().map(|(name, _)| name).collect();

    let mut files = vec![
        render_file("lib.rs", &assemble_lib_rs(&modules))?,
        render_file("shared.rs", &assemble_shared_module())?,
        render_file("prelude.rs", &assemble_prelude(&compiled))?,
    ];
    for (module, unit) in model.modules() {
        debug!(module, types = unit.types.len(), items = unit.items.len(), "assembling module");
        files.push(render_file(format!("{module}.rs"), &assemble_api_module(unit))?);
    }

    Ok(GeneratedCrate {
        apis: compiled,
        files,
    })
}

/// Generates code for several APIs and writes it to `output_dir`.
///
/// In dry-run mode the files are printed to stdout instead.
///
/// ## Errors
///
/// Returns an error if generation fails, if the parent of `output_dir`
/// does not exist (`GeneratorError::OutputDirNotFound`) or if writing fails.
pub fn generate_and_write_all(
    apis: &[ApiModel],
    options: &GeneratorOptions,
    output_dir: &Path,
) -> Result<GeneratedCrate, GeneratorError> {
    let generated = generate_files(apis, options)?;

    if options.dry_run {
        for file in &generated.files {
            println!("=== {} ===\n{}\n", file.file_name, file.content);
        }
        return Ok(generated);
    }

    if let Some(parent) = output_dir.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return Err(GeneratorError::OutputDirNotFound(parent.display().to_string()));
    }

    for file in &generated.files {
        write_atomic(&output_dir.join(&file.file_name), &file.content)?;
    }
    info!(
        files = generated.files.len(),
        dir = %output_dir.display(),
        "wrote generated sources"
    );

    Ok(generated)
}

/// Generates code for one API and writes it to `output_dir`.
///
/// Returns the formatted API module.
///
/// ## Errors
///
/// See [`generate_and_write_all`].
pub fn generate_and_write(
    api: &ApiModel,
    options: &GeneratorOptions,
    output_dir: &Path,
) -> Result<String, GeneratorError> {
    let generated = generate_and_write_all(std::slice::from_ref(api), options, output_dir)?;
    let module_file = generated
        .apis
        .first()
        .map(|api| format!("{}.rs", api.module))
        .unwrap_or_default();
    Ok(generated.file(&module_file).unwrap_or_default().to_string())
}
