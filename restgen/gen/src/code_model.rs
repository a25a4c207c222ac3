//! In-memory emission backend.
//!
//! Compilation never writes files directly. Every type definition and
//! resource unit is handed to a [`CodeModel`], which remembers which
//! fully qualified names are taken and collects the tokens per module.
//! [`crate::output`] later assembles the modules into files.

use indexmap::{IndexMap, IndexSet};
use proc_macro2::TokenStream;
use thiserror::Error;

/// Errors raised by the code model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeModelError {
    /// The fully qualified name is already registered.
    #[error("type '{type_name}' is already defined")]
    TypeAlreadyDefined { type_name: String },
}

/// Items emitted into one generated module.
#[derive(Debug, Default)]
pub struct ModuleUnit {
    /// Module doc lines.
    pub docs: Vec<String>,
    /// Per-API singleton types (exception, envelope), in definition order.
    pub types: Vec<TokenStream>,
    /// Everything else: model structs, resources, root clients.
    pub items: Vec<TokenStream>,
}

/// Collects generated definitions across one run.
///
/// ## Examples
///
/// ```
/// use quote::quote;
/// use restgen_gen::code_model::CodeModel;
///
/// let mut model = CodeModel::new();
/// let path = model.define_type("simple_api", "Thing", quote! { pub struct Thing; }).unwrap();
/// assert_eq!(path, "crate::simple_api::Thing");
/// assert!(model.define_type("simple_api", "Thing", quote! {}).is_err());
/// ```
#[derive(Debug, Default)]
pub struct CodeModel {
    defined: IndexSet<String>,
    modules: IndexMap<String, ModuleUnit>,
}

impl CodeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully qualified path of `name` inside `module`.
    pub fn qualified(module: &str, name: &str) -> String {
        format!("crate::{module}::{name}")
    }

    /// Claims a fully qualified name without emitting anything, e.g. for a
    /// hand-written type. Returns false if the name was already taken.
    pub fn reserve(&mut self, qualified: impl Into<String>) -> bool {
        self.defined.insert(qualified.into())
    }

    /// Returns true if the fully qualified name is taken.
    pub fn is_defined(&self, qualified: &str) -> bool {
        self.defined.contains(qualified)
    }

    /// Registers a per-API type and stores its definition.
    ///
    /// Returns the fully qualified path on success.
    ///
    /// ## Errors
    ///
    /// Returns [`CodeModelError::TypeAlreadyDefined`] if the name is taken;
    /// nothing is stored in that case.
    pub fn define_type(
        &mut self,
        module: &str,
        name: &str,
        tokens: TokenStream,
    ) -> Result<String, CodeModelError> {
        let qualified = Self::qualified(module, name);
        if !self.defined.insert(qualified.clone()) {
            return Err(CodeModelError::TypeAlreadyDefined {
                type_name: qualified,
            });
        }
        self.module_mut(module).types.push(tokens);
        Ok(qualified)
    }

    /// Like [`define_type`](Self::define_type) but stores the tokens with the
    /// module's regular items.
    pub fn define_item(
        &mut self,
        module: &str,
        name: &str,
        tokens: TokenStream,
    ) -> Result<String, CodeModelError> {
        let qualified = Self::qualified(module, name);
        if !self.defined.insert(qualified.clone()) {
            return Err(CodeModelError::TypeAlreadyDefined {
                type_name: qualified,
            });
        }
        self.module_mut(module).items.push(tokens);
        Ok(qualified)
    }

    /// Claims `{base}{suffix}` in `module`, appending a counter to `base`
    /// until the name is free. Returns the base actually used.
    pub fn claim_unique(&mut self, module: &str, base: &str, suffix: &str) -> String {
        let mut candidate = base.to_string();
        let mut counter = 2;
        while !self.reserve(Self::qualified(module, &format!("{candidate}{suffix}"))) {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        candidate
    }

    /// Stores an item whose name was claimed earlier.
    pub fn add_item(&mut self, module: &str, tokens: TokenStream) {
        self.module_mut(module).items.push(tokens);
    }

    /// Appends module doc lines.
    pub fn add_docs(&mut self, module: &str, docs: impl IntoIterator<Item = String>) {
        self.module_mut(module).docs.extend(docs);
    }

    /// Returns the unit for `module`, if anything was emitted into it.
    pub fn module(&self, module: &str) -> Option<&ModuleUnit> {
        self.modules.get(module)
    }

    /// Iterates modules in first-emission order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &ModuleUnit)> {
        self.modules.iter().map(|(name, unit)| (name.as_str(), unit))
    }

    fn module_mut(&mut self, module: &str) -> &mut ModuleUnit {
        self.modules.entry(module.to_string()).or_default()
    }
}
