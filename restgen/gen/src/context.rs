//! Per-API compilation context.
//!
//! An [`ApiContext`] is built once per API by [`ApiContext::establish`],
//! before any action of that API is compiled. It owns the outcome of the
//! two type synthesizers and is passed by reference into every
//! [`compile_action`](crate::codegen::action::compile_action) call, so
//! unrelated APIs never share state.

use restgen_define::{ActionType, ApiModel, Resource};
use tracing::warn;

use crate::code_model::CodeModel;
use crate::codegen::exception::synthesize_exception_type;
use crate::codegen::wrapper::synthesize_wrapper_type;
use crate::errors::GeneratorError;
use crate::ir::TypeRef;
use crate::options::OutputVersion;

/// Error type raised by the methods of one API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExceptionType {
    /// The per-API type, with both constructors available.
    Synthesized {
        /// Local type name.
        name: String,
        /// Fully qualified path in the code model.
        path: String,
    },
    /// The shared `StatusError`, used after a name collision. Only the
    /// `(status, reason)` constructor exists.
    Generic,
}

impl ExceptionType {
    /// Name of the generic fallback type in the shared module.
    pub const GENERIC_NAME: &'static str = "StatusError";

    /// Type used in generated signatures.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::path(self.name())
    }

    /// Local type name.
    pub fn name(&self) -> &str {
        match self {
            Self::Synthesized { name, .. } => name,
            Self::Generic => Self::GENERIC_NAME,
        }
    }

    /// Returns true when the 4-argument constructor is available.
    pub fn supports_details(&self) -> bool {
        matches!(self, Self::Synthesized { .. })
    }
}

/// The per-API response envelope type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperType {
    pub name: String,
    pub path: String,
}

impl WrapperType {
    /// `Name<body>`
    pub fn wrap(&self, body: TypeRef) -> TypeRef {
        TypeRef::generic(self.name.clone(), vec![body])
    }
}

/// Everything compiled actions of one API read but never change.
#[derive(Debug, Clone)]
pub struct ApiContext {
    title: String,
    module: String,
    output_version: OutputVersion,
    exception: ExceptionType,
    wrapper: Option<WrapperType>,
    warnings: Vec<String>,
}

impl ApiContext {
    /// Synthesizes the API's error type, then its envelope type when the
    /// output version needs one.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::TypeAlreadyExists`] if the envelope type
    /// name is taken. An error type collision is not an error; the context
    /// falls back to [`ExceptionType::Generic`].
    pub fn establish(
        api: &ApiModel,
        module: &str,
        output_version: OutputVersion,
        model: &mut CodeModel,
    ) -> Result<Self, GeneratorError> {
        let exception = synthesize_exception_type(&api.title, module, model);

        let wrapper = if output_version.supports_envelope() && has_compilable_actions(&api.resources)
        {
            Some(synthesize_wrapper_type(&api.title, module, model)?)
        } else {
            None
        };

        Ok(Self {
            title: api.title.clone(),
            module: module.to_string(),
            output_version,
            exception,
            wrapper,
            warnings: Vec::new(),
        })
    }

    /// Builds a context from already established types.
    pub fn from_parts(
        title: impl Into<String>,
        module: impl Into<String>,
        output_version: OutputVersion,
        exception: ExceptionType,
        wrapper: Option<WrapperType>,
    ) -> Self {
        Self {
            title: title.into(),
            module: module.into(),
            output_version,
            exception,
            wrapper,
            warnings: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Module the API is emitted into.
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn output_version(&self) -> OutputVersion {
        self.output_version
    }

    pub fn exception(&self) -> &ExceptionType {
        &self.exception
    }

    pub fn wrapper(&self) -> Option<&WrapperType> {
        self.wrapper.as_ref()
    }

    /// Records a non-fatal compilation warning and logs it.
    pub fn record_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        warn!(api = %self.title, "{warning}");
        self.warnings.push(warning);
    }

    /// Warnings recorded so far, in order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

// PATCH actions are skipped, so they never need an envelope.
fn has_compilable_actions(resources: &[Resource]) -> bool {
    resources.iter().any(|resource| {
        resource
            .actions
            .iter()
            .any(|action| action.action_type != ActionType::Patch)
            || has_compilable_actions(&resource.resources)
    })
}
