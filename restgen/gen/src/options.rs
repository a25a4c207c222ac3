//! Generator configuration.
//!
//! [`OutputVersion`] selects the shape of generated methods: raw decoded
//! entities (v1) or an envelope bundling body, headers and raw response (v2).
//! Versions are totally ordered so later versions keep every capability of
//! earlier ones.

use clap::ValueEnum;
use strum::{Display, EnumIter, EnumString};

/// Shape of the generated methods.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use restgen_gen::options::OutputVersion;
///
/// assert!(OutputVersion::V2 > OutputVersion::V1);
/// assert!(OutputVersion::V2.supports_envelope());
/// assert!(!OutputVersion::V1.supports_envelope());
/// assert_eq!(OutputVersion::from_str("v2").unwrap(), OutputVersion::V2);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    ValueEnum,
)]
#[strum(serialize_all = "lowercase")]
pub enum OutputVersion {
    /// Methods return the decoded entity and raise `(status, reason)` errors.
    #[default]
    V1,
    /// Methods return the envelope type and raise errors carrying headers and
    /// the raw response.
    V2,
}

impl OutputVersion {
    /// Returns true when methods return the envelope type.
    pub fn supports_envelope(self) -> bool {
        self >= OutputVersion::V2
    }
}

/// Options for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Output shape for every action of the API.
    pub output_version: OutputVersion,
    /// Module name override; derived from the API title when `None`.
    pub module_path: Option<String>,
    /// Print generated code instead of writing files.
    pub dry_run: bool,
}

impl GeneratorOptions {
    /// Creates options for the given output version.
    pub fn new(output_version: OutputVersion) -> Self {
        Self {
            output_version,
            ..Self::default()
        }
    }

    /// Sets the module name override.
    pub fn with_module_path(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = Some(module_path.into());
        self
    }
}
