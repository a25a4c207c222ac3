//! Error types for the restgen compiler.

use thiserror::Error;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to parse API definition
    #[error("Failed to parse API definition: {0}")]
    ParseError(String),

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to read an input file
    #[error("Failed to read input file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Output directory does not exist
    #[error("Output directory does not exist: {0}")]
    OutputDirNotFound(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A per-API type could not be defined because its name is taken.
    ///
    /// Raised for the response envelope type. Generation for the whole API
    /// stops; nothing further is emitted for it.
    #[error("Type '{type_name}' already exists in the code model")]
    TypeAlreadyExists {
        /// Fully qualified name of the existing type.
        type_name: String,
    },

    /// An enveloped method was requested but the API has no envelope type.
    #[error("API '{api}' has no response envelope type; it must be established before compiling v2 actions")]
    MissingWrapperType {
        /// Title of the API being compiled.
        api: String,
    },
}
