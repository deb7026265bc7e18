//! Error taxonomy for a generation run.
//!
//! Configuration and resolution errors are terminal. Schema shapes the mapper
//! cannot classify are not errors; they surface as [`crate::Diagnostic`]s.

use thiserror::Error;

/// Errors surfaced to callers of the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested runtime is not one of the supported backends.
    #[error("Invalid runtime '{value}'. Expected one of: {expected}")]
    UnknownRuntime { value: String, expected: String },

    /// The output path cannot be written to.
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// The input text is not a readable OpenAPI document.
    #[error("Failed to parse OpenAPI document: {0}")]
    Document(String),

    /// A type reference points at a schema that was never defined.
    #[error("Dangling reference to '{key}'")]
    DanglingReference { key: String },
}

impl Error {
    /// Whether the error was raised while validating configuration, before
    /// any mapping work started.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownRuntime { .. } | Error::InvalidOutputPath(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
