//! Error types for the probe binary.
//!
//! Wraps I/O, document decoding, validation, and parse failures, and maps
//! each to a process exit status.

use command_args_core::ValidationError;
use command_args_parser::{FailureKind, ParseFailure};
use thiserror::Error;

/// Errors that can occur while running a probe command.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A specification document failed validation.
    #[error("invalid specification '{path}': {source}")]
    InvalidSpec {
        path: String,
        source: ValidationError,
    },

    /// The arguments did not parse against the specification.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

impl CliError {
    /// Exit status reported to the shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::IoError(_) | CliError::JsonError(_) | CliError::YamlError(_) => 1,
            CliError::InvalidSpec { .. } => 3,
            CliError::Parse(failure) => match failure.kind {
                FailureKind::InvalidSpecification | FailureKind::AmbiguousSubcommand => 3,
                _ => 2,
            },
        }
    }
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
