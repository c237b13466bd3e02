//! CLI error types

use pipeweld_sdk::SdkError;
use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line or config value
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },

    /// Compilation error
    #[error(transparent)]
    Sdk(#[from] SdkError),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::InvalidValue { .. } => 2,
            CliError::Sdk(SdkError::CompilationFailed { .. }) => 1,
            CliError::Sdk(_) => 2,
        }
    }
}

impl From<pipeweld_core::CoreError> for CliError {
    fn from(err: pipeweld_core::CoreError) -> Self {
        match err {
            pipeweld_core::CoreError::InvalidValue { field, value } => {
                CliError::InvalidValue { field, value }
            }
            other => CliError::Config(other.to_string()),
        }
    }
}
