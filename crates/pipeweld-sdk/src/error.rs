//! SDK error types

use pipeweld_core::Diagnostic;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] pipeweld_parser::ParseError),

    /// Compiler error raised outside a phase run
    #[error("Compiler error: {0}")]
    CompileError(#[from] pipeweld_compiler::CompileError),

    /// A phase failed; carries every diagnostic reported up to the failure
    #[error("Compilation failed: {source}")]
    CompilationFailed {
        #[source]
        source: pipeweld_compiler::CompileError,
        diagnostics: Vec<Diagnostic>,
    },

    /// Invalid project file
    #[error("Invalid project file '{path}': {source}")]
    InvalidProjectFile {
        path: String,
        #[source]
        source: pipeweld_parser::ParseError,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// No project content was given to the builder
    #[error("No project file or content configured")]
    NoProject,
}

impl SdkError {
    /// Diagnostics collected before the failure, if any
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            SdkError::CompilationFailed { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pipeweld_compiler::CompileError;

    #[test]
    fn test_config_error() {
        let error = SdkError::ConfigError("output root is empty".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("output root is empty"));
    }

    #[test]
    fn test_no_project_error() {
        assert_eq!(
            SdkError::NoProject.to_string(),
            "No project file or content configured"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let sdk_error: SdkError = io_error.into();
        assert!(sdk_error.to_string().contains("I/O error"));
        assert!(sdk_error.to_string().contains("File not found"));
    }

    #[test]
    fn test_compilation_failed_keeps_diagnostics() {
        let error = SdkError::CompilationFailed {
            source: CompileError::Semantic("duplicate step 'A'".to_string()),
            diagnostics: vec![Diagnostic::error("duplicate step 'A'").with_phase("semantic-analysis")],
        };
        assert!(error.to_string().contains("duplicate step"));
        assert_eq!(error.diagnostics().len(), 1);
        assert!(SdkError::NoProject.diagnostics().is_empty());
    }
}
