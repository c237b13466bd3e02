//! Compiler error types

use pipeweld_core::CoreError;
use thiserror::Error;

/// Compiler error
#[derive(Error, Debug)]
pub enum CompileError {
    /// Source descriptors could not be collected
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// A raw descriptor could not become a step descriptor
    #[error("Invalid step '{step}': {message}")]
    Extraction { step: String, message: String },

    /// Strict-mode placement errors, reported together
    #[error("Runtime mapping failed with {} error(s):\n  {}", errors.len(), errors.join("\n  "))]
    RuntimeMapping { errors: Vec<String> },

    /// Policy violation found by semantic analysis
    #[error("Semantic error: {0}")]
    Semantic(String),

    /// Protocol types could not be resolved; always fatal
    #[error("Schema resolution failed for service '{service}': {message}")]
    SchemaResolution { service: String, message: String },

    /// A renderer rejected a binding as malformed
    #[error("Renderer '{renderer}' rejected binding '{key}': {message}")]
    MalformedBinding {
        renderer: String,
        key: String,
        message: String,
    },

    /// A phase ran before the state it reads was produced
    #[error("Phase '{phase}' requires {field}, which has not been produced")]
    MissingState { phase: String, field: String },

    /// A phase failed; the remaining phases were skipped
    #[error("Phase '{phase}' failed: {source}")]
    PhaseFailed {
        phase: String,
        #[source]
        source: Box<CompileError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CompileError {
    /// The innermost error, unwrapping phase tags
    pub fn root(&self) -> &CompileError {
        match self {
            CompileError::PhaseFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Name of the phase that failed, if tagged
    pub fn phase(&self) -> Option<&str> {
        match self {
            CompileError::PhaseFailed { phase, .. } => Some(phase),
            _ => None,
        }
    }
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
