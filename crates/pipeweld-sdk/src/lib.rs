//! Pipeweld SDK
//!
//! High-level API for loading project files and running a compilation unit.

pub mod builder;
pub mod config;
pub mod error;
pub mod project_source;
pub mod unit;

// Re-export main types
pub use builder::CompilerBuilder;
pub use config::BuildConfig;
pub use error::{Result, SdkError};
pub use project_source::ProjectSource;
pub use unit::{CompilationOutput, CompilationUnit};

// Re-export commonly used types from dependencies
pub use pipeweld_compiler::{CompilerOptions, Renderer};
pub use pipeweld_core::{
    Binding, DeploymentRole, Diagnostic, GenerationTarget, PlatformMode, Severity,
    StepDescriptor, TransportMode,
};
