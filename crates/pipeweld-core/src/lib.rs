//! Pipeweld Core - shared types for the Pipeweld step compiler
//!
//! This crate provides the fundamental types used across the Pipeweld workspace:
//! - The semantic IR (`StepDescriptor` and its enums)
//! - Protocol bindings produced for each generation target
//! - Placement configuration and the runtime mapping resolution
//! - The schema descriptor set used for protocol type lookups
//! - Raw source descriptors handed over by the configuration loader
//! - Diagnostics and error types

pub mod binding;
pub mod diagnostic;
pub mod error;
pub mod ir;
pub mod naming;
pub mod placement;
pub mod schema;
pub mod source;

// Re-export commonly used types
pub use binding::Binding;
pub use diagnostic::{Diagnostic, Severity};
pub use error::CoreError;
pub use ir::{
    DeploymentRole, ExecutionMode, GenerationTarget, PlatformMode, StepDescriptor,
    StreamingShape, TransportMode, TypeMapping,
};
pub use placement::{PlacementConfig, RuntimeMappingResolution};
pub use schema::{DescriptorSet, SchemaResolver};
pub use source::{AspectSource, StepSource};
