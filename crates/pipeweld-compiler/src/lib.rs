//! Pipeweld Compiler - compiles step descriptors into protocol bindings
//!
//! This crate runs the phase pipeline over one compilation unit:
//! - Discovery and extraction into `StepDescriptor`s (including aspect expansion)
//! - Runtime mapping: module placement with layout policies and overrides
//! - Semantic analysis of the extracted steps
//! - Target resolution per deployment role and transport
//! - Binding construction against a schema descriptor set
//! - Generation through pluggable renderers, and role metadata bookkeeping

pub mod binding;
pub mod codegen;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod phase;
pub mod phases;
pub mod runtime_mapping;
pub mod source;
pub mod target;

// Re-export commonly used types
pub use binding::BindingConstructor;
pub use codegen::{GeneratedArtifact, GenerationContext, ManifestRenderer, RenderError, Renderer};
pub use context::{CompilationContext, CompilerOptions, ContextStage};
pub use error::{CompileError, Result};
pub use orchestrator::PhaseOrchestrator;
pub use phase::Phase;
pub use runtime_mapping::{RuntimeMappingResolver, SyntheticKey, SyntheticKeyStrategy};
pub use source::{DescriptorSource, DiscoveredDescriptors, InMemorySource};
pub use target::{TargetContext, TargetResolver};
