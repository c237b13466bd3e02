//! Semantic Intermediate Representation (IR) for Pipeweld
//!
//! The IR is the transport-agnostic description of one processing step.
//! It is produced by extraction and consumed by every later phase.

pub mod shape;
pub mod step;
pub mod target;

pub use shape::{ExecutionMode, StreamingShape};
pub use step::{StepDescriptor, StepDescriptorBuilder, SyntheticOrigin, TypeMapping};
pub use target::{DeploymentRole, GenerationTarget, PlatformMode, TransportMode};
