//! Artifact generation
//!
//! Renderers turn a resolved `Binding` into files under the output root.
//! Only the JSON manifest renderer ships with the compiler; protocol-specific
//! source renderers plug in through the `Renderer` trait.

pub mod manifest;
pub mod renderer;

pub use manifest::ManifestRenderer;
pub use renderer::{GeneratedArtifact, GenerationContext, RenderError, Renderer};
