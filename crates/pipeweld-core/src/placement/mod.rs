//! Runtime placement
//!
//! Placement configuration decides which physical deployment module hosts
//! each step; the resolution is the immutable result of applying it.

pub mod config;
pub mod resolution;

pub use config::{
    Layout, ModuleDeclaration, ModuleStrategy, PlacementConfig, PlacementDefaults,
    SyntheticDefaults, SyntheticStrategy, ValidationMode, DEFAULT_RUNTIME,
    MONOLITH_FALLBACK_MODULE,
};
pub use resolution::{ResolutionParts, RuntimeMappingResolution};
