//! Pipeweld Parser - YAML loaders for the Pipeweld step compiler
//!
//! This crate converts YAML configuration files into the source descriptors,
//! placement configuration and schema descriptor sets defined in
//! `pipeweld-core`.

pub mod descriptor_parser;
pub mod error;
pub mod placement_parser;
pub mod project_parser;
pub mod yaml_parser;

// Re-export main parser types
pub use descriptor_parser::DescriptorSetParser;
pub use error::{ParseError, Result};
pub use placement_parser::PlacementParser;
pub use project_parser::{PipelineHeader, ProjectDocument, ProjectParser};
pub use yaml_parser::YamlParser;
