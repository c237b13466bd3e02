//! Placement parser
//!
//! Parses the `runtime-mapping` document into a `PlacementConfig`.
//!
//! ```yaml
//! runtime-mapping:
//!   layout: pipeline-runtime
//!   validation: strict
//!   defaults:
//!     runtime: jvm
//!     module: per-step
//!     synthetic:
//!       module: plugin
//!   runtimes: [jvm]
//!   modules:
//!     orders-svc: { runtime: jvm }
//!   steps:
//!     ProcessOrder: orders-svc
//!   synthetics:
//!     persistence.Invoice@1: orders-svc
//! ```

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use pipeweld_core::placement::PlacementConfig;
use serde_yaml::Value as YamlValue;

/// Placement parser
pub struct PlacementParser;

impl PlacementParser {
    /// Parse placement from a YAML string, with or without the `runtime-mapping` wrapper
    pub fn parse(yaml_str: &str) -> Result<PlacementConfig> {
        let yaml = YamlParser::parse(yaml_str)?;
        match yaml.get("runtime-mapping") {
            Some(inner) => Self::parse_from_yaml(inner),
            None => Self::parse_from_yaml(&yaml),
        }
    }

    /// Parse placement from the body of a `runtime-mapping` document
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<PlacementConfig> {
        if yaml.is_null() {
            return Ok(PlacementConfig::default());
        }

        let config: PlacementConfig = YamlParser::section(yaml, "runtime-mapping")?;

        for (key, module) in config.steps.iter().chain(config.synthetics.iter()) {
            if module.trim().is_empty() {
                return Err(ParseError::InvalidValue {
                    field: format!("runtime-mapping.{}", key),
                    message: "module name cannot be empty".to_string(),
                });
            }
        }

        Ok(config)
    }
}
