//! Project parser
//!
//! Parses a Pipeweld project file. A project file holds one or more
//! documents, each keyed by its kind:
//!
//! ```yaml
//! pipeline:
//!   name: order-pipeline
//!   transport: grpc
//!   steps:
//!     - name: ProcessOrder
//!       namespace: com.acme.order
//!       input: { type: com.acme.Order, converter: com.acme.OrderMapper }
//!       output: { type: com.acme.Invoice }
//!   aspects:
//!     - id: persistence
//!       position: after
//!
//! runtime-mapping:
//!   layout: per-module
//!
//! descriptor-set:
//!   type-prefix: com.acme.grpc
//!   services: []
//! ```

use crate::descriptor_parser::DescriptorSetParser;
use crate::error::{ParseError, Result};
use crate::placement_parser::PlacementParser;
use crate::yaml_parser::{YamlParser, DOCUMENT_KEYS};
use pipeweld_core::ir::{PlatformMode, TransportMode};
use pipeweld_core::placement::PlacementConfig;
use pipeweld_core::schema::DescriptorSet;
use pipeweld_core::source::{AspectSource, StepOrigin, StepSource};
use serde::Deserialize;
use serde_yaml::Value as YamlValue;

/// Pipeline-level settings of a project
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineHeader {
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub transport: TransportMode,

    #[serde(default)]
    pub platform: PlatformMode,
}

/// Everything a project file declares
#[derive(Debug, Clone, Default)]
pub struct ProjectDocument {
    pub header: PipelineHeader,

    /// Declared steps first, then template steps, each in file order
    pub steps: Vec<StepSource>,

    pub aspects: Vec<AspectSource>,

    pub placement: Option<PlacementConfig>,

    pub descriptor_set: Option<DescriptorSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StepsSection {
    #[serde(default)]
    steps: Vec<StepSource>,

    #[serde(default)]
    aspects: Vec<AspectSource>,
}

/// Project parser
pub struct ProjectParser;

impl ProjectParser {
    /// Parse a project from YAML string
    pub fn parse(yaml_str: &str) -> Result<ProjectDocument> {
        let documents = YamlParser::parse_multi_document(yaml_str)?;
        if documents.is_empty() {
            return Err(ParseError::MissingField {
                field: "pipeline".to_string(),
            });
        }

        let mut project = ProjectDocument::default();
        let mut seen_pipeline = false;
        let mut template_steps = Vec::new();
        let mut template_aspects = Vec::new();

        for doc in &documents {
            let keys = YamlParser::top_level_keys(doc);
            let mut recognized = false;

            if let Some(pipeline) = doc.get("pipeline") {
                if seen_pipeline {
                    return Err(ParseError::DuplicateDocument("pipeline".to_string()));
                }
                seen_pipeline = true;
                recognized = true;

                project.header = Self::parse_header(pipeline)?;
                let section: StepsSection = YamlParser::section(pipeline, "pipeline")?;
                project.steps.extend(section.steps);
                project.aspects.extend(section.aspects);
            }

            if let Some(template) = doc.get("template") {
                recognized = true;
                let section: StepsSection = YamlParser::section(template, "template")?;
                template_steps.extend(section.steps.into_iter().map(|mut step| {
                    step.origin = StepOrigin::Template;
                    step
                }));
                template_aspects.extend(section.aspects);
            }

            if let Some(mapping) = doc.get("runtime-mapping") {
                if project.placement.is_some() {
                    return Err(ParseError::DuplicateDocument("runtime-mapping".to_string()));
                }
                recognized = true;
                project.placement = Some(PlacementParser::parse_from_yaml(mapping)?);
            }

            if let Some(descriptors) = doc.get("descriptor-set") {
                if project.descriptor_set.is_some() {
                    return Err(ParseError::DuplicateDocument("descriptor-set".to_string()));
                }
                recognized = true;
                project.descriptor_set = Some(DescriptorSetParser::parse_from_yaml(descriptors)?);
            }

            if !recognized {
                return Err(ParseError::UnknownDocument {
                    expected: DOCUMENT_KEYS.join(", "),
                    found: keys.join(", "),
                });
            }
        }

        if !seen_pipeline {
            return Err(ParseError::MissingField {
                field: "pipeline".to_string(),
            });
        }

        project.steps.extend(template_steps);
        project.aspects.extend(template_aspects);

        tracing::debug!(
            "Parsed project '{}': {} steps, {} aspects",
            project.header.name,
            project.steps.len(),
            project.aspects.len()
        );

        Ok(project)
    }

    fn parse_header(pipeline: &YamlValue) -> Result<PipelineHeader> {
        let name = YamlParser::get_string(pipeline, "name").map_err(|_| ParseError::MissingField {
            field: "pipeline.name".to_string(),
        })?;

        let transport = match pipeline.get("transport") {
            Some(value) => YamlParser::section(value, "pipeline.transport")?,
            None => TransportMode::default(),
        };

        let platform = match pipeline.get("platform") {
            Some(value) => YamlParser::section(value, "pipeline.platform")?,
            None => PlatformMode::default(),
        };

        Ok(PipelineHeader {
            name,
            version: YamlParser::get_optional_string(pipeline, "version"),
            transport,
            platform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeweld_core::ir::StreamingShape;

    #[test]
    fn test_parse_minimal_project() {
        let yaml = r#"
pipeline:
  name: orders
  steps:
    - name: ProcessOrder
      namespace: com.acme.order
      input: { type: com.acme.Order }
      output: { type: com.acme.Invoice }
"#;
        let project = ProjectParser::parse(yaml).unwrap();
        assert_eq!(project.header.name, "orders");
        assert_eq!(project.header.transport, TransportMode::Grpc);
        assert_eq!(project.steps.len(), 1);
        assert_eq!(project.steps[0].shape, StreamingShape::UnaryUnary);
        assert!(project.placement.is_none());
    }

    #[test]
    fn test_template_steps_follow_declared() {
        let yaml = r#"
template:
  steps:
    - name: Enrich
      input: { type: A }
      output: { type: B }
pipeline:
  name: orders
  steps:
    - name: Validate
      input: { type: A }
      output: { type: A }
"#;
        let project = ProjectParser::parse(yaml).unwrap();
        assert_eq!(project.steps[0].name, "Validate");
        assert_eq!(project.steps[1].name, "Enrich");
        assert_eq!(project.steps[1].origin, StepOrigin::Template);
    }

    #[test]
    fn test_missing_pipeline() {
        let yaml = "runtime-mapping:\n  layout: monolith\n";
        assert!(matches!(
            ProjectParser::parse(yaml),
            Err(ParseError::MissingField { .. })
        ));
    }

    #[test]
    fn test_unknown_document() {
        let yaml = "pipeline:\n  name: a\n---\nsomething: else\n";
        assert!(matches!(
            ProjectParser::parse(yaml),
            Err(ParseError::UnknownDocument { .. })
        ));
    }

    #[test]
    fn test_unknown_step_field_rejected() {
        let yaml = r#"
pipeline:
  name: orders
  steps:
    - name: ProcessOrder
      colour: blue
"#;
        let err = ProjectParser::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }
}
