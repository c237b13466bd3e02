//! YAML Parser
//!
//! Provides utilities for parsing YAML content into structured data.

use crate::error::{ParseError, Result};
use serde::de::DeserializeOwned;
use serde_yaml::Value as YamlValue;

/// Top-level keys that start a new document
pub const DOCUMENT_KEYS: &[&str] = &["pipeline", "template", "runtime-mapping", "descriptor-set"];

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML string into a YAML value
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        serde_yaml::from_str(yaml_str).map_err(|e| ParseError::ParseError(e.to_string()))
    }

    /// Parse YAML string containing multiple documents (separated by --- or auto-detected)
    /// Returns a vector of YAML values, one for each document
    ///
    /// This function supports two formats:
    /// 1. Traditional YAML multi-document format with explicit `---` separators
    /// 2. Auto-detection of the document keys (`pipeline:`, `template:`,
    ///    `runtime-mapping:`, `descriptor-set:`) at line start
    pub fn parse_multi_document(yaml_str: &str) -> Result<Vec<YamlValue>> {
        use serde::Deserialize;

        let preprocessed = Self::preprocess_multi_document(yaml_str);

        let deserializer = serde_yaml::Deserializer::from_str(&preprocessed);
        let mut documents = Vec::new();

        for document in deserializer {
            let value = YamlValue::deserialize(document)
                .map_err(|e| ParseError::ParseError(e.to_string()))?;
            // Separators at the very start or end produce empty documents
            if !value.is_null() {
                documents.push(value);
            }
        }

        Ok(documents)
    }

    /// Preprocess YAML content to auto-insert `---` separators
    /// before document keys at line start
    fn preprocess_multi_document(yaml_str: &str) -> String {
        let mut result = String::with_capacity(yaml_str.len() + 64);
        let mut seen_definition = false;
        let mut recent_separator = false;

        for line in yaml_str.lines() {
            let trimmed = line.trim();

            let is_definition_start = !line.starts_with(' ')
                && !line.starts_with('\t')
                && DOCUMENT_KEYS
                    .iter()
                    .any(|key| trimmed.strip_prefix(key).map_or(false, |rest| rest.starts_with(':')));

            if is_definition_start && seen_definition && !recent_separator {
                result.push_str("---\n");
            }

            if is_definition_start {
                seen_definition = true;
            }

            result.push_str(line);
            result.push('\n');

            // Only reset on meaningful content
            if trimmed == "---" {
                recent_separator = true;
            } else if !trimmed.is_empty() && !trimmed.starts_with('#') {
                recent_separator = false;
            }
        }

        result
    }

    /// Deserialize a typed section, reporting failures against `field`
    pub fn section<T: DeserializeOwned>(value: &YamlValue, field: &str) -> Result<T> {
        serde_yaml::from_value(value.clone()).map_err(|e| ParseError::InvalidValue {
            field: field.to_string(),
            message: e.to_string(),
        })
    }

    /// Get a required string field from YAML object
    pub fn get_string(obj: &YamlValue, field: &str) -> Result<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })
    }

    /// Get an optional string field from YAML object
    pub fn get_optional_string(obj: &YamlValue, field: &str) -> Option<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Get an optional array field from YAML object
    pub fn get_optional_array<'a>(obj: &'a YamlValue, field: &str) -> Option<&'a Vec<YamlValue>> {
        obj.get(field).and_then(|v| v.as_sequence())
    }

    /// Top-level keys of a mapping document, in order
    pub fn top_level_keys(doc: &YamlValue) -> Vec<String> {
        doc.as_mapping()
            .map(|m| {
                m.keys()
                    .filter_map(|k| k.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
