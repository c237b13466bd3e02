//! Descriptor set parser
//!
//! Parses a `descriptor-set` document listing protocol services and messages.

use crate::error::{ParseError, Result};
use crate::yaml_parser::YamlParser;
use pipeweld_core::schema::DescriptorSet;
use serde_yaml::Value as YamlValue;
use std::collections::HashSet;

/// Descriptor set parser
pub struct DescriptorSetParser;

impl DescriptorSetParser {
    /// Parse from a YAML string, with or without the `descriptor-set` wrapper
    pub fn parse(yaml_str: &str) -> Result<DescriptorSet> {
        let yaml = YamlParser::parse(yaml_str)?;
        match yaml.get("descriptor-set") {
            Some(inner) => Self::parse_from_yaml(inner),
            None => Self::parse_from_yaml(&yaml),
        }
    }

    /// Parse from the body of a `descriptor-set` document
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<DescriptorSet> {
        let set: DescriptorSet = YamlParser::section(yaml, "descriptor-set")?;

        let mut services = HashSet::new();
        for service in &set.services {
            if !services.insert(service.name.as_str()) {
                return Err(ParseError::InvalidValue {
                    field: "descriptor-set.services".to_string(),
                    message: format!("duplicate service '{}'", service.name),
                });
            }
        }

        let mut messages = HashSet::new();
        for message in &set.messages {
            if !messages.insert(message.name.as_str()) {
                return Err(ParseError::InvalidValue {
                    field: "descriptor-set.messages".to_string(),
                    message: format!("duplicate message '{}'", message.name),
                });
            }
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeweld_core::schema::SchemaResolver;

    const SET: &str = r#"
descriptor-set:
  package: acme.order
  type-prefix: com.acme.grpc
  services:
    - name: ProcessOrderService
      methods:
        - name: remoteProcess
          input: OrderMsg
          output: InvoiceMsg
          server-streaming: true
  messages:
    - name: OrderMsg
    - name: InvoiceMsg
      language-type: com.acme.wire.Invoice
"#;

    #[test]
    fn test_parse_descriptor_set() {
        let set = DescriptorSetParser::parse(SET).unwrap();
        assert_eq!(set.package.as_deref(), Some("acme.order"));
        let method = set.resolve_method("ProcessOrderService", "remoteProcess").unwrap();
        assert!(method.server_streaming);
        assert!(!method.client_streaming);
        assert_eq!(method.input_type, "com.acme.grpc.OrderMsg");
    }

    #[test]
    fn test_duplicate_message_rejected() {
        let yaml = "messages:\n  - name: A\n  - name: A\n";
        assert!(DescriptorSetParser::parse(yaml).is_err());
    }
}
