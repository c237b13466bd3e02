//! Protocol schema descriptor set
//!
//! The descriptor set is the queryable view of protocol services and
//! messages. Binding construction resolves a step's remote method through
//! the `SchemaResolver` trait; the in-memory `DescriptorSet` is the default
//! implementation. Lookups are pure, so repeated lookups of the same method
//! return equal results.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Resolves language-level types for a declared RPC method
pub trait SchemaResolver {
    /// Resolve `method` of `service`
    fn resolve_method(&self, service: &str, method: &str) -> Result<ResolvedMethod>;
}

/// A protocol message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MessageDescriptor {
    pub name: String,

    /// Generated language-level type; defaults to `<type-prefix>.<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_type: Option<String>,
}

/// One RPC method of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MethodDescriptor {
    pub name: String,
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub client_streaming: bool,
    #[serde(default)]
    pub server_streaming: bool,
}

/// A protocol service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Set of protocol services and messages available to the compiler
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DescriptorSet {
    /// Protocol package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Namespace prepended to message names without an explicit language type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_prefix: Option<String>,

    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,

    #[serde(default)]
    pub messages: Vec<MessageDescriptor>,
}

/// A fully resolved remote method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMethod {
    pub service: String,
    pub method: String,
    pub input_message: String,
    pub output_message: String,
    /// Language-level type of the request message
    pub input_type: String,
    /// Language-level type of the response message
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

impl ResolvedMethod {
    /// Reference to the method descriptor, `<package>.<service>/<method>`
    pub fn descriptor_ref(&self, package: Option<&str>) -> String {
        match package {
            Some(pkg) if !pkg.is_empty() => format!("{}.{}/{}", pkg, self.service, self.method),
            _ => format!("{}/{}", self.service, self.method),
        }
    }
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service
    pub fn with_service(mut self, service: ServiceDescriptor) -> Self {
        self.services.push(service);
        self
    }

    /// Add a message with an optional explicit language type
    pub fn with_message(mut self, name: impl Into<String>, language_type: Option<String>) -> Self {
        self.messages.push(MessageDescriptor {
            name: name.into(),
            language_type,
        });
        self
    }

    pub fn service(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.iter().find(|m| m.name == name)
    }

    fn language_type(&self, service: &str, message: &str) -> Result<String> {
        let descriptor = self.message(message).ok_or_else(|| CoreError::Schema {
            service: service.to_string(),
            message: format!("unresolved message type '{}'", message),
        })?;

        let resolved = match (&descriptor.language_type, &self.type_prefix) {
            (Some(explicit), _) => explicit.clone(),
            (None, Some(prefix)) if !prefix.is_empty() => format!("{}.{}", prefix, descriptor.name),
            (None, _) => descriptor.name.clone(),
        };
        Ok(resolved)
    }
}

impl SchemaResolver for DescriptorSet {
    fn resolve_method(&self, service: &str, method: &str) -> Result<ResolvedMethod> {
        let svc = self.service(service).ok_or_else(|| CoreError::Schema {
            service: service.to_string(),
            message: "service not found in descriptor set".to_string(),
        })?;

        let m = svc.method(method).ok_or_else(|| CoreError::Schema {
            service: service.to_string(),
            message: format!("method '{}' not found", method),
        })?;

        Ok(ResolvedMethod {
            service: svc.name.clone(),
            method: m.name.clone(),
            input_message: m.input.clone(),
            output_message: m.output.clone(),
            input_type: self.language_type(service, &m.input)?,
            output_type: self.language_type(service, &m.output)?,
            client_streaming: m.client_streaming,
            server_streaming: m.server_streaming,
        })
    }
}
