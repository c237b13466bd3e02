//! Source descriptors
//!
//! Raw, unvalidated step and aspect declarations as they come out of the
//! configuration loader or a pipeline template. Extraction turns these into
//! `StepDescriptor`s.

use crate::ir::StreamingShape;
use serde::{Deserialize, Serialize};

/// Where a step declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOrigin {
    /// Declared directly on a user step
    Declared,
    /// Declared by a pipeline template
    Template,
}

impl Default for StepOrigin {
    fn default() -> Self {
        StepOrigin::Declared
    }
}

/// One side of a step: domain type plus optional converter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<String>,
}

impl TypeDecl {
    pub fn of(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            converter: None,
        }
    }
}

/// Pre-existing implementation a delegation step forwards to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DelegateDecl {
    pub service: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<String>,

    /// Delegate's input type, borrowed when the step declares none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Delegate's output type, borrowed when the step declares none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Reactive shape of the delegate, when it differs from the step's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<StreamingShape>,
}

/// A raw step declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StepSource {
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<TypeDecl>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<TypeDecl>,

    #[serde(default, alias = "cardinality")]
    pub shape: StreamingShape,

    /// Run on the blocking worker pool
    #[serde(default)]
    pub blocking: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<DelegateDecl>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    #[serde(default)]
    pub origin: StepOrigin,
}

impl StepSource {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            input: None,
            output: None,
            shape: StreamingShape::default(),
            blocking: false,
            delegate: None,
            rpc_method: None,
            rest_path: None,
            client_name: None,
            origin: StepOrigin::Declared,
        }
    }

    pub fn with_types(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input = Some(TypeDecl::of(input));
        self.output = Some(TypeDecl::of(output));
        self
    }

    pub fn with_shape(mut self, shape: StreamingShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_delegate(mut self, delegate: DelegateDecl) -> Self {
        self.delegate = Some(delegate);
        self
    }
}

/// Which side of a step an aspect observes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectPosition {
    Before,
    After,
    Around,
}

impl Default for AspectPosition {
    fn default() -> Self {
        AspectPosition::After
    }
}

/// Kind of cross-cutting behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AspectKind {
    SideEffect,
    /// Cache/bypass aspects: the payload DTO stands in for the domain type
    Cache,
}

impl Default for AspectKind {
    fn default() -> Self {
        AspectKind::SideEffect
    }
}

/// A cross-cutting aspect that expands into synthetic side-effect steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AspectSource {
    pub id: String,

    #[serde(default)]
    pub kind: AspectKind,

    #[serde(default)]
    pub position: AspectPosition,

    /// Fixed payload type; otherwise the base step's type at `position`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_type: Option<String>,

    /// Steps the aspect applies to; empty means every declared step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl AspectSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AspectKind::default(),
            position: AspectPosition::default(),
            payload_type: None,
            steps: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_position(mut self, position: AspectPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload_type = Some(payload.into());
        self
    }

    pub fn with_kind(mut self, kind: AspectKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn scoped_to(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Whether the aspect applies to the named step
    pub fn applies_to(&self, step_name: &str) -> bool {
        self.enabled && (self.steps.is_empty() || self.steps.iter().any(|s| s == step_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_scope() {
        let global = AspectSource::new("persistence");
        assert!(global.applies_to("Anything"));

        let scoped = AspectSource::new("cache").scoped_to(vec!["A".to_string()]);
        assert!(scoped.applies_to("A"));
        assert!(!scoped.applies_to("B"));

        let mut disabled = AspectSource::new("audit");
        disabled.enabled = false;
        assert!(!disabled.applies_to("A"));
    }
}
