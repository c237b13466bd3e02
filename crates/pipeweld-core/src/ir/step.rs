//! Step descriptor
//!
//! A `StepDescriptor` is created once during extraction and never mutated
//! afterwards. Phases that need a different role or target set derive a new
//! copy with `with_role` / `with_enabled_targets`.

use crate::error::{CoreError, Result};
use crate::ir::shape::{ExecutionMode, StreamingShape};
use crate::ir::target::{DeploymentRole, GenerationTarget};
use crate::naming::{kebab_case, strip_suffix_nonempty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default schema method name used for remote bindings
pub const DEFAULT_RPC_METHOD: &str = "remoteProcess";

const SERVICE_SUFFIX: &str = "Service";

/// Domain type of one side of a step, plus its optional wire converter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TypeMapping {
    pub domain_type: Option<String>,
    pub converter_type: Option<String>,
    pub has_converter: bool,
}

impl TypeMapping {
    /// A mapping with only a domain type
    pub fn of(domain_type: impl Into<String>) -> Self {
        Self {
            domain_type: Some(domain_type.into()),
            converter_type: None,
            has_converter: false,
        }
    }

    /// A mapping with a domain type and a converter
    pub fn with_converter(domain_type: impl Into<String>, converter: impl Into<String>) -> Self {
        Self {
            domain_type: Some(domain_type.into()),
            converter_type: Some(converter.into()),
            has_converter: true,
        }
    }

    /// An unresolved mapping
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.domain_type.as_deref().map_or(false, |t| !t.trim().is_empty())
    }

    pub fn domain_type(&self) -> Option<&str> {
        self.domain_type.as_deref()
    }
}

/// Where a synthetic side-effect step came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyntheticOrigin {
    /// Aspect identifier as declared (e.g. `persistence`, `ObserveLatency`)
    pub aspect_id: String,
    /// Fully-qualified payload type observed by the side effect
    pub payload_type: String,
    /// Name of the declared step the aspect was applied to
    pub base_step: String,
    /// Namespace of that base step
    pub base_namespace: String,
}

/// Transport-agnostic description of one processing step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    name: String,
    namespace: String,
    input_type: TypeMapping,
    output_type: TypeMapping,
    streaming_shape: StreamingShape,
    execution_mode: ExecutionMode,
    deployment_role: DeploymentRole,
    enabled_targets: BTreeSet<GenerationTarget>,
    is_side_effect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    synthetic_origin: Option<SyntheticOrigin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delegate_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delegate_converter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rpc_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rest_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_name: Option<String>,
}

impl StepDescriptor {
    /// Start building a descriptor
    pub fn builder(name: impl Into<String>, namespace: impl Into<String>) -> StepDescriptorBuilder {
        StepDescriptorBuilder::new(name, namespace)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn input_type(&self) -> &TypeMapping {
        &self.input_type
    }

    pub fn output_type(&self) -> &TypeMapping {
        &self.output_type
    }

    pub fn streaming_shape(&self) -> StreamingShape {
        self.streaming_shape
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    pub fn deployment_role(&self) -> DeploymentRole {
        self.deployment_role
    }

    pub fn enabled_targets(&self) -> &BTreeSet<GenerationTarget> {
        &self.enabled_targets
    }

    pub fn is_side_effect(&self) -> bool {
        self.is_side_effect
    }

    pub fn synthetic_origin(&self) -> Option<&SyntheticOrigin> {
        self.synthetic_origin.as_ref()
    }

    pub fn delegate_service(&self) -> Option<&str> {
        self.delegate_service.as_deref()
    }

    pub fn delegate_converter(&self) -> Option<&str> {
        self.delegate_converter.as_deref()
    }

    /// Whether this step forwards to a pre-existing implementation
    pub fn is_delegation(&self) -> bool {
        self.delegate_service.is_some()
    }

    /// Schema method name used for remote bindings
    pub fn rpc_method(&self) -> &str {
        self.rpc_method.as_deref().unwrap_or(DEFAULT_RPC_METHOD)
    }

    pub fn rest_path(&self) -> Option<&str> {
        self.rest_path.as_deref()
    }

    /// Service name: the step name, suffixed with `Service` unless it already is
    pub fn service_name(&self) -> String {
        if self.name.ends_with(SERVICE_SUFFIX) {
            self.name.clone()
        } else {
            format!("{}{}", self.name, SERVICE_SUFFIX)
        }
    }

    /// Service name with the `Service` suffix removed
    pub fn base_name(&self) -> &str {
        strip_suffix_nonempty(&self.name, SERVICE_SUFFIX)
    }

    /// Client name: explicit override, else the kebab-case base name
    pub fn client_name(&self) -> String {
        match &self.client_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => kebab_case(self.base_name()),
        }
    }

    /// Copy of this descriptor with a different deployment role
    pub fn with_role(&self, role: DeploymentRole) -> Self {
        Self {
            deployment_role: role,
            ..self.clone()
        }
    }

    /// Copy of this descriptor with a different target set
    pub fn with_enabled_targets(&self, targets: BTreeSet<GenerationTarget>) -> Self {
        Self {
            enabled_targets: targets,
            ..self.clone()
        }
    }
}

/// Builder for `StepDescriptor`
#[derive(Debug, Clone)]
pub struct StepDescriptorBuilder {
    inner: StepDescriptor,
}

impl StepDescriptorBuilder {
    fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            inner: StepDescriptor {
                name: name.into(),
                namespace: namespace.into(),
                input_type: TypeMapping::empty(),
                output_type: TypeMapping::empty(),
                streaming_shape: StreamingShape::default(),
                execution_mode: ExecutionMode::default(),
                deployment_role: DeploymentRole::PipelineServer,
                enabled_targets: BTreeSet::new(),
                is_side_effect: false,
                synthetic_origin: None,
                delegate_service: None,
                delegate_converter: None,
                rpc_method: None,
                rest_path: None,
                client_name: None,
            },
        }
    }

    pub fn input(mut self, mapping: TypeMapping) -> Self {
        self.inner.input_type = mapping;
        self
    }

    pub fn output(mut self, mapping: TypeMapping) -> Self {
        self.inner.output_type = mapping;
        self
    }

    pub fn streaming_shape(mut self, shape: StreamingShape) -> Self {
        self.inner.streaming_shape = shape;
        self
    }

    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.inner.execution_mode = mode;
        self
    }

    pub fn role(mut self, role: DeploymentRole) -> Self {
        self.inner.deployment_role = role;
        self
    }

    pub fn enabled_targets(mut self, targets: BTreeSet<GenerationTarget>) -> Self {
        self.inner.enabled_targets = targets;
        self
    }

    /// Mark the step as synthesized from an aspect
    pub fn synthetic(mut self, origin: SyntheticOrigin) -> Self {
        self.inner.is_side_effect = true;
        self.inner.synthetic_origin = Some(origin);
        self
    }

    pub fn delegate(mut self, service: impl Into<String>, converter: Option<String>) -> Self {
        self.inner.delegate_service = Some(service.into());
        self.inner.delegate_converter = converter;
        self
    }

    pub fn rpc_method(mut self, method: impl Into<String>) -> Self {
        self.inner.rpc_method = Some(method.into());
        self
    }

    pub fn rest_path(mut self, path: impl Into<String>) -> Self {
        self.inner.rest_path = Some(path.into());
        self
    }

    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.inner.client_name = Some(name.into());
        self
    }

    /// Finish building, checking the descriptor's invariants
    pub fn build(self) -> Result<StepDescriptor> {
        let step = self.inner;

        if step.name.trim().is_empty() {
            return Err(CoreError::InvalidStep {
                step: step.name,
                message: "step name cannot be empty".to_string(),
            });
        }

        if !step.input_type.is_resolved() || !step.output_type.is_resolved() {
            return Err(CoreError::InvalidStep {
                message: "input and output domain types must be declared".to_string(),
                step: step.name,
            });
        }

        if step.is_side_effect != step.synthetic_origin.is_some() {
            return Err(CoreError::InvalidStep {
                message: "side-effect steps must carry their aspect origin".to_string(),
                step: step.name,
            });
        }

        Ok(step)
    }
}
