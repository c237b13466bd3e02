//! Protocol bindings
//!
//! A binding is the protocol realization of one `StepDescriptor` for one
//! generation target. Bindings are created by binding construction, never
//! modified, and consumed by renderers.

use crate::ir::{
    DeploymentRole, ExecutionMode, GenerationTarget, StepDescriptor, StreamingShape, TransportMode,
};
use crate::schema::ResolvedMethod;
use serde::{Deserialize, Serialize};

/// Key under which the orchestrator binding is stored
pub const ORCHESTRATOR_BINDING_KEY: &str = "orchestrator";

/// Binding map key for a step and target, `<serviceName>_<targetKind>`
pub fn binding_key(step: &StepDescriptor, target: GenerationTarget) -> String {
    format!("{}_{}", step.service_name(), target.key_suffix())
}

/// Remote-procedure binding (server adapter or client stub)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteServiceBinding {
    pub step: StepDescriptor,
    pub target: GenerationTarget,
    pub service_name: String,
    pub method: ResolvedMethod,
    /// `<package>.<service>/<method>`
    pub descriptor_ref: String,
}

impl RemoteServiceBinding {
    pub fn input_streaming(&self) -> bool {
        self.method.client_streaming
    }

    pub fn output_streaming(&self) -> bool {
        self.method.server_streaming
    }
}

/// HTTP binding (resource or client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpBinding {
    pub step: StepDescriptor,
    pub target: GenerationTarget,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_override: Option<String>,
    /// Effective resource path
    pub path: String,
    pub input_streaming: bool,
    pub output_streaming: bool,
}

/// In-process client binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InProcessBinding {
    pub step: StepDescriptor,
    pub service_name: String,
    pub execution_mode: ExecutionMode,
}

/// Pipeline-level binding used to generate the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorBinding {
    /// Regular steps in pipeline order
    pub steps: Vec<StepDescriptor>,
    pub transport: TransportMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    pub input_streaming: bool,
    pub output_streaming: bool,
}

/// Adapter that forwards to a pre-existing implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAdapterBinding {
    pub step: StepDescriptor,
    pub service_name: String,
    pub delegate_service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegate_converter: Option<String>,
    /// Reactive shape of the delegate
    pub shape: StreamingShape,
}

/// Protocol realization of a step for one target kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Binding {
    RemoteService(RemoteServiceBinding),
    Http(HttpBinding),
    InProcess(InProcessBinding),
    Orchestrator(OrchestratorBinding),
    ExternalAdapter(ExternalAdapterBinding),
}

impl Binding {
    /// Step this binding realizes (none for the orchestrator)
    pub fn step(&self) -> Option<&StepDescriptor> {
        match self {
            Binding::RemoteService(b) => Some(&b.step),
            Binding::Http(b) => Some(&b.step),
            Binding::InProcess(b) => Some(&b.step),
            Binding::ExternalAdapter(b) => Some(&b.step),
            Binding::Orchestrator(_) => None,
        }
    }

    /// Generation target realized (none for the orchestrator)
    pub fn target(&self) -> Option<GenerationTarget> {
        match self {
            Binding::RemoteService(b) => Some(b.target),
            Binding::Http(b) => Some(b.target),
            Binding::InProcess(_) => Some(GenerationTarget::InProcessClient),
            Binding::ExternalAdapter(_) => Some(GenerationTarget::DelegatedAdapter),
            Binding::Orchestrator(_) => None,
        }
    }

    /// Deployment role the generated artifact belongs to
    pub fn deployment_role(&self) -> DeploymentRole {
        match self.step() {
            Some(step) => step.deployment_role(),
            None => DeploymentRole::OrchestratorClient,
        }
    }

    /// Short kind name used in logs and file names
    pub fn kind_name(&self) -> &'static str {
        match self {
            Binding::RemoteService(_) => "remote-service",
            Binding::Http(_) => "http",
            Binding::InProcess(_) => "in-process",
            Binding::Orchestrator(_) => "orchestrator",
            Binding::ExternalAdapter(_) => "external-adapter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeMapping;

    fn step() -> StepDescriptor {
        StepDescriptor::builder("ProcessOrder", "com.acme")
            .input(TypeMapping::of("com.acme.Order"))
            .output(TypeMapping::of("com.acme.Invoice"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_binding_key() {
        assert_eq!(
            binding_key(&step(), GenerationTarget::RemoteService),
            "ProcessOrderService_remote_service"
        );
    }

    #[test]
    fn test_binding_accessors() {
        let binding = Binding::InProcess(InProcessBinding {
            step: step(),
            service_name: "ProcessOrderService".to_string(),
            execution_mode: ExecutionMode::Default,
        });
        assert_eq!(binding.target(), Some(GenerationTarget::InProcessClient));
        assert_eq!(binding.step().map(|s| s.name()), Some("ProcessOrder"));
        assert_eq!(binding.kind_name(), "in-process");
    }

    #[test]
    fn test_orchestrator_role() {
        let binding = Binding::Orchestrator(OrchestratorBinding {
            steps: vec![step()],
            transport: TransportMode::Grpc,
            input_type: Some("com.acme.Order".to_string()),
            output_type: Some("com.acme.Invoice".to_string()),
            input_streaming: false,
            output_streaming: false,
        });
        assert_eq!(binding.deployment_role(), DeploymentRole::OrchestratorClient);
        let json = serde_json::to_value(&binding).unwrap();
        assert_eq!(json["kind"], "orchestrator");
    }
}
