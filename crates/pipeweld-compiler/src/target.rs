//! Target resolution
//!
//! The base target set is a total table over `(DeploymentRole,
//! TransportMode)`; placement and plugin-host rules then narrow it.

use pipeweld_core::ir::{
    DeploymentRole, GenerationTarget, PlatformMode, StepDescriptor, TransportMode,
};
use std::collections::BTreeSet;

/// Unit-level facts the target rules depend on
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    pub transport: TransportMode,
    pub platform: PlatformMode,
    pub plugin_host: bool,
    /// Module the runtime mapping resolver assigned to the step
    pub module_assignment: Option<&'a str>,
    /// Module this unit builds
    pub unit_module: Option<&'a str>,
}

/// Stateless target resolver
pub struct TargetResolver;

impl TargetResolver {
    /// Targets for a role under a transport, before any unit rule applies
    pub fn base_targets(role: DeploymentRole, transport: TransportMode) -> BTreeSet<GenerationTarget> {
        use DeploymentRole::*;
        use GenerationTarget::*;

        let targets: &[GenerationTarget] = match (role, transport) {
            (PipelineServer, TransportMode::Grpc) => &[RemoteService],
            (PipelineServer, TransportMode::Rest) => &[HttpResource],
            (PipelineServer, TransportMode::Local) => &[],
            (PluginServer, TransportMode::Grpc) => &[RemoteService],
            (PluginServer, TransportMode::Rest) => &[HttpResource],
            (PluginServer, TransportMode::Local) => &[],
            (RestServer, TransportMode::Grpc) => &[HttpResource],
            (RestServer, TransportMode::Rest) => &[HttpResource],
            (RestServer, TransportMode::Local) => &[],
            (OrchestratorClient, TransportMode::Grpc) => &[RemoteClient],
            (OrchestratorClient, TransportMode::Rest) => &[HttpClient],
            (OrchestratorClient, TransportMode::Local) => &[InProcessClient],
            (PluginClient, TransportMode::Grpc) => &[RemoteClient],
            (PluginClient, TransportMode::Rest) => &[HttpClient],
            (PluginClient, TransportMode::Local) => &[InProcessClient],
        };

        targets.iter().copied().collect()
    }

    /// Enabled targets for a step in this unit
    pub fn resolve(step: &StepDescriptor, ctx: &TargetContext<'_>) -> BTreeSet<GenerationTarget> {
        let role = step.deployment_role();
        let mut targets = Self::base_targets(role, ctx.transport);

        if ctx.platform == PlatformMode::Function {
            targets = targets.into_iter().map(function_target).collect();
        }

        if step.is_delegation() && role.is_server() {
            targets.insert(GenerationTarget::DelegatedAdapter);
        }

        match role {
            DeploymentRole::PluginServer => {
                let assigned = ctx
                    .module_assignment
                    .map_or(false, |module| !module.trim().is_empty());
                if !ctx.plugin_host && !assigned {
                    targets.retain(|t| t.is_client());
                }
            }
            DeploymentRole::PluginClient => {
                if ctx.plugin_host {
                    targets.retain(|t| !t.is_client());
                }
            }
            DeploymentRole::PipelineServer | DeploymentRole::RestServer => {
                if let (Some(assigned), Some(unit)) = (ctx.module_assignment, ctx.unit_module) {
                    if assigned != unit {
                        targets.retain(|t| t.is_client());
                    }
                }
            }
            DeploymentRole::OrchestratorClient => {}
        }

        targets
    }
}

/// Function platforms only expose HTTP entry points
fn function_target(target: GenerationTarget) -> GenerationTarget {
    match target {
        GenerationTarget::RemoteService => GenerationTarget::HttpResource,
        GenerationTarget::RemoteClient => GenerationTarget::HttpClient,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeweld_core::ir::{SyntheticOrigin, TypeMapping};

    fn ctx(transport: TransportMode) -> TargetContext<'static> {
        TargetContext {
            transport,
            platform: PlatformMode::Standard,
            plugin_host: false,
            module_assignment: None,
            unit_module: None,
        }
    }

    fn step(role: DeploymentRole) -> StepDescriptor {
        StepDescriptor::builder("ProcessOrder", "pkg")
            .input(TypeMapping::of("A"))
            .output(TypeMapping::of("B"))
            .role(role)
            .build()
            .unwrap()
    }

    fn side_effect(role: DeploymentRole) -> StepDescriptor {
        StepDescriptor::builder("ProcessOrder$PersistenceB", "pkg")
            .input(TypeMapping::of("B"))
            .output(TypeMapping::of("B"))
            .role(role)
            .synthetic(SyntheticOrigin {
                aspect_id: "persistence".to_string(),
                payload_type: "B".to_string(),
                base_step: "ProcessOrder".to_string(),
                base_namespace: "pkg".to_string(),
            })
            .build()
            .unwrap()
    }

    fn set(targets: &[GenerationTarget]) -> BTreeSet<GenerationTarget> {
        targets.iter().copied().collect()
    }

    #[test]
    fn test_grpc_pipeline_server() {
        let targets = TargetResolver::resolve(&step(DeploymentRole::PipelineServer), &ctx(TransportMode::Grpc));
        assert_eq!(targets, set(&[GenerationTarget::RemoteService]));
    }

    #[test]
    fn test_function_platform_maps_to_http() {
        let mut context = ctx(TransportMode::Grpc);
        context.platform = PlatformMode::Function;
        let server = TargetResolver::resolve(&step(DeploymentRole::PipelineServer), &context);
        let client = TargetResolver::resolve(&step(DeploymentRole::OrchestratorClient), &context);
        assert_eq!(server, set(&[GenerationTarget::HttpResource]));
        assert_eq!(client, set(&[GenerationTarget::HttpClient]));
    }

    #[test]
    fn test_plugin_server_needs_host_or_assignment() {
        let plugin = side_effect(DeploymentRole::PluginServer);
        assert!(TargetResolver::resolve(&plugin, &ctx(TransportMode::Grpc)).is_empty());

        let mut host = ctx(TransportMode::Grpc);
        host.plugin_host = true;
        assert_eq!(
            TargetResolver::resolve(&plugin, &host),
            set(&[GenerationTarget::RemoteService])
        );

        let mut colocated = ctx(TransportMode::Grpc);
        colocated.module_assignment = Some("orders-svc");
        assert_eq!(
            TargetResolver::resolve(&plugin, &colocated),
            set(&[GenerationTarget::RemoteService])
        );

        let mut blank = ctx(TransportMode::Grpc);
        blank.module_assignment = Some("  ");
        assert!(TargetResolver::resolve(&plugin, &blank).is_empty());
    }

    #[test]
    fn test_plugin_host_has_no_self_client() {
        let plugin = side_effect(DeploymentRole::PluginClient);
        assert_eq!(
            TargetResolver::resolve(&plugin, &ctx(TransportMode::Rest)),
            set(&[GenerationTarget::HttpClient])
        );

        let mut host = ctx(TransportMode::Rest);
        host.plugin_host = true;
        assert!(TargetResolver::resolve(&plugin, &host).is_empty());
    }

    #[test]
    fn test_pipeline_server_in_other_module() {
        let mut context = ctx(TransportMode::Grpc);
        context.module_assignment = Some("billing-svc");
        context.unit_module = Some("orders-svc");
        assert!(TargetResolver::resolve(&step(DeploymentRole::PipelineServer), &context).is_empty());

        context.unit_module = Some("billing-svc");
        assert_eq!(
            TargetResolver::resolve(&step(DeploymentRole::PipelineServer), &context),
            set(&[GenerationTarget::RemoteService])
        );
    }

    #[test]
    fn test_delegation_adapter_survives_local_mode() {
        let delegated = StepDescriptor::builder("Price", "pkg")
            .input(TypeMapping::of("A"))
            .output(TypeMapping::of("B"))
            .delegate("com.legacy.PricingService", None)
            .build()
            .unwrap();
        assert_eq!(
            TargetResolver::resolve(&delegated, &ctx(TransportMode::Local)),
            set(&[GenerationTarget::DelegatedAdapter])
        );
        assert_eq!(
            TargetResolver::resolve(&delegated, &ctx(TransportMode::Grpc)),
            set(&[GenerationTarget::RemoteService, GenerationTarget::DelegatedAdapter])
        );
    }
}
