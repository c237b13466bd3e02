//! Unit tests for target resolution and binding construction
//!
//! Exercises the public resolver APIs directly, without running the phase
//! pipeline.

use pipeweld_compiler::binding::{default_http_path, orchestrator_binding};
use pipeweld_compiler::*;
use pipeweld_core::ir::{
    DeploymentRole, GenerationTarget, PlatformMode, StepDescriptor, StreamingShape, TransportMode,
    TypeMapping,
};
use pipeweld_core::placement::{PlacementConfig, ValidationMode};
use pipeweld_core::schema::{DescriptorSet, MethodDescriptor, ServiceDescriptor};
use pipeweld_core::Binding;
use std::collections::BTreeSet;

fn order_step() -> StepDescriptor {
    StepDescriptor::builder("ProcessOrder", "com.acme.order")
        .input(TypeMapping::of("com.acme.Order"))
        .output(TypeMapping::of("com.acme.Invoice"))
        .build()
        .unwrap()
}

fn order_descriptors() -> DescriptorSet {
    DescriptorSet {
        package: Some("acme.order".to_string()),
        type_prefix: Some("com.acme.grpc".to_string()),
        ..DescriptorSet::default()
    }
    .with_service(ServiceDescriptor {
        name: "ProcessOrderService".to_string(),
        methods: vec![MethodDescriptor {
            name: "remoteProcess".to_string(),
            input: "OrderMsg".to_string(),
            output: "InvoiceMsg".to_string(),
            client_streaming: false,
            server_streaming: false,
        }],
    })
    .with_message("OrderMsg", None)
    .with_message("InvoiceMsg", None)
}

fn targets(list: &[GenerationTarget]) -> BTreeSet<GenerationTarget> {
    list.iter().copied().collect()
}

// =============================================================================
// Target Resolver Tests
// =============================================================================

#[test]
fn test_target_table_is_total() {
    let platforms = [PlatformMode::Standard, PlatformMode::Function];

    for role in DeploymentRole::ALL {
        for transport in TransportMode::ALL {
            let base = TargetResolver::base_targets(role, transport);
            if transport == TransportMode::Local {
                assert!(base.iter().all(|t| !t.is_network()), "{role} {transport}");
            }

            for platform in platforms {
                for plugin_host in [false, true] {
                    let ctx = TargetContext {
                        transport,
                        platform,
                        plugin_host,
                        module_assignment: Some("orders-svc"),
                        unit_module: Some("orders-svc"),
                    };
                    let step = order_step().with_role(role);
                    let resolved = TargetResolver::resolve(&step, &ctx);
                    assert!(resolved.len() <= 2);
                    if transport == TransportMode::Local {
                        assert!(resolved.iter().all(|t| !t.is_network()));
                    }
                    if platform == PlatformMode::Function {
                        assert!(!resolved.contains(&GenerationTarget::RemoteService));
                        assert!(!resolved.contains(&GenerationTarget::RemoteClient));
                    }
                }
            }
        }
    }
}

#[test]
fn test_base_table_rows() {
    use GenerationTarget::*;

    let cases = [
        (DeploymentRole::PipelineServer, TransportMode::Grpc, vec![RemoteService]),
        (DeploymentRole::PipelineServer, TransportMode::Rest, vec![HttpResource]),
        (DeploymentRole::RestServer, TransportMode::Grpc, vec![HttpResource]),
        (DeploymentRole::OrchestratorClient, TransportMode::Grpc, vec![RemoteClient]),
        (DeploymentRole::OrchestratorClient, TransportMode::Rest, vec![HttpClient]),
        (DeploymentRole::OrchestratorClient, TransportMode::Local, vec![InProcessClient]),
        (DeploymentRole::PluginClient, TransportMode::Local, vec![InProcessClient]),
        (DeploymentRole::PluginServer, TransportMode::Local, vec![]),
    ];

    for (role, transport, expected) in cases {
        assert_eq!(
            TargetResolver::base_targets(role, transport),
            targets(&expected),
            "{role} {transport}"
        );
    }
}

#[test]
fn test_local_mode_suppresses_network_targets() {
    let ctx = TargetContext {
        transport: TransportMode::Local,
        platform: PlatformMode::Standard,
        plugin_host: true,
        module_assignment: None,
        unit_module: None,
    };
    for role in DeploymentRole::ALL {
        let resolved = TargetResolver::resolve(&order_step().with_role(role), &ctx);
        assert!(resolved.iter().all(|t| !t.is_network()), "{role}");
    }
}

// =============================================================================
// Binding Constructor Tests
// =============================================================================

#[test]
fn test_remote_binding_resolves_language_types() {
    let set = order_descriptors();
    let step = order_step().with_enabled_targets(targets(&[GenerationTarget::RemoteService]));
    let bindings = BindingConstructor::new(&set)
        .with_package(set.package.as_deref())
        .construct(&step)
        .unwrap();

    match &bindings[0].1 {
        Binding::RemoteService(binding) => {
            assert_eq!(binding.method.input_type, "com.acme.grpc.OrderMsg");
            assert_eq!(binding.method.output_type, "com.acme.grpc.InvoiceMsg");
            assert_eq!(
                binding.descriptor_ref,
                "acme.order.ProcessOrderService/remoteProcess"
            );
            assert!(!binding.input_streaming());
        }
        other => panic!("unexpected binding: {:?}", other),
    }
}

#[test]
fn test_unknown_method_is_fatal() {
    let set = order_descriptors();
    let step = StepDescriptor::builder("ProcessOrder", "com.acme.order")
        .input(TypeMapping::of("com.acme.Order"))
        .output(TypeMapping::of("com.acme.Invoice"))
        .rpc_method("process")
        .enabled_targets(targets(&[GenerationTarget::RemoteClient]))
        .build()
        .unwrap();

    let err = BindingConstructor::new(&set).construct(&step).unwrap_err();
    match err {
        CompileError::SchemaResolution { service, message } => {
            assert_eq!(service, "ProcessOrderService");
            assert!(message.contains("'process'"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unresolved_message_is_fatal_in_lenient_pipeline() {
    let mut set = order_descriptors();
    set.messages.retain(|m| m.name != "InvoiceMsg");

    let source = InMemorySource::new()
        .with_step(
            pipeweld_core::StepSource::new("ProcessOrder", "com.acme.order")
                .with_types("com.acme.Order", "com.acme.Invoice"),
        )
        .with_placement(PlacementConfig::default().with_validation(ValidationMode::Lenient))
        .with_descriptor_set(set);

    let dir = tempfile::tempdir().unwrap();
    let options = CompilerOptions {
        output_root: dir.path().to_path_buf(),
        ..CompilerOptions::default()
    };
    let mut ctx = CompilationContext::new(options).with_source(Box::new(source));
    let err = PhaseOrchestrator::standard().run(&mut ctx).unwrap_err();

    assert_eq!(err.phase(), Some("binding-construction"));
    assert!(err.to_string().contains("ProcessOrderService"));
    assert!(err.to_string().contains("unresolved message type 'InvoiceMsg'"));
    assert!(ctx.generated_artifacts.is_empty());
}

#[test]
fn test_http_binding_paths() {
    let step = order_step();
    assert_eq!(default_http_path(&step), "/process-order/process");

    let set = DescriptorSet::default();
    let streaming = StepDescriptor::builder("ProcessOrder", "com.acme.order")
        .input(TypeMapping::of("com.acme.Order"))
        .output(TypeMapping::of("com.acme.Invoice"))
        .streaming_shape(StreamingShape::StreamStream)
        .enabled_targets(targets(&[GenerationTarget::HttpResource]))
        .build()
        .unwrap();
    let bindings = BindingConstructor::new(&set).construct(&streaming).unwrap();
    match &bindings[0].1 {
        Binding::Http(binding) => {
            assert!(binding.input_streaming);
            assert!(binding.output_streaming);
            assert_eq!(binding.path, "/process-order/process");
        }
        other => panic!("unexpected binding: {:?}", other),
    }
}

#[test]
fn test_orchestrator_binding_of_empty_pipeline() {
    let binding = orchestrator_binding(&[], TransportMode::Rest);
    assert!(binding.steps.is_empty());
    assert!(binding.input_type.is_none());
    assert_eq!(binding.transport, TransportMode::Rest);
}
