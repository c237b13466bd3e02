//! End-to-end phase pipeline tests
//!
//! Runs the standard orchestrator over in-memory descriptors and checks the
//! context it leaves behind and the files written under a temp directory.

use pipeweld_compiler::phases::ROLE_METADATA_FILE;
use pipeweld_compiler::*;
use pipeweld_core::ir::{DeploymentRole, GenerationTarget, TransportMode};
use pipeweld_core::placement::{Layout, PlacementConfig};
use pipeweld_core::schema::{DescriptorSet, MethodDescriptor, ServiceDescriptor};
use pipeweld_core::source::{AspectSource, DelegateDecl, StepSource};
use pipeweld_core::Binding;
use tempfile::TempDir;

fn order_pipeline() -> InMemorySource {
    InMemorySource::new()
        .with_step(
            StepSource::new("ProcessOrder", "com.acme.order")
                .with_types("com.acme.Order", "com.acme.Invoice"),
        )
        .with_step(
            StepSource::new("ShipOrder", "com.acme.shipping")
                .with_types("com.acme.Invoice", "com.acme.Shipment"),
        )
        .with_aspect(AspectSource::new("persistence"))
}

fn options(dir: &TempDir, transport: TransportMode) -> CompilerOptions {
    CompilerOptions {
        transport,
        orchestrator: true,
        output_root: dir.path().to_path_buf(),
        ..CompilerOptions::default()
    }
}

fn run(options: CompilerOptions, source: InMemorySource) -> CompilationContext {
    let mut ctx = CompilationContext::new(options).with_source(Box::new(source));
    PhaseOrchestrator::standard().run(&mut ctx).unwrap();
    ctx
}

#[test]
fn test_rest_orchestrator_unit() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = run(options(&dir, TransportMode::Rest), order_pipeline());

    assert_eq!(ctx.stage, ContextStage::Finalized);
    assert_eq!(ctx.step_models.len(), 4);
    assert_eq!(ctx.client_models.len(), 2);

    let keys: Vec<&str> = ctx.renderer_bindings.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "ProcessOrderService_http_resource",
            "ShipOrderService_http_resource",
            "ProcessOrder$PersistenceInvoiceSideEffectService_http_client",
            "ShipOrder$PersistenceShipmentSideEffectService_http_client",
            "ProcessOrderService_http_client",
            "ShipOrderService_http_client",
            "orchestrator",
        ]
    );

    match &ctx.renderer_bindings["orchestrator"] {
        Binding::Orchestrator(binding) => {
            assert_eq!(binding.steps.len(), 2);
            assert_eq!(binding.input_type.as_deref(), Some("com.acme.Order"));
            assert_eq!(binding.output_type.as_deref(), Some("com.acme.Shipment"));
        }
        other => panic!("unexpected binding: {:?}", other),
    }

    assert_eq!(ctx.generated_artifacts.len(), 7);
    for artifact in &ctx.generated_artifacts {
        assert!(artifact.path.exists(), "{}", artifact.path.display());
    }
    assert!(dir
        .path()
        .join("rest-server")
        .join("ProcessOrderService_http_resource.json")
        .exists());

    let roles: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join(ROLE_METADATA_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(roles["roles"]["rest-server"].as_array().unwrap().len(), 2);
    assert_eq!(roles["roles"]["plugin-client"].as_array().unwrap().len(), 2);
    assert_eq!(roles["roles"]["orchestrator-client"].as_array().unwrap().len(), 3);
    assert_eq!(roles["modules"]["ProcessOrder"], "process-order-svc");
}

#[test]
fn test_colocated_plugin_module_unit() {
    let dir = tempfile::tempdir().unwrap();
    let options = CompilerOptions {
        transport: TransportMode::Rest,
        module_name: Some("process-order-svc".to_string()),
        output_root: dir.path().to_path_buf(),
        ..CompilerOptions::default()
    };
    let ctx = run(options, order_pipeline());

    let synthetic = ctx
        .step_models
        .iter()
        .find(|s| s.name() == "ProcessOrder$PersistenceInvoiceSideEffect")
        .unwrap();
    assert_eq!(synthetic.deployment_role(), DeploymentRole::PluginServer);

    let keys: Vec<&str> = ctx.renderer_bindings.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "ProcessOrderService_http_resource",
            "ProcessOrder$PersistenceInvoiceSideEffectService_http_resource",
            "ShipOrder$PersistenceShipmentSideEffectService_http_client",
        ]
    );
}

#[test]
fn test_grpc_unit_binds_schema() -> anyhow::Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let descriptors = DescriptorSet {
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
    .with_message("InvoiceMsg", None);

    let source = InMemorySource::new()
        .with_step(
            StepSource::new("ProcessOrder", "com.acme.order")
                .with_types("com.acme.Order", "com.acme.Invoice"),
        )
        .with_descriptor_set(descriptors);
    let mut ctx =
        CompilationContext::new(options(&dir, TransportMode::Grpc)).with_source(Box::new(source));
    PhaseOrchestrator::standard().run(&mut ctx)?;

    let server = &ctx.renderer_bindings["ProcessOrderService_remote_service"];
    let client = &ctx.renderer_bindings["ProcessOrderService_remote_client"];
    assert_eq!(server.deployment_role(), DeploymentRole::PipelineServer);
    assert_eq!(client.deployment_role(), DeploymentRole::OrchestratorClient);
    match client {
        Binding::RemoteService(binding) => {
            assert_eq!(binding.target, GenerationTarget::RemoteClient);
            assert_eq!(binding.method.output_type, "com.acme.grpc.InvoiceMsg");
        }
        other => panic!("unexpected binding: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_local_unit_with_delegation() {
    let dir = tempfile::tempdir().unwrap();
    let source = InMemorySource::new()
        .with_step(
            StepSource::new("ProcessOrder", "com.acme.order")
                .with_types("com.acme.Order", "com.acme.Invoice"),
        )
        .with_step(StepSource::new("PriceInvoice", "com.acme.pricing").with_delegate(
            DelegateDecl {
                service: "com.legacy.PricingService".to_string(),
                converter: None,
                input: Some("com.acme.Invoice".to_string()),
                output: Some("com.acme.PricedInvoice".to_string()),
                shape: None,
            },
        ));
    let ctx = run(options(&dir, TransportMode::Local), source);

    let keys: Vec<&str> = ctx.renderer_bindings.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "PriceInvoiceService_external_adapter",
            "ProcessOrderService_local_client",
            "PriceInvoiceService_local_client",
            "orchestrator",
        ]
    );
    assert!(ctx
        .renderer_bindings
        .values()
        .filter_map(|b| b.target())
        .all(|t| !t.is_network()));
}

#[test]
fn test_strict_placement_failure_stops_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let source = order_pipeline().with_placement(
        PlacementConfig::new(Layout::PerModule)
            .with_module("orders-svc", None)
            .with_step("ProcessOrder", "unknown-svc")
            .with_step("ShipOrder", "other-svc"),
    );
    let mut ctx =
        CompilationContext::new(options(&dir, TransportMode::Rest)).with_source(Box::new(source));

    let err = PhaseOrchestrator::standard().run(&mut ctx).unwrap_err();
    assert_eq!(err.phase(), Some("runtime-mapping"));
    match err.root() {
        CompileError::RuntimeMapping { errors } => assert_eq!(errors.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ctx.stage, ContextStage::Extracted);
    assert!(ctx.renderer_bindings.is_empty());
    assert!(!dir.path().join(ROLE_METADATA_FILE).exists());
}
