//! Integration tests for the SDK compiler facade
//!
//! Loads project files from a temp directory, runs the full phase pipeline
//! and checks the returned output and the files written.

mod common;

use common::{TestProject, ORDER_PIPELINE};
use pipeweld_sdk::{
    Binding, CompilerBuilder, DeploymentRole, GenerationTarget, SdkError, TransportMode,
};

// ============================================================================
// Project Loading
// ============================================================================

#[test]
fn test_compile_project_file() -> anyhow::Result<()> {
    let project = TestProject::new();
    let path = project.write("pipeline.yaml", ORDER_PIPELINE);

    let output = CompilerBuilder::new()
        .add_project_file(path)
        .orchestrator(true)
        .output_root(project.output_root())
        .compile()?;

    assert_eq!(output.steps.len(), 4);
    assert_eq!(output.client_steps.len(), 2);
    assert!(!output.has_errors());

    let resolution = output.resolution.as_ref().unwrap();
    assert!(resolution
        .module_assignments()
        .values()
        .all(|module| module == "app"));

    assert!(output.binding("orchestrator").is_some());
    assert!(output.binding("ProcessOrderService_http_resource").is_some());
    assert_eq!(output.artifacts_for(DeploymentRole::RestServer).count(), 2);
    assert!(project.output_root().join("pipeweld-roles.json").exists());
    Ok(())
}

#[test]
fn test_missing_project_file() {
    let project = TestProject::new();
    let result = CompilerBuilder::new()
        .add_project_file(project.output_root().join("missing.yaml"))
        .build();
    assert!(matches!(result, Err(SdkError::IoError(_))));
}

#[test]
fn test_invalid_project_content() {
    let result = CompilerBuilder::new()
        .add_project_content("broken", "pipeline:\n  name: a\n  transport: carrier-pigeon\n")
        .build();
    match result {
        Err(SdkError::InvalidProjectFile { path, .. }) => assert_eq!(path, "broken"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected an error"),
    }
}

// ============================================================================
// Placement and Transport Overrides
// ============================================================================

#[test]
fn test_standalone_placement_overrides_embedded() {
    let project = TestProject::new();
    let path = project.write("pipeline.yaml", ORDER_PIPELINE);
    let placement = project.write(
        "placement.yaml",
        r#"
runtime-mapping:
  layout: per-module
  steps:
    ProcessOrder: orders-svc
"#,
    );

    let output = CompilerBuilder::new()
        .add_project_file(path)
        .with_placement_file(placement)
        .output_root(project.output_root())
        .compile()
        .unwrap();

    let resolution = output.resolution.as_ref().unwrap();
    assert_eq!(resolution.module_for("ProcessOrder"), Some("orders-svc"));
    assert_eq!(resolution.module_for("ShipOrder"), Some("ship-order-svc"));
    assert_eq!(
        resolution.client_overrides().get("process-order"),
        Some(&"orders-svc".to_string())
    );
}

#[test]
fn test_transport_override_switches_targets() {
    let project = TestProject::new();
    let path = project.write("pipeline.yaml", ORDER_PIPELINE);

    let output = CompilerBuilder::new()
        .add_project_file(path)
        .with_transport(TransportMode::Local)
        .orchestrator(true)
        .output_root(project.output_root())
        .compile()
        .unwrap();

    let targets: Vec<GenerationTarget> =
        output.bindings.values().filter_map(Binding::target).collect();
    assert!(!targets.is_empty());
    assert!(targets
        .iter()
        .all(|t| *t == GenerationTarget::InProcessClient));
}

#[test]
fn test_grpc_project_with_descriptor_file() {
    let project = TestProject::new();
    let path = project.write(
        "pipeline.yaml",
        r#"
pipeline:
  name: orders
  transport: grpc
  steps:
    - name: ProcessOrder
      namespace: com.acme.order
      input: { type: com.acme.Order }
      output: { type: com.acme.Invoice }
"#,
    );
    let descriptors = project.write(
        "descriptors.yaml",
        r#"
descriptor-set:
  package: acme.order
  type-prefix: com.acme.grpc
  services:
    - name: ProcessOrderService
      methods:
        - name: remoteProcess
          input: OrderMsg
          output: InvoiceMsg
  messages:
    - name: OrderMsg
    - name: InvoiceMsg
"#,
    );

    let output = CompilerBuilder::new()
        .add_project_file(path)
        .with_descriptor_file(descriptors)
        .output_root(project.output_root())
        .compile()
        .unwrap();

    match output.binding("ProcessOrderService_remote_service") {
        Some(Binding::RemoteService(binding)) => {
            assert_eq!(binding.method.input_type, "com.acme.grpc.OrderMsg");
            assert_eq!(binding.descriptor_ref, "acme.order.ProcessOrderService/remoteProcess");
        }
        other => panic!("unexpected binding: {:?}", other),
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_strict_placement_failure_keeps_diagnostics() {
    let project = TestProject::new();
    let path = project.write("pipeline.yaml", ORDER_PIPELINE);

    let err = CompilerBuilder::new()
        .add_project_file(path)
        .with_placement_content(
            "runtime-mapping:\n  modules:\n    orders-svc: {}\n  steps:\n    ProcessOrder: nowhere-svc\n",
        )
        .output_root(project.output_root())
        .compile()
        .unwrap_err();

    assert!(err.to_string().contains("unknown module 'nowhere-svc'"));
    let diagnostics = err.diagnostics();
    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics.last().unwrap().phase.as_deref(), Some("runtime-mapping"));
    assert!(!project.output_root().exists());
}

#[test]
fn test_output_json_summary() {
    let project = TestProject::new();
    let path = project.write("pipeline.yaml", ORDER_PIPELINE);

    let output = CompilerBuilder::new()
        .add_project_file(path)
        .output_root(project.output_root())
        .compile()
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
    assert_eq!(json["stage"], "finalized");
    assert_eq!(json["steps"].as_array().unwrap().len(), 4);
}
