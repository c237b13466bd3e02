//! Binding construction
//!
//! Turns every enabled target of a step into a protocol `Binding`. Remote
//! targets are resolved through a `SchemaResolver`; any lookup failure is
//! fatal. Nothing here touches the filesystem.

use crate::error::{CompileError, Result};
use pipeweld_core::binding::{
    binding_key, Binding, ExternalAdapterBinding, HttpBinding, InProcessBinding,
    OrchestratorBinding, RemoteServiceBinding,
};
use pipeweld_core::ir::{GenerationTarget, StepDescriptor, StreamingShape, TransportMode};
use pipeweld_core::naming::kebab_case;
use pipeweld_core::schema::{ResolvedMethod, SchemaResolver};
use pipeweld_core::CoreError;

/// Builds bindings for steps against one schema resolver
pub struct BindingConstructor<'a> {
    schema: &'a dyn SchemaResolver,
    package: Option<&'a str>,
}

impl<'a> BindingConstructor<'a> {
    pub fn new(schema: &'a dyn SchemaResolver) -> Self {
        Self {
            schema,
            package: None,
        }
    }

    /// Protocol package used in method descriptor references
    pub fn with_package(mut self, package: Option<&'a str>) -> Self {
        self.package = package;
        self
    }

    /// Bindings for every enabled target of `step`, keyed `<serviceName>_<target>`
    pub fn construct(&self, step: &StepDescriptor) -> Result<Vec<(String, Binding)>> {
        let mut bindings = Vec::with_capacity(step.enabled_targets().len());

        for &target in step.enabled_targets() {
            let binding = match target {
                GenerationTarget::RemoteService | GenerationTarget::RemoteClient => {
                    Binding::RemoteService(self.remote_binding(step, target)?)
                }
                GenerationTarget::HttpResource | GenerationTarget::HttpClient => {
                    Binding::Http(http_binding(step, target))
                }
                GenerationTarget::InProcessClient => Binding::InProcess(InProcessBinding {
                    step: step.clone(),
                    service_name: step.service_name(),
                    execution_mode: step.execution_mode(),
                }),
                GenerationTarget::DelegatedAdapter => {
                    Binding::ExternalAdapter(adapter_binding(step)?)
                }
            };
            bindings.push((binding_key(step, target), binding));
        }

        Ok(bindings)
    }

    fn remote_binding(
        &self,
        step: &StepDescriptor,
        target: GenerationTarget,
    ) -> Result<RemoteServiceBinding> {
        let service_name = step.service_name();
        let method = self
            .schema
            .resolve_method(&service_name, step.rpc_method())
            .map_err(|e| schema_error(&service_name, e))?;

        check_streaming(&service_name, &method, step.streaming_shape())?;

        Ok(RemoteServiceBinding {
            step: step.clone(),
            target,
            descriptor_ref: method.descriptor_ref(self.package),
            service_name,
            method,
        })
    }
}

/// Pipeline-level binding for the orchestrator of `steps`
///
/// Side-effect steps are skipped; the pipeline's input is the first regular
/// step's input and its output the last regular step's output.
pub fn orchestrator_binding(steps: &[StepDescriptor], transport: TransportMode) -> OrchestratorBinding {
    let regular: Vec<StepDescriptor> = steps
        .iter()
        .filter(|s| !s.is_side_effect())
        .cloned()
        .collect();

    let first = regular.first();
    let last = regular.last();

    OrchestratorBinding {
        input_type: first.and_then(|s| s.input_type().domain_type().map(str::to_string)),
        output_type: last.and_then(|s| s.output_type().domain_type().map(str::to_string)),
        input_streaming: first.map_or(false, |s| s.streaming_shape().input_streaming()),
        output_streaming: last.map_or(false, |s| s.streaming_shape().output_streaming()),
        transport,
        steps: regular,
    }
}

/// Default HTTP path of a step, `/<kebab-base-name>/process`
pub fn default_http_path(step: &StepDescriptor) -> String {
    format!("/{}/process", kebab_case(step.base_name()))
}

fn http_binding(step: &StepDescriptor, target: GenerationTarget) -> HttpBinding {
    let path_override = step
        .rest_path()
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string);
    let shape = step.streaming_shape();

    HttpBinding {
        step: step.clone(),
        target,
        service_name: step.service_name(),
        path: path_override
            .clone()
            .unwrap_or_else(|| default_http_path(step)),
        path_override,
        input_streaming: shape.input_streaming(),
        output_streaming: shape.output_streaming(),
    }
}

fn adapter_binding(step: &StepDescriptor) -> Result<ExternalAdapterBinding> {
    let delegate_service = step
        .delegate_service()
        .ok_or_else(|| CompileError::Extraction {
            step: step.name().to_string(),
            message: "delegated adapter target on a step without a delegate".to_string(),
        })?;

    Ok(ExternalAdapterBinding {
        step: step.clone(),
        service_name: step.service_name(),
        delegate_service: delegate_service.to_string(),
        delegate_converter: step.delegate_converter().map(str::to_string),
        shape: step.streaming_shape(),
    })
}

fn schema_error(service: &str, error: CoreError) -> CompileError {
    let message = match error {
        CoreError::Schema { message, .. } => message,
        other => other.to_string(),
    };
    CompileError::SchemaResolution {
        service: service.to_string(),
        message,
    }
}

fn check_streaming(service: &str, method: &ResolvedMethod, shape: StreamingShape) -> Result<()> {
    let declared = StreamingShape::from_flags(method.client_streaming, method.server_streaming);
    if declared != shape {
        return Err(CompileError::SchemaResolution {
            service: service.to_string(),
            message: format!(
                "method '{}' is {} but the step is {}",
                method.method, declared, shape
            ),
        });
    }
    Ok(())
}
