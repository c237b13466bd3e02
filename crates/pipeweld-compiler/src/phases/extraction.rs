//! Extraction
//!
//! Reads: `step_sources`, `aspects`, `options`.
//! Writes: `step_models` (declared steps in order, then one synthetic step
//! per aspect, base step and payload type).

use crate::context::{CompilationContext, CompilerOptions, ContextStage};
use crate::error::{CompileError, Result};
use crate::phase::Phase;
use pipeweld_core::ir::{
    DeploymentRole, ExecutionMode, StepDescriptor, SyntheticOrigin, TransportMode, TypeMapping,
};
use pipeweld_core::naming::{pascal_case, simple_name};
use pipeweld_core::source::{AspectPosition, AspectSource, StepSource, TypeDecl};
use pipeweld_core::CoreError;
use std::collections::HashSet;

const SIDE_EFFECT_SUFFIX: &str = "SideEffect";

pub struct ExtractionPhase;

impl Phase for ExtractionPhase {
    fn name(&self) -> &'static str {
        "extraction"
    }

    fn stage(&self) -> ContextStage {
        ContextStage::Extracted
    }

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()> {
        let regular = ctx
            .step_sources
            .iter()
            .map(|source| extract_step(source, &ctx.options))
            .collect::<Result<Vec<_>>>()?;

        let synthetic = expand_aspects(&regular, &ctx.aspects, &ctx.options)?;

        tracing::debug!(
            "Extracted {} steps and {} synthetic steps",
            regular.len(),
            synthetic.len()
        );

        ctx.step_models = regular;
        ctx.step_models.extend(synthetic);
        Ok(())
    }
}

/// Build the descriptor of a declared step
pub fn extract_step(source: &StepSource, options: &CompilerOptions) -> Result<StepDescriptor> {
    let delegate = source.delegate.as_ref();

    let input = type_mapping(source.input.as_ref(), delegate.and_then(|d| d.input.as_deref()));
    let output = type_mapping(source.output.as_ref(), delegate.and_then(|d| d.output.as_deref()));

    if !input.is_resolved() || !output.is_resolved() {
        let message = if delegate.is_some() {
            "delegation step declares no types and its delegate provides none"
        } else {
            "input and output domain types must be declared"
        };
        return Err(CompileError::Extraction {
            step: source.name.clone(),
            message: message.to_string(),
        });
    }

    let role = match options.transport {
        TransportMode::Rest => DeploymentRole::RestServer,
        TransportMode::Grpc | TransportMode::Local => DeploymentRole::PipelineServer,
    };

    let mut builder = StepDescriptor::builder(&source.name, &source.namespace)
        .input(input)
        .output(output)
        .streaming_shape(delegate.and_then(|d| d.shape).unwrap_or(source.shape))
        .execution_mode(if source.blocking {
            ExecutionMode::OffloadedBlocking
        } else {
            ExecutionMode::Default
        })
        .role(role);

    if let Some(delegate) = delegate {
        builder = builder.delegate(&delegate.service, delegate.converter.clone());
    }
    if let Some(method) = &source.rpc_method {
        builder = builder.rpc_method(method);
    }
    if let Some(path) = &source.rest_path {
        builder = builder.rest_path(path);
    }
    if let Some(client) = &source.client_name {
        builder = builder.client_name(client);
    }

    builder.build().map_err(extraction_error)
}

/// Expand aspects into synthetic steps
///
/// Aspects are applied in declaration order, each against the base steps in
/// declaration order. A base step gets one synthetic per distinct payload.
pub fn expand_aspects(
    base_steps: &[StepDescriptor],
    aspects: &[AspectSource],
    options: &CompilerOptions,
) -> Result<Vec<StepDescriptor>> {
    let role = if options.plugin_host {
        DeploymentRole::PluginServer
    } else {
        DeploymentRole::PluginClient
    };

    let mut synthetic = Vec::new();
    let mut seen: HashSet<(String, String, String)> = HashSet::new();

    for aspect in aspects.iter().filter(|a| a.enabled) {
        for base in base_steps.iter().filter(|s| aspect.applies_to(s.name())) {
            for payload in payload_types(aspect, base) {
                let identity = (
                    base.name().to_string(),
                    aspect.id.clone(),
                    simple_name(&payload).to_string(),
                );
                if !seen.insert(identity) {
                    continue;
                }

                let step = StepDescriptor::builder(
                    synthetic_name(base.name(), &aspect.id, &payload),
                    base.namespace(),
                )
                .input(TypeMapping::of(payload.as_str()))
                .output(TypeMapping::of(payload.as_str()))
                .role(role)
                .synthetic(SyntheticOrigin {
                    aspect_id: aspect.id.clone(),
                    payload_type: payload.clone(),
                    base_step: base.name().to_string(),
                    base_namespace: base.namespace().to_string(),
                })
                .build()
                .map_err(extraction_error)?;

                synthetic.push(step);
            }
        }
    }

    Ok(synthetic)
}

/// `<base>$<AspectPascal><PayloadSimple>`, suffixed with `SideEffect`
/// unless the payload already ends with it
pub fn synthetic_name(base: &str, aspect_id: &str, payload_type: &str) -> String {
    let payload = simple_name(payload_type);
    let suffix = if payload.ends_with(SIDE_EFFECT_SUFFIX) {
        ""
    } else {
        SIDE_EFFECT_SUFFIX
    };
    format!("{}${}{}{}", base, pascal_case(aspect_id), payload, suffix)
}

fn payload_types(aspect: &AspectSource, base: &StepDescriptor) -> Vec<String> {
    if let Some(fixed) = aspect.payload_type.as_deref().filter(|p| !p.trim().is_empty()) {
        return vec![fixed.to_string()];
    }

    let input = base.input_type().domain_type();
    let output = base.output_type().domain_type();
    let candidates = match aspect.position {
        AspectPosition::Before => vec![input],
        AspectPosition::After => vec![output],
        AspectPosition::Around => vec![input, output],
    };

    let mut payloads: Vec<String> = Vec::new();
    for payload in candidates.into_iter().flatten() {
        if !payloads.iter().any(|p| p == payload) {
            payloads.push(payload.to_string());
        }
    }
    payloads
}

fn type_mapping(declared: Option<&TypeDecl>, delegate_type: Option<&str>) -> TypeMapping {
    let domain = declared
        .and_then(|d| d.type_name.as_deref())
        .filter(|t| !t.trim().is_empty())
        .or(delegate_type);
    let converter = declared.and_then(|d| d.converter.clone());

    match (domain, converter) {
        (Some(domain), Some(converter)) => TypeMapping::with_converter(domain, converter),
        (Some(domain), None) => TypeMapping::of(domain),
        (None, _) => TypeMapping::empty(),
    }
}

fn extraction_error(error: CoreError) -> CompileError {
    match error {
        CoreError::InvalidStep { step, message } => CompileError::Extraction { step, message },
        other => CompileError::Core(other),
    }
}
