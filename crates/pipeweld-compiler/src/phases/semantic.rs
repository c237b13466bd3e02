//! Semantic analysis
//!
//! Reads: `step_models`, `runtime_mapping_resolution`, `options`.
//! Writes: `step_models` (co-located plugin steps become plugin servers),
//! `diagnostics`.
//!
//! Errors are collected over all steps and the first one fails the phase.

use crate::context::{CompilationContext, ContextStage};
use crate::error::{CompileError, Result};
use crate::phase::Phase;
use pipeweld_core::ir::{DeploymentRole, ExecutionMode};
use pipeweld_core::{Diagnostic, StepDescriptor};
use std::collections::HashSet;

/// Findings of one analysis run
#[derive(Debug, Default)]
pub struct AnalysisResult {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl AnalysisResult {
    fn add_error(&mut self, subject: &str, message: impl Into<String>) {
        self.errors.push(Diagnostic::error(message).with_subject(subject));
    }

    fn add_warning(&mut self, subject: &str, message: impl Into<String>) {
        self.warnings.push(Diagnostic::warning(message).with_subject(subject));
    }
}

pub struct SemanticAnalysisPhase;

impl SemanticAnalysisPhase {
    /// Check policy over the extracted steps
    pub fn analyze(steps: &[StepDescriptor], plugin_host: bool, orchestrator: bool) -> AnalysisResult {
        let mut result = AnalysisResult::default();
        let mut names = HashSet::new();

        for step in steps {
            if !names.insert(step.name()) {
                result.add_error(step.name(), "step name is not unique");
            }

            if step.execution_mode() == ExecutionMode::OffloadedBlocking
                && step.streaming_shape().input_streaming()
            {
                result.add_warning(
                    step.name(),
                    "blocking execution on a streaming input holds a worker for the whole stream",
                );
            }

            if step.is_delegation() && step.delegate_converter().is_none() {
                let converters = step.input_type().has_converter || step.output_type().has_converter;
                if converters {
                    result.add_warning(
                        step.name(),
                        "step declares converters but its delegate has none; delegate types must match the step's",
                    );
                }
            }
        }

        if plugin_host && !steps.iter().any(|s| s.is_side_effect()) {
            result.add_warning("plugin-host", "unit is the plugin host but no aspect produced side-effect steps");
        }

        if orchestrator && !steps.iter().any(|s| !s.is_side_effect()) {
            result.add_error("orchestrator", "orchestrator unit has no pipeline steps");
        }

        result
    }
}

impl Phase for SemanticAnalysisPhase {
    fn name(&self) -> &'static str {
        "semantic-analysis"
    }

    fn stage(&self) -> ContextStage {
        ContextStage::Analyzed
    }

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()> {
        let result = Self::analyze(&ctx.step_models, ctx.options.plugin_host, ctx.options.orchestrator);

        for warning in result.warnings {
            ctx.report(self.name(), warning);
        }
        let first_error = result.errors.first().map(|e| e.to_string());
        for error in result.errors {
            ctx.report(self.name(), error);
        }
        if let Some(message) = first_error {
            return Err(CompileError::Semantic(message));
        }

        // Synthetic steps placed in this unit's module run here
        let refined: Vec<StepDescriptor> = {
            let resolution = ctx.require_resolution(self.name())?;
            let unit = ctx.unit_module();
            ctx.step_models
                .iter()
                .map(|step| {
                    let colocated = step.deployment_role() == DeploymentRole::PluginClient
                        && unit.is_some()
                        && resolution.module_for(step.name()) == unit;
                    if colocated {
                        tracing::debug!("Plugin step '{}' is co-located with this unit", step.name());
                        step.with_role(DeploymentRole::PluginServer)
                    } else {
                        step.clone()
                    }
                })
                .collect()
        };
        ctx.step_models = refined;

        Ok(())
    }
}
