//! Target resolution
//!
//! Reads: `step_models`, `runtime_mapping_resolution`, `options`.
//! Writes: `step_models` (with enabled targets), `client_models` in
//! orchestrator units.

use crate::context::{CompilationContext, ContextStage};
use crate::error::Result;
use crate::phase::Phase;
use crate::target::{TargetContext, TargetResolver};
use pipeweld_core::ir::DeploymentRole;
use pipeweld_core::StepDescriptor;

pub struct TargetResolutionPhase;

impl Phase for TargetResolutionPhase {
    fn name(&self) -> &'static str {
        "target-resolution"
    }

    fn stage(&self) -> ContextStage {
        ContextStage::TargetsResolved
    }

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()> {
        let (steps, clients) = {
            let resolution = ctx.require_resolution(self.name())?;
            let base = TargetContext {
                transport: ctx.options.transport,
                platform: ctx.options.platform,
                plugin_host: ctx.options.plugin_host,
                module_assignment: None,
                unit_module: ctx.unit_module(),
            };

            let resolve = |step: &StepDescriptor| -> StepDescriptor {
                let target_ctx = TargetContext {
                    module_assignment: resolution.module_for(step.name()),
                    ..base
                };
                let targets = TargetResolver::resolve(step, &target_ctx);
                tracing::debug!(
                    "Step '{}' ({}): {} target(s)",
                    step.name(),
                    step.deployment_role(),
                    targets.len()
                );
                step.with_enabled_targets(targets)
            };

            let steps: Vec<StepDescriptor> = ctx.step_models.iter().map(&resolve).collect();

            let clients: Vec<StepDescriptor> = if ctx.options.orchestrator {
                ctx.regular_steps()
                    .map(|step| resolve(&step.with_role(DeploymentRole::OrchestratorClient)))
                    .collect()
            } else {
                Vec::new()
            };

            (steps, clients)
        };

        ctx.step_models = steps;
        ctx.client_models = clients;
        Ok(())
    }
}
