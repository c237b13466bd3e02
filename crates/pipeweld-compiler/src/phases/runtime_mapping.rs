//! Runtime mapping
//!
//! Reads: `placement`, `step_models`.
//! Writes: `runtime_mapping_resolution`, `diagnostics`.
//!
//! Without a placement configuration the default configuration applies.

use crate::context::{CompilationContext, ContextStage};
use crate::error::Result;
use crate::phase::Phase;
use crate::runtime_mapping::RuntimeMappingResolver;
use pipeweld_core::PlacementConfig;

pub struct RuntimeMappingPhase;

impl Phase for RuntimeMappingPhase {
    fn name(&self) -> &'static str {
        "runtime-mapping"
    }

    fn stage(&self) -> ContextStage {
        ContextStage::Mapped
    }

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()> {
        let default_config;
        let config = match &ctx.placement {
            Some(config) => config,
            None => {
                default_config = PlacementConfig::default();
                &default_config
            }
        };

        let resolution = RuntimeMappingResolver::new(config).resolve_checked(&ctx.step_models)?;

        tracing::debug!(
            "Placed {} steps in {} modules ({} layout)",
            resolution.module_assignments().len(),
            resolution.modules_used().len(),
            resolution.layout()
        );

        for diagnostic in resolution.diagnostics().to_vec() {
            ctx.report(self.name(), diagnostic);
        }
        ctx.runtime_mapping_resolution = Some(resolution);
        Ok(())
    }
}
