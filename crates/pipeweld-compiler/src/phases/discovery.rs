//! Discovery
//!
//! Reads: `source`, `placement`, `descriptor_set`.
//! Writes: `step_sources`, `aspects`, and `placement` / `descriptor_set`
//! when the context does not already carry them.

use crate::context::{CompilationContext, ContextStage};
use crate::error::{CompileError, Result};
use crate::phase::Phase;
use pipeweld_core::Diagnostic;
use std::collections::HashSet;

pub struct DiscoveryPhase;

impl Phase for DiscoveryPhase {
    fn name(&self) -> &'static str {
        "discovery"
    }

    fn stage(&self) -> ContextStage {
        ContextStage::Discovered
    }

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()> {
        if let Some(source) = ctx.source.take() {
            let discovered = source.discover();
            let name = source.name().to_string();
            ctx.source = Some(source);
            let discovered = discovered?;

            tracing::debug!(
                "Source '{}' provided {} steps and {} aspects",
                name,
                discovered.steps.len(),
                discovered.aspects.len()
            );

            ctx.step_sources.extend(discovered.steps);
            ctx.aspects.extend(discovered.aspects);
            if ctx.placement.is_none() {
                ctx.placement = discovered.placement;
            }
            if ctx.descriptor_set.is_none() {
                ctx.descriptor_set = discovered.descriptor_set;
            }
        }

        let mut seen = HashSet::new();
        for step in &ctx.step_sources {
            if !seen.insert(step.name.as_str()) {
                return Err(CompileError::Discovery(format!(
                    "step '{}' is declared more than once",
                    step.name
                )));
            }
        }

        if ctx.step_sources.is_empty() {
            ctx.report(self.name(), Diagnostic::warning("no step descriptors discovered"));
        }

        Ok(())
    }
}
