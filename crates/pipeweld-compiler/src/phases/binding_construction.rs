//! Binding construction
//!
//! Reads: `step_models`, `client_models`, `descriptor_set`, `options`.
//! Writes: `renderer_bindings`.

use crate::binding::{orchestrator_binding, BindingConstructor};
use crate::context::{CompilationContext, ContextStage};
use crate::error::{CompileError, Result};
use crate::phase::Phase;
use indexmap::IndexMap;
use pipeweld_core::binding::ORCHESTRATOR_BINDING_KEY;
use pipeweld_core::{Binding, DescriptorSet};

pub struct BindingConstructionPhase;

impl Phase for BindingConstructionPhase {
    fn name(&self) -> &'static str {
        "binding-construction"
    }

    fn stage(&self) -> ContextStage {
        ContextStage::BindingsConstructed
    }

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()> {
        let empty = DescriptorSet::default();
        let descriptors = ctx.descriptor_set.as_ref().unwrap_or(&empty);
        let constructor =
            BindingConstructor::new(descriptors).with_package(descriptors.package.as_deref());

        let mut bindings: IndexMap<String, Binding> = IndexMap::new();
        for step in ctx.step_models.iter().chain(ctx.client_models.iter()) {
            for (key, binding) in constructor.construct(step)? {
                if bindings.contains_key(&key) {
                    return Err(CompileError::Semantic(format!(
                        "binding key '{}' is produced twice",
                        key
                    )));
                }
                bindings.insert(key, binding);
            }
        }

        if ctx.options.orchestrator {
            let binding = orchestrator_binding(&ctx.step_models, ctx.options.transport);
            bindings.insert(
                ORCHESTRATOR_BINDING_KEY.to_string(),
                Binding::Orchestrator(binding),
            );
        }

        tracing::debug!("Constructed {} bindings", bindings.len());
        ctx.renderer_bindings.extend(bindings);
        Ok(())
    }
}
