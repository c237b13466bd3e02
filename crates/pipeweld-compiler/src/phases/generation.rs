//! Generation
//!
//! Reads: `renderer_bindings`, `aspects`, `descriptor_set`, `options`.
//! Writes: `generated_artifacts`, `diagnostics`.
//!
//! An I/O failure in a renderer is reported as a warning and the remaining
//! bindings are still rendered; a malformed binding fails the phase.

use crate::codegen::{GeneratedArtifact, GenerationContext, RenderError, Renderer};
use crate::context::{CompilationContext, ContextStage};
use crate::error::{CompileError, Result};
use crate::phase::Phase;
use pipeweld_core::Diagnostic;

pub struct GenerationPhase {
    renderers: Vec<Box<dyn Renderer>>,
}

impl GenerationPhase {
    pub fn new(renderers: Vec<Box<dyn Renderer>>) -> Self {
        Self { renderers }
    }
}

impl Phase for GenerationPhase {
    fn name(&self) -> &'static str {
        "generation"
    }

    fn stage(&self) -> ContextStage {
        ContextStage::Generated
    }

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()> {
        let cross_cutting = ctx.cross_cutting_names();
        let mut artifacts = Vec::new();
        let mut warnings = Vec::new();

        for (key, binding) in &ctx.renderer_bindings {
            let gen_ctx = GenerationContext {
                output_root: &ctx.options.output_root,
                deployment_role: binding.deployment_role(),
                binding_key: key,
                enabled_cross_cutting_names: &cross_cutting,
                cache_key_generator: ctx.options.cache_key_generator.as_deref(),
                descriptor_set: ctx.descriptor_set.as_ref(),
            };

            for renderer in self.renderers.iter().filter(|r| r.supports(binding)) {
                match renderer.render(binding, &gen_ctx) {
                    Ok(paths) => {
                        artifacts.extend(paths.into_iter().map(|path| GeneratedArtifact {
                            path,
                            role: gen_ctx.deployment_role,
                            binding_key: key.clone(),
                            renderer: renderer.name().to_string(),
                        }));
                    }
                    Err(RenderError::MalformedBinding(message)) => {
                        return Err(CompileError::MalformedBinding {
                            renderer: renderer.name().to_string(),
                            key: key.clone(),
                            message,
                        });
                    }
                    Err(error @ RenderError::Io { .. }) => {
                        warnings.push(
                            Diagnostic::warning(format!(
                                "renderer '{}' failed: {}",
                                renderer.name(),
                                error
                            ))
                            .with_subject(key.as_str()),
                        );
                    }
                }
            }
        }

        tracing::debug!("Generated {} artifacts", artifacts.len());
        for warning in warnings {
            ctx.report(self.name(), warning);
        }
        ctx.generated_artifacts.extend(artifacts);
        Ok(())
    }
}
