//! Phase orchestrator
//!
//! Runs the fixed phase sequence over one compilation context. The first
//! failing phase aborts the run; nothing is retried or rolled back.

use crate::codegen::{ManifestRenderer, Renderer};
use crate::context::CompilationContext;
use crate::error::{CompileError, Result};
use crate::phase::Phase;
use crate::phases::{
    BindingConstructionPhase, DiscoveryPhase, ExtractionPhase, GenerationPhase,
    InfrastructurePhase, RuntimeMappingPhase, SemanticAnalysisPhase, TargetResolutionPhase,
};
use pipeweld_core::Diagnostic;

/// Ordered list of phases
pub struct PhaseOrchestrator {
    phases: Vec<Box<dyn Phase>>,
}

impl PhaseOrchestrator {
    /// The standard pipeline with the manifest renderer
    pub fn standard() -> Self {
        Self::with_renderers(vec![Box::new(ManifestRenderer::new())])
    }

    /// The standard pipeline with custom renderers
    pub fn with_renderers(renderers: Vec<Box<dyn Renderer>>) -> Self {
        Self::from_phases(vec![
            Box::new(DiscoveryPhase),
            Box::new(ExtractionPhase),
            Box::new(RuntimeMappingPhase),
            Box::new(SemanticAnalysisPhase),
            Box::new(TargetResolutionPhase),
            Box::new(BindingConstructionPhase),
            Box::new(GenerationPhase::new(renderers)),
            Box::new(InfrastructurePhase),
        ])
    }

    /// An arbitrary phase list, run in the given order
    pub fn from_phases(phases: Vec<Box<dyn Phase>>) -> Self {
        Self { phases }
    }

    pub fn phase_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Run every phase in order, stopping at the first failure
    pub fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        for phase in &self.phases {
            let name = phase.name();
            tracing::debug!("Running phase '{}'", name);

            if let Err(error) = phase.execute(ctx) {
                tracing::error!("Phase '{}' failed: {}", name, error);
                ctx.diagnostics
                    .push(Diagnostic::error(error.to_string()).with_phase(name));
                return Err(CompileError::PhaseFailed {
                    phase: name.to_string(),
                    source: Box::new(error),
                });
            }

            ctx.stage = phase.stage();
            tracing::debug!("Phase '{}' complete", name);
        }

        Ok(())
    }
}

impl Default for PhaseOrchestrator {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CompilerOptions, ContextStage};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        name: &'static str,
        stage: ContextStage,
        calls: Rc<Cell<usize>>,
        fail: bool,
    }

    impl Phase for Counting {
        fn name(&self) -> &'static str {
            self.name
        }

        fn stage(&self) -> ContextStage {
            self.stage
        }

        fn execute(&self, _ctx: &mut CompilationContext) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(CompileError::Semantic("bad step".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_standard_phase_order() {
        let names = PhaseOrchestrator::standard().phase_names();
        assert_eq!(
            names,
            vec![
                "discovery",
                "extraction",
                "runtime-mapping",
                "semantic-analysis",
                "target-resolution",
                "binding-construction",
                "generation",
                "infrastructure",
            ]
        );
    }

    #[test]
    fn test_failure_skips_remaining_phases() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let third = Rc::new(Cell::new(0));

        let orchestrator = PhaseOrchestrator::from_phases(vec![
            Box::new(Counting {
                name: "one",
                stage: ContextStage::Discovered,
                calls: first.clone(),
                fail: false,
            }),
            Box::new(Counting {
                name: "two",
                stage: ContextStage::Extracted,
                calls: second.clone(),
                fail: true,
            }),
            Box::new(Counting {
                name: "three",
                stage: ContextStage::Mapped,
                calls: third.clone(),
                fail: false,
            }),
        ]);

        let mut ctx = CompilationContext::new(CompilerOptions::default());
        let err = orchestrator.run(&mut ctx).unwrap_err();

        assert_eq!(err.phase(), Some("two"));
        assert_eq!((first.get(), second.get(), third.get()), (1, 1, 0));
        assert_eq!(ctx.stage, ContextStage::Discovered);
        assert_eq!(ctx.diagnostics.len(), 1);
        assert_eq!(ctx.diagnostics[0].phase.as_deref(), Some("two"));
    }
}
