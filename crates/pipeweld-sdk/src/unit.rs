//! Compilation unit
//!
//! A ready-to-run context plus the phase pipeline that will fill it in.

use crate::error::{Result, SdkError};
use indexmap::IndexMap;
use pipeweld_compiler::{CompilationContext, ContextStage, GeneratedArtifact, PhaseOrchestrator};
use pipeweld_core::{
    Binding, DeploymentRole, Diagnostic, RuntimeMappingResolution, Severity, StepDescriptor,
};
use serde::Serialize;

/// One configured compilation unit
pub struct CompilationUnit {
    context: CompilationContext,
    orchestrator: PhaseOrchestrator,
}

impl CompilationUnit {
    pub fn new(context: CompilationContext, orchestrator: PhaseOrchestrator) -> Self {
        Self {
            context,
            orchestrator,
        }
    }

    pub fn context(&self) -> &CompilationContext {
        &self.context
    }

    /// Names of the phases `run` will execute, in order
    pub fn phase_names(&self) -> Vec<&'static str> {
        self.orchestrator.phase_names()
    }

    /// Run every phase and collect the results
    pub fn run(mut self) -> Result<CompilationOutput> {
        match self.orchestrator.run(&mut self.context) {
            Ok(()) => {
                let output = CompilationOutput::from_context(self.context);
                tracing::info!(
                    "Compiled {} steps into {} bindings and {} artifacts ({} warnings)",
                    output.steps.len(),
                    output.bindings.len(),
                    output.artifacts.len(),
                    output.warnings().count()
                );
                Ok(output)
            }
            Err(source) => Err(SdkError::CompilationFailed {
                source,
                diagnostics: self.context.diagnostics,
            }),
        }
    }
}

/// Result of a successful compilation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompilationOutput {
    pub stage: ContextStage,
    pub steps: Vec<StepDescriptor>,
    pub client_steps: Vec<StepDescriptor>,
    pub bindings: IndexMap<String, Binding>,
    pub artifacts: Vec<GeneratedArtifact>,
    pub resolution: Option<RuntimeMappingResolution>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationOutput {
    fn from_context(ctx: CompilationContext) -> Self {
        Self {
            stage: ctx.stage,
            steps: ctx.step_models,
            client_steps: ctx.client_models,
            bindings: ctx.renderer_bindings,
            artifacts: ctx.generated_artifacts,
            resolution: ctx.runtime_mapping_resolution,
            diagnostics: ctx.diagnostics,
        }
    }

    pub fn step(&self, name: &str) -> Option<&StepDescriptor> {
        self.steps.iter().find(|s| s.name() == name)
    }

    pub fn binding(&self, key: &str) -> Option<&Binding> {
        self.bindings.get(key)
    }

    /// Artifacts generated for one deployment role
    pub fn artifacts_for(&self, role: DeploymentRole) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter().filter(move |a| a.role == role)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Pretty JSON summary of the output
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SdkError::IoError(e.into()))
    }
}
