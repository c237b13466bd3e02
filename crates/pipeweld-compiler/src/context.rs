//! Compilation context
//!
//! One `CompilationContext` exists per compilation unit. Phases fill it in
//! additively; `stage` records the last phase that completed.

use crate::codegen::GeneratedArtifact;
use crate::error::{CompileError, Result};
use crate::source::DescriptorSource;
use indexmap::IndexMap;
use pipeweld_core::diagnostic::{Diagnostic, Severity};
use pipeweld_core::{
    AspectSource, Binding, DescriptorSet, PlacementConfig, PlatformMode, RuntimeMappingResolution,
    StepDescriptor, StepSource, TransportMode,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unit-level compiler options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CompilerOptions {
    /// Active transport of the unit
    pub transport: TransportMode,

    pub platform: PlatformMode,

    /// Whether this unit hosts the plugin (side-effect) services
    pub plugin_host: bool,

    /// Deployment module this unit builds, if any
    pub module_name: Option<String>,

    /// Whether this unit builds the pipeline orchestrator
    pub orchestrator: bool,

    /// Root directory for generated artifacts
    pub output_root: PathBuf,

    /// Cache key generator handed to renderers of cache aspects
    pub cache_key_generator: Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            transport: TransportMode::default(),
            platform: PlatformMode::default(),
            plugin_host: false,
            module_name: None,
            orchestrator: false,
            output_root: PathBuf::from("target/pipeweld"),
            cache_key_generator: None,
        }
    }
}

/// Last completed phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextStage {
    Created,
    Discovered,
    Extracted,
    Mapped,
    Analyzed,
    TargetsResolved,
    BindingsConstructed,
    Generated,
    Finalized,
}

/// State threaded through the phase pipeline
pub struct CompilationContext {
    pub options: CompilerOptions,

    pub stage: ContextStage,

    /// Where discovery reads descriptors from
    pub source: Option<Box<dyn DescriptorSource>>,

    /// Raw step declarations (written by discovery)
    pub step_sources: Vec<StepSource>,

    /// Aspect declarations (written by discovery)
    pub aspects: Vec<AspectSource>,

    pub placement: Option<PlacementConfig>,

    pub descriptor_set: Option<DescriptorSet>,

    /// Regular steps in declaration order, then synthetic steps
    /// (written by extraction, refined by semantic analysis and target resolution)
    pub step_models: Vec<StepDescriptor>,

    /// Orchestrator-side client copies of the regular steps
    /// (written by target resolution in orchestrator units)
    pub client_models: Vec<StepDescriptor>,

    /// Written by runtime mapping
    pub runtime_mapping_resolution: Option<RuntimeMappingResolution>,

    /// Keyed `<serviceName>_<target>` or `orchestrator` (written by binding construction)
    pub renderer_bindings: IndexMap<String, Binding>,

    /// Written by generation
    pub generated_artifacts: Vec<GeneratedArtifact>,

    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            stage: ContextStage::Created,
            source: None,
            step_sources: Vec::new(),
            aspects: Vec::new(),
            placement: None,
            descriptor_set: None,
            step_models: Vec::new(),
            client_models: Vec::new(),
            runtime_mapping_resolution: None,
            renderer_bindings: IndexMap::new(),
            generated_artifacts: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Set the descriptor source read by discovery
    pub fn with_source(mut self, source: Box<dyn DescriptorSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn with_descriptor_set(mut self, descriptor_set: DescriptorSet) -> Self {
        self.descriptor_set = Some(descriptor_set);
        self
    }

    /// Record a diagnostic reported by `phase`
    pub fn report(&mut self, phase: &str, diagnostic: Diagnostic) {
        let diagnostic = if diagnostic.phase.is_some() {
            diagnostic
        } else {
            diagnostic.with_phase(phase)
        };
        match diagnostic.severity {
            Severity::Error => tracing::error!("{}", diagnostic),
            Severity::Warning => tracing::warn!("{}", diagnostic),
            Severity::Info => tracing::debug!("{}", diagnostic),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Declared (non-synthetic) steps
    pub fn regular_steps(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.step_models.iter().filter(|s| !s.is_side_effect())
    }

    /// Steps synthesized from aspects
    pub fn synthetic_steps(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.step_models.iter().filter(|s| s.is_side_effect())
    }

    /// Module this unit builds, ignoring blank names
    pub fn unit_module(&self) -> Option<&str> {
        self.options
            .module_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// The runtime mapping resolution, or an error naming the phase that needs it
    pub fn require_resolution(&self, phase: &str) -> Result<&RuntimeMappingResolution> {
        self.runtime_mapping_resolution
            .as_ref()
            .ok_or_else(|| CompileError::MissingState {
                phase: phase.to_string(),
                field: "runtime mapping resolution".to_string(),
            })
    }

    /// Enabled aspect identifiers, in declaration order
    pub fn cross_cutting_names(&self) -> Vec<String> {
        self.aspects
            .iter()
            .filter(|a| a.enabled)
            .map(|a| a.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tags_phase() {
        let mut ctx = CompilationContext::new(CompilerOptions::default());
        ctx.report("semantic-analysis", Diagnostic::warning("careful"));
        ctx.report("runtime-mapping", Diagnostic::error("boom").with_phase("custom"));

        assert_eq!(ctx.diagnostics[0].phase.as_deref(), Some("semantic-analysis"));
        assert_eq!(ctx.diagnostics[1].phase.as_deref(), Some("custom"));
        assert_eq!(ctx.errors().count(), 1);
        assert_eq!(ctx.warnings().count(), 1);
    }

    #[test]
    fn test_blank_unit_module_ignored() {
        let options = CompilerOptions {
            module_name: Some("  ".to_string()),
            ..CompilerOptions::default()
        };
        let ctx = CompilationContext::new(options);
        assert!(ctx.unit_module().is_none());
    }

    #[test]
    fn test_require_resolution() {
        let ctx = CompilationContext::new(CompilerOptions::default());
        let err = ctx.require_resolution("target-resolution").unwrap_err();
        assert!(err.to_string().contains("target-resolution"));
    }

    #[test]
    fn test_stage_order() {
        assert!(ContextStage::Created < ContextStage::Discovered);
        assert!(ContextStage::BindingsConstructed < ContextStage::Finalized);
    }
}
