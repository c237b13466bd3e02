//! Infrastructure
//!
//! Reads: `generated_artifacts`, `runtime_mapping_resolution`, `options`.
//! Writes: `<output-root>/pipeweld-roles.json`.

use crate::context::{CompilationContext, ContextStage};
use crate::error::Result;
use crate::phase::Phase;
use indexmap::IndexMap;
use pipeweld_core::ir::{DeploymentRole, TransportMode};
use serde::Serialize;
use std::fs;

/// Name of the role metadata file written under the output root
pub const ROLE_METADATA_FILE: &str = "pipeweld-roles.json";

/// Generated artifacts grouped by deployment role
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoleMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub transport: TransportMode,
    pub plugin_host: bool,
    /// role -> artifact paths relative to the output root
    pub roles: IndexMap<String, Vec<String>>,
    /// step -> module
    pub modules: IndexMap<String, String>,
    /// module -> runtime
    pub runtimes: IndexMap<String, String>,
}

impl RoleMetadata {
    pub fn from_context(ctx: &CompilationContext) -> Self {
        let mut roles: IndexMap<String, Vec<String>> = DeploymentRole::ALL
            .iter()
            .map(|role| (role.as_str().to_string(), Vec::new()))
            .collect();

        for artifact in &ctx.generated_artifacts {
            let path = artifact
                .path
                .strip_prefix(&ctx.options.output_root)
                .unwrap_or(&artifact.path);
            if let Some(paths) = roles.get_mut(artifact.role.as_str()) {
                paths.push(path.display().to_string());
            }
        }
        roles.retain(|_, paths| !paths.is_empty());

        let (modules, runtimes) = match &ctx.runtime_mapping_resolution {
            Some(resolution) => (
                resolution.module_assignments().clone(),
                resolution.module_runtimes().clone(),
            ),
            None => (IndexMap::new(), IndexMap::new()),
        };

        Self {
            module: ctx.unit_module().map(str::to_string),
            transport: ctx.options.transport,
            plugin_host: ctx.options.plugin_host,
            roles,
            modules,
            runtimes,
        }
    }
}

pub struct InfrastructurePhase;

impl Phase for InfrastructurePhase {
    fn name(&self) -> &'static str {
        "infrastructure"
    }

    fn stage(&self) -> ContextStage {
        ContextStage::Finalized
    }

    fn execute(&self, ctx: &mut CompilationContext) -> Result<()> {
        let metadata = RoleMetadata::from_context(ctx);
        let json = serde_json::to_string_pretty(&metadata)
            .map_err(std::io::Error::from)?;

        fs::create_dir_all(&ctx.options.output_root)?;
        let path = ctx.options.output_root.join(ROLE_METADATA_FILE);
        fs::write(&path, json)?;

        tracing::debug!("Wrote role metadata to {}", path.display());
        Ok(())
    }
}
