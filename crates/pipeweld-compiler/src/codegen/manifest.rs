//! Manifest renderer
//!
//! Writes each binding as pretty-printed JSON to
//! `<output-root>/<role>/<binding-key>.json`.

use crate::codegen::renderer::{GenerationContext, RenderError, Renderer};
use pipeweld_core::Binding;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct ManifestEntry<'a> {
    key: &'a str,
    kind: &'static str,
    role: &'static str,
    #[serde(skip_serializing_if = "no_names")]
    cross_cutting: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_key_generator: Option<&'a str>,
    binding: &'a Binding,
}

fn no_names(names: &&[String]) -> bool {
    names.is_empty()
}

/// Renders every binding as a JSON manifest
#[derive(Debug, Clone, Default)]
pub struct ManifestRenderer;

impl ManifestRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for ManifestRenderer {
    fn name(&self) -> &str {
        "manifest"
    }

    fn supports(&self, _binding: &Binding) -> bool {
        true
    }

    fn render(
        &self,
        binding: &Binding,
        ctx: &GenerationContext<'_>,
    ) -> Result<Vec<PathBuf>, RenderError> {
        if ctx.binding_key.trim().is_empty() {
            return Err(RenderError::MalformedBinding(format!(
                "{} binding has an empty key",
                binding.kind_name()
            )));
        }

        let entry = ManifestEntry {
            key: ctx.binding_key,
            kind: binding.kind_name(),
            role: ctx.deployment_role.as_str(),
            cross_cutting: ctx.enabled_cross_cutting_names,
            cache_key_generator: ctx.cache_key_generator,
            binding,
        };
        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| RenderError::MalformedBinding(e.to_string()))?;

        let dir = ctx.role_dir();
        fs::create_dir_all(&dir).map_err(|source| RenderError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(format!("{}.json", ctx.binding_key));
        fs::write(&path, json).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote manifest {}", path.display());
        Ok(vec![path])
    }
}
