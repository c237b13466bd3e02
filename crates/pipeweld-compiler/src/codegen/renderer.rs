//! Renderer trait and generation context

use pipeweld_core::ir::DeploymentRole;
use pipeweld_core::schema::DescriptorSet;
use pipeweld_core::Binding;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Renderer failure
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing an artifact failed; the compilation carries on
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The binding cannot be rendered at all; the compilation stops
    #[error("malformed binding: {0}")]
    MalformedBinding(String),
}

/// What a renderer knows about the binding it renders
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub output_root: &'a Path,
    pub deployment_role: DeploymentRole,
    /// Key of the binding in the context's binding map
    pub binding_key: &'a str,
    /// Enabled aspect identifiers
    pub enabled_cross_cutting_names: &'a [String],
    pub cache_key_generator: Option<&'a str>,
    pub descriptor_set: Option<&'a DescriptorSet>,
}

impl GenerationContext<'_> {
    /// Directory for artifacts of the binding's role
    pub fn role_dir(&self) -> PathBuf {
        self.output_root.join(self.deployment_role.as_str())
    }
}

/// A file produced by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub role: DeploymentRole,
    pub binding_key: String,
    pub renderer: String,
}

/// Emits source artifacts for bindings
pub trait Renderer {
    fn name(&self) -> &str;

    /// Whether this renderer handles the binding
    fn supports(&self, binding: &Binding) -> bool;

    /// Render one binding, returning the files written
    fn render(
        &self,
        binding: &Binding,
        ctx: &GenerationContext<'_>,
    ) -> std::result::Result<Vec<PathBuf>, RenderError>;
}
