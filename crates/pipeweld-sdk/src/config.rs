//! Configuration types for a compilation unit

use pipeweld_compiler::CompilerOptions;
use pipeweld_core::{PlatformMode, TransportMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inputs and options of one compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BuildConfig {
    /// Project file path(s)
    pub project_files: Vec<PathBuf>,

    /// Project contents (id, content) - alternative to file paths
    #[serde(skip)]
    pub project_contents: Vec<(String, String)>,

    /// Standalone placement config; takes precedence over an embedded
    /// `runtime-mapping` document
    pub placement_file: Option<PathBuf>,

    /// Standalone placement content - alternative to file path
    #[serde(skip)]
    pub placement_content: Option<String>,

    /// Standalone descriptor set; takes precedence over an embedded
    /// `descriptor-set` document
    pub descriptor_file: Option<PathBuf>,

    /// Transport override; otherwise the project's declared transport
    pub transport: Option<TransportMode>,

    /// Platform override; otherwise the project's declared platform
    pub platform: Option<PlatformMode>,

    /// Compiler options; transport and platform are filled in at build time
    pub compiler_options: CompilerOptions,
}

impl BuildConfig {
    /// Create a new build configuration
    pub fn new() -> Self {
        Self {
            project_files: Vec::new(),
            project_contents: Vec::new(),
            placement_file: None,
            placement_content: None,
            descriptor_file: None,
            transport: None,
            platform: None,
            compiler_options: CompilerOptions::default(),
        }
    }

    /// Add a project file
    pub fn with_project_file(mut self, path: PathBuf) -> Self {
        self.project_files.push(path);
        self
    }

    /// Set the placement file
    pub fn with_placement_file(mut self, path: PathBuf) -> Self {
        self.placement_file = Some(path);
        self
    }

    /// Set the descriptor set file
    pub fn with_descriptor_file(mut self, path: PathBuf) -> Self {
        self.descriptor_file = Some(path);
        self
    }

    /// Whether any project input is configured
    pub fn has_project(&self) -> bool {
        !self.project_files.is_empty() || !self.project_contents.is_empty()
    }

    /// Final transport, given the project's declared one
    pub fn effective_transport(&self, declared: Option<TransportMode>) -> TransportMode {
        self.transport
            .or(declared)
            .unwrap_or(self.compiler_options.transport)
    }

    /// Final platform, given the project's declared one
    pub fn effective_platform(&self, declared: Option<PlatformMode>) -> PlatformMode {
        self.platform
            .or(declared)
            .unwrap_or(self.compiler_options.platform)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new()
    }
}
