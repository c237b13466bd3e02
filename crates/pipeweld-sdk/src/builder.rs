//! Builder pattern for a compilation unit

use crate::config::BuildConfig;
use crate::error::{Result, SdkError};
use crate::project_source::ProjectSource;
use crate::unit::{CompilationOutput, CompilationUnit};
use pipeweld_compiler::{CompilationContext, ManifestRenderer, PhaseOrchestrator, Renderer};
use pipeweld_core::{PlatformMode, TransportMode};
use pipeweld_parser::{DescriptorSetParser, PlacementParser};
use std::fs;
use std::path::PathBuf;

/// Builder for a `CompilationUnit`
///
/// # Example
///
/// ```rust,ignore
/// use pipeweld_sdk::{CompilerBuilder, TransportMode};
///
/// let output = CompilerBuilder::new()
///     .add_project_file("pipeline.yaml")
///     .with_placement_file("placement.yaml")
///     .with_transport(TransportMode::Rest)
///     .orchestrator(true)
///     .output_root("target/pipeweld")
///     .compile()?;
///
/// for (key, binding) in &output.bindings {
///     println!("{} -> {}", key, binding.deployment_role());
/// }
/// ```
pub struct CompilerBuilder {
    config: BuildConfig,
    renderers: Vec<Box<dyn Renderer>>,
}

impl CompilerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: BuildConfig::new(),
            renderers: Vec::new(),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    // ========== Inputs ==========

    /// Add a project file
    pub fn add_project_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.project_files.push(path.into());
        self
    }

    /// Add multiple project files
    pub fn add_project_files(mut self, paths: Vec<PathBuf>) -> Self {
        self.config.project_files.extend(paths);
        self
    }

    /// Add project content directly (alternative to file path)
    ///
    /// # Arguments
    /// * `id` - Name used for this content in errors and logs
    /// * `content` - YAML content of the project
    pub fn add_project_content(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
        self.config.project_contents.push((id.into(), content.into()));
        self
    }

    /// Set a standalone placement file
    pub fn with_placement_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.placement_file = Some(path.into());
        self
    }

    /// Set placement content directly (alternative to file path)
    pub fn with_placement_content(mut self, content: impl Into<String>) -> Self {
        self.config.placement_content = Some(content.into());
        self
    }

    /// Set a standalone descriptor set file
    pub fn with_descriptor_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.descriptor_file = Some(path.into());
        self
    }

    // ========== Unit options ==========

    /// Override the project's transport
    pub fn with_transport(mut self, transport: TransportMode) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Override the project's platform
    pub fn with_platform(mut self, platform: PlatformMode) -> Self {
        self.config.platform = Some(platform);
        self
    }

    /// Build the unit that hosts the plugin services
    pub fn plugin_host(mut self, enable: bool) -> Self {
        self.config.compiler_options.plugin_host = enable;
        self
    }

    /// Build a single deployment module
    pub fn module_name(mut self, module: impl Into<String>) -> Self {
        self.config.compiler_options.module_name = Some(module.into());
        self
    }

    /// Build the pipeline orchestrator
    pub fn orchestrator(mut self, enable: bool) -> Self {
        self.config.compiler_options.orchestrator = enable;
        self
    }

    /// Set the root directory for generated artifacts
    pub fn output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.compiler_options.output_root = path.into();
        self
    }

    /// Set the cache key generator handed to cache aspect renderers
    pub fn cache_key_generator(mut self, generator: impl Into<String>) -> Self {
        self.config.compiler_options.cache_key_generator = Some(generator.into());
        self
    }

    /// Add a renderer; without any, the manifest renderer is used
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    /// Load every input and assemble the compilation unit
    pub fn build(self) -> Result<CompilationUnit> {
        if !self.config.has_project() {
            return Err(SdkError::NoProject);
        }
        if self.config.compiler_options.output_root.as_os_str().is_empty() {
            return Err(SdkError::ConfigError(
                "output root must not be empty".to_string(),
            ));
        }

        let mut source = ProjectSource::new("project");
        for path in &self.config.project_files {
            source.add_file(path)?;
        }
        for (id, content) in &self.config.project_contents {
            source.add_content(id, content)?;
        }

        let header = source.header();
        let mut options = self.config.compiler_options.clone();
        options.transport = self.config.effective_transport(header.map(|h| h.transport));
        options.platform = self.config.effective_platform(header.map(|h| h.platform));

        tracing::info!(
            "Building unit from {} project document(s): transport={}, module={}",
            source.len(),
            options.transport,
            options.module_name.as_deref().unwrap_or("<all>")
        );

        let mut context = CompilationContext::new(options);

        let placement = match (&self.config.placement_content, &self.config.placement_file) {
            (Some(content), _) => Some(PlacementParser::parse(content)?),
            (None, Some(path)) => Some(PlacementParser::parse(&fs::read_to_string(path)?)?),
            (None, None) => None,
        };
        if let Some(placement) = placement {
            context = context.with_placement(placement);
        }

        if let Some(path) = &self.config.descriptor_file {
            let descriptors = DescriptorSetParser::parse(&fs::read_to_string(path)?)?;
            context = context.with_descriptor_set(descriptors);
        }

        let renderers = if self.renderers.is_empty() {
            vec![Box::new(ManifestRenderer::new()) as Box<dyn Renderer>]
        } else {
            self.renderers
        };

        Ok(CompilationUnit::new(
            context.with_source(Box::new(source)),
            PhaseOrchestrator::with_renderers(renderers),
        ))
    }

    /// Build and run the unit
    pub fn compile(self) -> Result<CompilationOutput> {
        self.build()?.run()
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
