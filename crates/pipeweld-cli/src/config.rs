//! CLI configuration
//!
//! Layered: built-in defaults, then `pipeweld.{toml,yaml}` (or the file given
//! with `--config`), then `PIPEWELD_*` environment variables (a `.env` file is
//! honored), then command-line flags.

use crate::args::Cli;
use pipeweld_core::{PlatformMode, TransportMode};
use pipeweld_sdk::{BuildConfig, CompilerOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolved CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Project files to compile
    pub projects: Vec<PathBuf>,

    /// Standalone runtime-mapping file
    pub placement: Option<PathBuf>,

    /// Standalone descriptor-set file
    pub descriptors: Option<PathBuf>,

    pub transport: Option<TransportMode>,

    pub platform: Option<PlatformMode>,

    pub plugin_host: bool,

    /// Deployment module this unit builds
    pub module_name: Option<String>,

    pub orchestrator: bool,

    /// Root directory for generated artifacts
    pub output_root: PathBuf,

    pub cache_key_generator: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            placement: None,
            descriptors: None,
            transport: None,
            platform: None,
            plugin_host: false,
            module_name: None,
            orchestrator: false,
            output_root: CompilerOptions::default().output_root,
            cache_key_generator: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from a config file and environment variables
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("pipeweld").required(false),
        };

        let config_result = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("PIPEWELD"))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(e) if path.is_some() => Err(anyhow::anyhow!("Failed to read config: {}", e)),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Apply command-line flags on top of the loaded configuration
    pub fn apply_args(mut self, args: &Cli) -> Self {
        if !args.projects.is_empty() {
            self.projects = args.projects.clone();
        }
        if let Some(placement) = &args.placement {
            self.placement = Some(placement.clone());
        }
        if let Some(descriptors) = &args.descriptors {
            self.descriptors = Some(descriptors.clone());
        }
        if args.transport.is_some() {
            self.transport = args.transport;
        }
        if args.platform.is_some() {
            self.platform = args.platform;
        }
        if let Some(module) = &args.module {
            self.module_name = Some(module.clone());
        }
        if let Some(root) = &args.output_root {
            self.output_root = root.clone();
        }
        if let Some(generator) = &args.cache_key_generator {
            self.cache_key_generator = Some(generator.clone());
        }
        self.plugin_host |= args.plugin_host;
        self.orchestrator |= args.orchestrator;
        self
    }

    /// SDK build configuration for this CLI configuration
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            project_files: self.projects.clone(),
            placement_file: self.placement.clone(),
            descriptor_file: self.descriptors.clone(),
            transport: self.transport,
            platform: self.platform,
            compiler_options: CompilerOptions {
                plugin_host: self.plugin_host,
                module_name: self.module_name.clone(),
                orchestrator: self.orchestrator,
                output_root: self.output_root.clone(),
                cache_key_generator: self.cache_key_generator.clone(),
                ..CompilerOptions::default()
            },
            ..BuildConfig::default()
        }
    }
}
