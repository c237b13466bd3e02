//! Command-line arguments

use clap::Parser;
use pipeweld_core::{PlatformMode, TransportMode};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "pipeweld",
    version,
    about = "Compile pipeline step descriptors into protocol bindings",
    long_about = "Reads pipeline project files, places every step in a deployment module, \
                  resolves the artifacts each step needs for the chosen transport and writes \
                  one manifest per binding under the output root."
)]
pub struct Cli {
    /// Project files to compile (YAML)
    pub projects: Vec<PathBuf>,

    /// Config file (default: ./pipeweld.{toml,yaml} when present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Standalone runtime-mapping file
    #[arg(long)]
    pub placement: Option<PathBuf>,

    /// Standalone descriptor-set file
    #[arg(long)]
    pub descriptors: Option<PathBuf>,

    /// Transport override: grpc, rest or local
    #[arg(long, value_parser = parse_transport)]
    pub transport: Option<TransportMode>,

    /// Platform override: standard or function
    #[arg(long, value_parser = parse_platform)]
    pub platform: Option<PlatformMode>,

    /// Build the unit that hosts the plugin services
    #[arg(long)]
    pub plugin_host: bool,

    /// Build only this deployment module
    #[arg(long, short)]
    pub module: Option<String>,

    /// Build the pipeline orchestrator
    #[arg(long)]
    pub orchestrator: bool,

    /// Root directory for generated artifacts
    #[arg(long, short)]
    pub output_root: Option<PathBuf>,

    /// Cache key generator handed to cache aspect renderers
    #[arg(long)]
    pub cache_key_generator: Option<String>,

    /// Print the compilation output as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_transport(value: &str) -> Result<TransportMode, String> {
    value.parse().map_err(|e: pipeweld_core::CoreError| e.to_string())
}

fn parse_platform(value: &str) -> Result<PlatformMode, String> {
    value.parse().map_err(|e: pipeweld_core::CoreError| e.to_string())
}
