//! Pipeweld command-line driver
//!
//! Argument parsing, layered configuration and the compile entry point,
//! exposed as a library for testing.

pub mod args;
pub mod config;
pub mod error;

use crate::config::CliConfig;
use crate::error::CliError;
use pipeweld_sdk::{CompilationOutput, CompilerBuilder};

/// Compile one unit as described by `config`
pub fn run(config: &CliConfig) -> Result<CompilationOutput, CliError> {
    if config.projects.is_empty() {
        return Err(CliError::Config(
            "no project file given (pass one or set `projects` in pipeweld.toml)".to_string(),
        ));
    }

    let output = CompilerBuilder::new()
        .with_config(config.build_config())
        .compile()?;
    Ok(output)
}
