//! Pipeweld command-line compiler
//!
//! Compiles one unit and prints its diagnostics.

use anyhow::Result;
use clap::Parser;
use pipeweld_cli::args::Cli;
use pipeweld_cli::config::CliConfig;
use pipeweld_cli::error::CliError;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    init_tracing()?;

    let args = Cli::parse();

    // Load configuration
    let config = CliConfig::load(args.config.as_deref())?.apply_args(&args);
    info!("Loaded configuration: {:?}", config);

    match pipeweld_cli::run(&config) {
        Ok(output) => {
            for diagnostic in &output.diagnostics {
                eprintln!("{}", diagnostic);
            }
            if args.json {
                println!("{}", output.to_json()?);
            } else {
                println!(
                    "✓ {} bindings, {} artifacts written to {}",
                    output.bindings.len(),
                    output.artifacts.len(),
                    config.output_root.display()
                );
            }
            Ok(())
        }
        Err(err) => {
            if let CliError::Sdk(sdk) = &err {
                for diagnostic in sdk.diagnostics() {
                    eprintln!("{}", diagnostic);
                }
            }
            eprintln!("error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

/// Initialize tracing subscriber
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pipeweld_cli=info,pipeweld_sdk=info,pipeweld_compiler=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
