//! Command implementations

mod config;
mod inspect;
mod sites;
mod zone;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::{bail, Context, Result};
use rutaverde_core::catalog::validate_coordinates;
use rutaverde_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref(), cli.data)?;

    match cli.command {
        Commands::Inspect(args) => inspect::execute(args, &output),
        Commands::Zone(args) => zone::execute(args, config, &output).await,
        Commands::Sites(args) => sites::execute(args, config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// Defaults, then the config file, then the environment, then `--data`.
fn load_config(path: Option<&Path>, data_url: Option<String>) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = path {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
    }
    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides { data_url, ..Default::default() });
    tracing::debug!(
        data_url = %config.data_url.value,
        source = ?config.data_url.source,
        "Configuration loaded"
    );
    Ok(config)
}

fn check_coordinates(lat: f64, lng: f64) -> Result<()> {
    if !validate_coordinates(lat, lng) {
        bail!("Invalid coordinates: lat={}, lng={}", lat, lng);
    }
    Ok(())
}
