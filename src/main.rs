//! sigrelay - Signal receive API relay
//!
//! Main entry point for the sigrelay CLI and server.

mod cli;
mod logging;
mod server;
mod shutdown;

use clap::Parser;
use tracing::{error, warn};

use sigrelay_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::Cli;

/// Load the configuration file, if any, and overlay CLI flags.
fn load_config(cli: Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = ConfigLoader::expand_path(&path.to_string_lossy());
            ConfigLoader::load(std::path::Path::new(&path))?
        }
        None => Config::default(),
    };

    cli.into_serve_args().apply(&mut config);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli)?;

    logging::init_tracing(&config.logging)?;

    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for err in &validation.errors {
        error!(path = %err.path, "{}", err.message);
    }
    validation.into_result()?;

    // Required for wss:// upstreams; Err means a provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    server::run_server(config).await
}
