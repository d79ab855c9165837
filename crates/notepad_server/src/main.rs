//! notepad-server entry point.

use anyhow::{Context, Result};
use clap::Parser;
use notepad_ai::OpenAiBackend;
use notepad_core::{default_log_level, init_logging, LogTarget};
use notepad_server::{serve, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    let level = config
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let target = match &config.log_dir {
        Some(dir) => LogTarget::File(dir.clone()),
        None => LogTarget::Stderr,
    };
    init_logging(&level, target).map_err(anyhow::Error::msg)?;

    let backend = OpenAiBackend::from_env().context("failed to configure AI backend")?;
    serve(&config, AppState::new(backend))
        .await
        .with_context(|| format!("server on {} stopped", config.bind))
}
