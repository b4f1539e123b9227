//! Keyforge - credential and policy administration service

use keyforge::{Config, server};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load from CONFIG_PATH when set, environment variables otherwise.
async fn load_config() -> keyforge::Result<Config> {
    match std::env::var("CONFIG_PATH") {
        Ok(path) if !path.is_empty() => Config::from_file(&path).await,
        _ => Config::from_env(),
    }
}
