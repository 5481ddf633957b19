//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `visitor_log` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use visitor_log::initialization::init_logger_with;
use visitor_log::{serve, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal; flags and the real environment still apply.
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = serve(config).await {
        eprintln!("visitor_log error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
