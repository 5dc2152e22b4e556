//! Estúdio CLI binary.
//!
//! Drives the same feature controllers as the library:
//! - Create characters, scenes, commercials and thumbnails
//! - Transcribe media and write SEO metadata
//! - Browse, delete and export the local gallery

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, run};

    // Load GEMINI_API_KEY and friends from .env when present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    run(cli).await?;
    Ok(())
}
