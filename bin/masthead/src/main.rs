//! Masthead server binary.
//!
//! Loads configuration from the environment, pre-renders the most recent
//! pages, and serves the site.

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use masthead::server::{self, AppState};
use masthead_core::Settings;
use tracing::info;

/// Command-line interface for the site server.
#[derive(Parser)]
#[command(
    name = "masthead",
    version,
    about = "Server-rendered marketing/blog site backed by a headless content API"
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip pre-rendering pages at startup
    #[arg(long)]
    no_prewarm: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    masthead::init_tracing(cli.verbose);

    let settings = Settings::from_env()?;
    let listen_addr = settings.listen_addr.clone();
    let state = Arc::new(AppState::new(settings)?);

    if !cli.no_prewarm {
        server::prewarm(&state).await;
    }

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(addr = %listen_addr, "masthead listening");
    axum::serve(listener, server::create_router(state)).await?;

    Ok(())
}
