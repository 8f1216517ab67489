//! Serve command - Run the web portal.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use tfforge_cli::{build_router, AppState};

use super::SynthArgs;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "TFFORGE_BIND", default_value = "0.0.0.0:8080")]
    bind: String,

    /// Directory holding index.html and other static assets
    #[arg(long, env = "TFFORGE_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    #[command(flatten)]
    synth: SynthArgs,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let synth = args.synth.build()?;

    if !args.static_dir.join("index.html").exists() {
        warn!("No index.html in {:?}; the landing page will 404", args.static_dir);
    }

    let app = build_router(AppState::new(synth), &args.static_dir);

    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;

    info!(
        "Server started at http://{} (writing {:?})",
        args.bind, args.synth.output
    );
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
