use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use atrium_server::{AppState, ServerConfig, app};
use opkit_auth::Role;
use portal::{Directory, User};

#[derive(Debug, Parser)]
#[command(name = "atrium-server", about = "Atrium multi-realm business portal")]
struct Args {
    /// Path to a JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let store = Arc::new(Directory::new());
    if let Some(seed) = &config.seed_admin {
        let mut admin = User::new(&seed.name, &seed.email, Role::Admin);
        store
            .save_user(&mut admin)
            .map_err(|e| anyhow::anyhow!("seed admin rejected: {e}"))?;
        tracing::info!(email = %seed.email, "seeded bootstrap admin");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "atrium-server listening");
    axum::serve(listener, app(AppState::new(store))).await?;
    Ok(())
}
