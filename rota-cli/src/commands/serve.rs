//! Run the HTTP API

use anyhow::Context;
use clap::Args;
use rota_api::AppState;
use rota_core::Config;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::open_database;

/// Serve the HTTP API
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config and env)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config and env)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let db = open_database(config).await?;

        let addr = config.server.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        let state = AppState::new(db.clone()).context("Failed to register metrics")?;
        rota_api::serve(
            listener,
            state,
            shutdown_signal(),
            config.server.shutdown_timeout,
        )
        .await
        .context("Server error")?;

        db.close().await;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
}
