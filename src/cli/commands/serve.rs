use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::app::{self, AppState};
use crate::auth::SessionKeys;
use crate::config;
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, help = "Address to bind (defaults to SERVER_HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Port to listen on (defaults to SERVER_PORT / PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep everything in memory instead of PostgreSQL")]
    pub memory: bool,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config::config();
    info!("Starting todo-web in {:?} mode", config.environment);

    let sessions = SessionKeys::from_config(&config.security)
        .context("set SECURITY_SESSION_SECRET to sign session cookies")?;

    let store: Arc<dyn Store> = if args.memory {
        info!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        DatabaseManager::migrate(&pool).await?;
        Arc::new(PgStore::new(pool))
    };

    let app = app::router(AppState::new(store, sessions));

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
