//! Shopping list HTTP server binary.
//!
//! Builds the item repository, sets up the HTTP router, and serves requests
//! until interrupted.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! cargo run --bin shopping-server --features "local-repo,http-server"
//!
//! # Run with PostgreSQL repository
//! POSTGRES_HOST=localhost POSTGRES_USER=shop POSTGRES_PASSWORD=secret POSTGRES_DB=shopping \
//!   cargo run --bin shopping-server --features "postgres-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `CORS_ALLOWED_ORIGINS`: Comma-separated origins (default: http://localhost:5000)
//! - `REPOSITORY_TYPE`: `postgres` or `local`
//! - `DATABASE_URL` or `POSTGRES_*`: Postgres connection settings
//! - `RUST_LOG`: Log filter (default: info)

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use shopping_api::db::RepositoryFactory;
use shopping_api::http::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting shopping list server");

    let config = ServerConfig::from_env().map_err(anyhow::Error::msg)?;

    let repository = RepositoryFactory::from_env()
        .await
        .context("Failed to initialize repository")?;
    info!("Repository initialized successfully");

    let state = AppState::new(repository);
    let app = build_router(state, &config);

    let addr = config.bind_addr().map_err(anyhow::Error::msg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
