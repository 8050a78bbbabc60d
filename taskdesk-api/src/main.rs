//! # Taskdesk API Server
//!
//! REST backend for personal task management: users register and log in,
//! then create, list, update and delete their own tasks.
//!
//! ## Usage
//!
//! ```bash
//! STORAGE_BACKEND=memory JWT_SECRET=$(openssl rand -hex 32) cargo run -p taskdesk-api
//! ```

use std::env;
use std::sync::Arc;

use sqlx::PgPool;
use taskdesk_api::{
    app::{build_router, AppState},
    config::{Config, StorageBackend},
};
use taskdesk_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::postgres::{PgTaskRepository, PgUserRepository},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the log filter is read
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "Taskdesk API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    let (state, pool) = match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will be lost on restart");
            (AppState::in_memory(config), None)
        }
        StorageBackend::Postgres => {
            let database = config
                .database
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Database configuration is missing"))?;

            let pool = create_pool(DatabaseConfig {
                url: database.url,
                max_connections: database.max_connections,
                ..Default::default()
            })
            .await?;
            run_migrations(&pool).await?;

            let state = AppState::new(
                Arc::new(PgTaskRepository::new(pool.clone())),
                Arc::new(PgUserRepository::new(pool.clone())),
                config,
            );
            (state, Some(pool))
        }
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown(pool).await;
    Ok(())
}

/// Installs the global subscriber; `LOG_FORMAT=json` selects JSON output
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskdesk_api=debug,taskdesk_shared=debug,tower_http=debug".into());

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

async fn shutdown(pool: Option<PgPool>) {
    if let Some(pool) = pool {
        close_pool(pool).await;
    }
    tracing::info!("Server stopped");
}
