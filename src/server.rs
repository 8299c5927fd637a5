//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, worker spawning, and Axum server lifecycle.

use crate::application::services::LinkService;
use crate::config::{Config, StorageBackend};
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;

/// Opens a PostgreSQL pool with the configured limits and applies migrations.
///
/// # Errors
///
/// Returns an error if no database URL is configured, the connection fails,
/// or a migration cannot be applied.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Builds the link repository for the configured storage backend.
///
/// # Errors
///
/// Returns an error if the PostgreSQL backend cannot be reached.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_pool(config).await?;
            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, links are lost on restart");
            Ok(Arc::new(InMemoryLinkRepository::new()))
        }
    }
}

/// Builds the link service on top of a repository.
pub fn build_link_service(
    config: &Config,
    repository: Arc<dyn LinkRepository>,
) -> LinkService<dyn LinkRepository> {
    LinkService::new(
        repository,
        CodeGenerator::new(config.code_length),
        config.base_url.clone(),
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link storage (PostgreSQL with migrations, or in-memory)
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, finishes
/// in-flight requests, then waits for the click worker to drain its queue.
///
/// # Errors
///
/// Returns an error if:
/// - Storage initialization fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);

    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repository.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let link_service = Arc::new(build_link_service(&config, repository));
    let state = AppState::new(link_service, click_tx);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, draining click queue");
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Click worker terminated abnormally");
    }

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
