//! Showtime auth gate server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use showtime_api::{AppState, build_app};
use showtime_auth::TracingAuditSink;
use showtime_core::clock::SystemClock;
use showtime_core::config::AppConfig;
use showtime_core::error::AppError;
use showtime_database::{DatabasePool, MemoryUserRepository, PgUserRepository, UserRepository};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration for `SHOWTIME_ENV` and reject unsafe settings.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SHOWTIME_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Showtime v{}", env!("CARGO_PKG_VERSION"));

    if config.uses_placeholder_secrets() {
        tracing::warn!("JWT secrets are still the shipped placeholders; set SHOWTIME__AUTH__JWT_ACCESS_SECRET and SHOWTIME__AUTH__JWT_REFRESH_SECRET");
    }

    // ── Step 1: User record store ────────────────────────────────
    let (users, db_pool): (Arc<dyn UserRepository>, Option<DatabasePool>) =
        if config.database.is_configured() {
            tracing::info!("Connecting to database...");
            let db = DatabasePool::connect(&config.database).await?;
            db.ensure_schema().await?;
            let repo: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db.pool().clone()));
            (repo, Some(db))
        } else {
            tracing::warn!("No database configured, user records are kept in memory");
            let repo: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
            (repo, None)
        };

    // ── Step 2: Application state ────────────────────────────────
    let state = AppState::new(
        config.clone(),
        users,
        Arc::new(SystemClock),
        Arc::new(TracingAuditSink::new()),
    )?;

    // ── Step 3: Seed administrator ───────────────────────────────
    let auth = &config.auth;
    if !auth.default_admin_email.is_empty() {
        state
            .auth
            .ensure_default_admin(
                &auth.default_admin_email,
                &auth.default_admin_username,
                &auth.default_admin_password,
            )
            .await?;
    }

    // ── Step 4: Idle bucket reclamation ──────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let interval = config.rate_limit.reclaim_interval();
    let reclaimers: Vec<_> = state
        .limiters
        .all()
        .into_iter()
        .map(|limiter| limiter.spawn_reclaimer(interval, shutdown_rx.clone()))
        .collect();

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app = build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Showtime server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    for handle in reclaimers {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
    }
    if let Some(db) = db_pool {
        db.close().await;
    }

    tracing::info!("Showtime server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
