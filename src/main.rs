//! Listkeeper Backend Server
//!
//! Serves the account, session, list and task APIs.

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use listkeeper_server::app::build_router;
use listkeeper_server::auth::{session_sweeper, AuthService};
use listkeeper_server::config::Config;
use listkeeper_server::db::{create_pool, run_migrations, MemoryStore, PgStore, Store};
use listkeeper_server::lists::ListService;
use listkeeper_server::middleware::RateLimiter;
use listkeeper_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting Listkeeper");

    let store: Arc<dyn Store> = if config.database_url.is_some() {
        let db_pool = create_pool(&config).await?;
        run_migrations(&db_pool).await?;
        Arc::new(PgStore::new(db_pool))
    } else {
        tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    };

    let auth_service = Arc::new(AuthService::new(
        store.clone(),
        config.jwt_secret.clone(),
        config.access_token_ttl_seconds,
        config.refresh_token_ttl_days,
        config.bcrypt_cost,
    ));
    auth_service.warm_up().await?;
    let list_service = Arc::new(ListService::new(store.clone()));

    if let Some(interval) = config.session_sweep_interval() {
        let sweeper_service = auth_service.clone();
        tokio::spawn(async move {
            session_sweeper(sweeper_service, interval).await;
            tracing::error!("Session sweeper task exited unexpectedly");
        });
    }

    let rate_limiter = RateLimiter::new(config.rate_limit_rps);
    tokio::spawn(rate_limiter.clone().run_cleanup(Duration::from_secs(300)));

    let app_state = AppState::new(auth_service, list_service, store);
    let app = build_router(app_state, &config, rate_limiter);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    // Serve with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
