use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use staffhub_api::app::{build_router, AppState};
use staffhub_api::config::Config;
use staffhub_api::jobs::{JobScheduler, PoolMetricsJob, SessionCleanupJob};
use staffhub_api::middleware::{init_metrics, logging::init_logging};
use staffhub_api::services::{bootstrap_admin, BootstrapOutcome, EmailService};

const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging)?;
    init_metrics()?;

    info!("Starting StaffHub API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database.to_pool_config()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    match bootstrap_admin(&pool, &config.admin).await? {
        BootstrapOutcome::Created { user_id, .. } => info!(user_id, "Admin account bootstrapped"),
        BootstrapOutcome::AlreadyPresent | BootstrapOutcome::NotConfigured => {}
    }

    if !config.email.enabled {
        warn!("Email delivery is disabled; leave notifications go to the inbox only");
    }

    let addr = config.socket_addr()?;
    let notifier = Arc::new(EmailService::new(config.email.clone()));
    let state = AppState::new(config, pool.clone(), notifier)?;

    let mut scheduler = JobScheduler::new();
    scheduler.register(SessionCleanupJob::new(
        pool.clone(),
        state.rate_limiter.clone(),
    ));
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.start();

    let app = build_router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped, waiting for background jobs");
    scheduler.shutdown(JOB_SHUTDOWN_TIMEOUT).await;
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
