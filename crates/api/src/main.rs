use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cohort_api::config::ServerConfig;
use cohort_api::lifecycle::accounts;
use cohort_api::router::build_app_router;
use cohort_api::state::AppState;
use cohort_core::notify::Notifier;
use cohort_documents::PdfLetterRenderer;
use cohort_events::{EmailConfig, LogNotifier, OutboxDispatcher, SmtpNotifier};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cohort_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = cohort_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    cohort_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    cohort_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Bootstrap admin ---
    if let Some(admin) = &config.bootstrap_admin {
        match accounts::bootstrap_admin(&pool, admin).await {
            Ok(true) => tracing::info!("Seeded initial admin account"),
            Ok(false) => tracing::debug!("Admin account already present, skipping bootstrap"),
            Err(e) => panic!("Failed to seed admin account: {e}"),
        }
    }

    // --- Notification delivery ---
    let notifier: Arc<dyn Notifier> = match EmailConfig::from_env() {
        Some(email_config) => Arc::new(
            SmtpNotifier::new(&email_config).expect("Failed to configure SMTP transport"),
        ),
        None => {
            tracing::warn!("SMTP_HOST not set, emails stay pending in the outbox");
            Arc::new(LogNotifier)
        }
    };
    let outbox = OutboxDispatcher::new(pool.clone(), notifier, config.outbox.max_attempts);

    // Spawn outbox dispatcher (retries undelivered emails).
    let outbox_cancel = CancellationToken::new();
    let outbox_handle = tokio::spawn(
        outbox
            .clone()
            .run(Duration::from_secs(config.outbox.poll_secs), outbox_cancel.clone()),
    );

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        renderer: Arc::new(PdfLetterRenderer::new(config.letterhead.clone())),
        outbox,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    outbox_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        outbox_handle,
    )
    .await;
    tracing::info!("Outbox dispatcher stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
