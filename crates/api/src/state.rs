use std::sync::Arc;

use cohort_core::letters::DocumentRenderer;
use cohort_events::OutboxDispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cohort_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Letter and report renderer.
    pub renderer: Arc<dyn DocumentRenderer>,
    /// Delivers queued emails; shares its notifier with the background loop.
    pub outbox: OutboxDispatcher,
}
