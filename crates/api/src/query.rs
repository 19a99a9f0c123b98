//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `GET /admin/interns?active=&limit=&offset=`
///
/// Page values are clamped via `cohort_db::clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct InternListParams {
    pub active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /admin/outbox?status=&limit=&offset=`
#[derive(Debug, Deserialize)]
pub struct OutboxListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
