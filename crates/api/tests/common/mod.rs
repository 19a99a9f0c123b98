#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cohort_api::auth::jwt::{generate_access_token, JwtConfig, TokenSubject};
use cohort_api::auth::password::hash_password;
use cohort_api::config::{OutboxConfig, ServerConfig};
use cohort_api::router::build_app_router;
use cohort_api::state::AppState;
use cohort_core::interview::HolidayCalendar;
use cohort_core::letters::{
    AttendanceReport, CompletionLetter, DocumentRenderer, OfferLetter, RenderError,
    RenderedDocument,
};
use cohort_core::notify::{Notifier, NotifyError, OutgoingEmail};
use cohort_core::roles::{ROLE_ADMIN, ROLE_MANAGER};
use cohort_core::types::DbId;
use cohort_db::models::user::{CreateUser, User};
use cohort_db::repositories::UserRepo;
use cohort_documents::{Letterhead, PdfLetterRenderer};
use cohort_events::OutboxDispatcher;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 60,
        },
        holidays: HolidayCalendar::standard(),
        outbox: OutboxConfig {
            poll_secs: 30,
            max_attempts: 5,
        },
        letterhead: Letterhead {
            organisation_name: "Test Programme Office".to_string(),
            organisation_address: "1 Test Road".to_string(),
        },
        bootstrap_admin: None,
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Records every email and fails on demand.
#[derive(Default)]
pub struct RecordingNotifier {
    pub failing: AtomicBool,
    pub sent: AtomicUsize,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("smtp unavailable".to_string()));
        }
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Renderer that refuses every document.
pub struct FailingRenderer;

#[async_trait]
impl DocumentRenderer for FailingRenderer {
    async fn render_offer_letter(
        &self,
        _letter: &OfferLetter,
    ) -> Result<RenderedDocument, RenderError> {
        Err(RenderError::Failed("template missing".to_string()))
    }

    async fn render_completion_letter(
        &self,
        _letter: &CompletionLetter,
    ) -> Result<RenderedDocument, RenderError> {
        Err(RenderError::Failed("template missing".to_string()))
    }

    async fn render_attendance_report(
        &self,
        _report: &AttendanceReport,
    ) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Failed("template missing".to_string()))
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with the real PDF renderer and a
/// notifier that always succeeds.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let renderer = Arc::new(PdfLetterRenderer::new(config.letterhead.clone()));
    build_test_app_with(pool, renderer, Arc::new(RecordingNotifier::default()))
}

/// Build the application router with the given renderer and notifier.
pub fn build_test_app_with(
    pool: PgPool,
    renderer: Arc<dyn DocumentRenderer>,
    notifier: Arc<dyn Notifier>,
) -> Router {
    let config = test_config();
    let outbox = OutboxDispatcher::new(pool.clone(), notifier, config.outbox.max_attempts);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        renderer,
        outbox,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Insert an active staff account with [`TEST_PASSWORD`].
pub async fn create_staff(pool: &PgPool, role: &str, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            role: role.to_string(),
            full_name: format!("Test {role}"),
            email: email.to_string(),
            password_hash: Some(hash_password(TEST_PASSWORD).unwrap()),
            is_active: true,
        },
    )
    .await
    .unwrap()
}

pub async fn create_admin(pool: &PgPool) -> User {
    create_staff(pool, ROLE_ADMIN, "admin@example.com").await
}

pub async fn create_manager(pool: &PgPool, email: &str) -> User {
    create_staff(pool, ROLE_MANAGER, email).await
}

/// Mint an access token for `user` without going through login.
pub fn token_for(user_id: DbId, role: &str, email: &str) -> String {
    generate_access_token(
        TokenSubject {
            user_id,
            role,
            email,
            name: "Test User",
        },
        &test_config().jwt,
    )
    .unwrap()
}

pub fn token_for_user(user: &User) -> String {
    token_for(user.id, &user.role, &user.email)
}

/// A registration body that passes validation. The interview is Wednesday
/// 4 March 2026 at 13:00 IST.
pub fn registration_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "fullName": "Asha Verma",
        "college": "City College",
        "course": "B.Tech",
        "department": "Computer Science",
        "semester": "6",
        "refNo": "CC/2026/014",
        "email": email,
        "phone": "9876543210",
        "interview": "2026-03-04T13:00:00+05:30",
        "recommendation": "uploads/rec.pdf",
        "collegeId": "uploads/id.pdf",
    })
}

/// Register a candidate through the API and return the new intern's id.
pub async fn register_intern(pool: &PgPool, email: &str) -> DbId {
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/interns/register", registration_body(email)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

pub fn activation_body() -> serde_json::Value {
    serde_json::json!({
        "internship_start": "2026-06-01",
        "internship_end": "2026-07-31",
    })
}

/// Register and activate an intern, returning its id.
pub async fn active_intern(pool: &PgPool, admin_token: &str, email: &str) -> DbId {
    let id = register_intern(pool, email).await;
    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interns/{id}/activate"),
        admin_token,
        activation_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    id
}
