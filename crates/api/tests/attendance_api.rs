//! HTTP-level tests for daily attendance marking and confirmation.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth, post_json_auth, token_for, token_for_user};
use sqlx::PgPool;

use cohort_core::roles::ROLE_INTERN;
use cohort_db::repositories::AttendanceRepo;

/// Activate an intern and return (admin token, intern id, intern token).
async fn setup(pool: &PgPool) -> (String, i64, String) {
    let admin = common::create_admin(pool).await;
    let admin_token = token_for_user(&admin);
    let id = common::active_intern(pool, &admin_token, "asha@example.com").await;
    let intern_token = token_for(id, ROLE_INTERN, "asha@example.com");
    (admin_token, id, intern_token)
}

async fn mark(pool: &PgPool, intern_token: &str) -> axum::response::Response {
    let app = common::build_test_app(pool.clone());
    post_auth(app, "/api/v1/interns/me/attendance", intern_token).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_today_creates_pending_entry(pool: PgPool) {
    let (_, id, intern_token) = setup(&pool).await;

    let response = mark(&pool, &intern_token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["intern_id"], id);
    assert!(json["data"]["approved_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_mark_same_day_conflicts(pool: PgPool) {
    let (_, id, intern_token) = setup(&pool).await;
    assert_eq!(mark(&pool, &intern_token).await.status(), StatusCode::CREATED);

    let response = mark(&pool, &intern_token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Today already marked");
    assert_eq!(
        AttendanceRepo::list_for_intern(&pool, id).await.unwrap().len(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_sets_present_then_absent(pool: PgPool) {
    let (admin_token, id, intern_token) = setup(&pool).await;
    let entry_id = body_json(mark(&pool, &intern_token).await).await["data"]["id"]
        .as_i64()
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/attendance/{entry_id}/confirm"),
        &admin_token,
        serde_json::json!({ "confirmed": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "present");
    assert!(json["data"]["approved_at"].is_string());

    // The latest decision wins.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/attendance/{entry_id}/confirm"),
        &admin_token,
        serde_json::json!({ "confirmed": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "absent");

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/interns/{id}/attendance"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["summary"]["absent"], 1);
    assert_eq!(json["data"]["summary"]["present"], 0);
    assert_eq!(json["data"]["present_percentage"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unrelated_manager_cannot_confirm(pool: PgPool) {
    let (_, _, intern_token) = setup(&pool).await;
    let manager = common::create_manager(&pool, "m@example.com").await;
    let entry_id = body_json(mark(&pool, &intern_token).await).await["data"]["id"]
        .as_i64()
        .unwrap();

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/attendance/{entry_id}/confirm"),
        &token_for_user(&manager),
        serde_json::json!({ "confirmed": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_unknown_entry_is_not_found(pool: PgPool) {
    let admin = common::create_admin(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/attendance/999999/confirm",
        &token_for_user(&admin),
        serde_json::json!({ "confirmed": true }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_staff_cannot_mark_attendance(pool: PgPool) {
    let admin = common::create_admin(&pool).await;

    let response = mark(&pool, &token_for_user(&admin)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
