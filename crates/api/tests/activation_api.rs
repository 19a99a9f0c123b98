//! HTTP-level tests for intern activation and letter verification.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    activation_body, body_bytes, body_json, get, get_auth, post_json_auth, token_for,
    token_for_user, FailingRenderer, RecordingNotifier,
};
use sqlx::PgPool;

use cohort_core::roles::ROLE_INTERN;
use cohort_db::models::outbox::{kinds, OUTBOX_FAILED, OUTBOX_SENT};
use cohort_db::repositories::{DocumentRepo, InternRepo, OutboxRepo};
use cohort_documents::PdfLetterRenderer;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activate_issues_offer_letter(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let token = token_for_user(&admin);
    let id = common::register_intern(&pool, "asha@example.com").await;

    let notifier = Arc::new(RecordingNotifier::default());
    let renderer = Arc::new(PdfLetterRenderer::new(common::test_config().letterhead));
    let app = common::build_test_app_with(pool.clone(), renderer, notifier.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interns/{id}/activate"),
        &token,
        activation_body(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["intern"]["is_active"], true);
    assert_eq!(json["data"]["intern"]["internship_start"], "2026-06-01");
    assert_eq!(json["data"]["intern"]["internship_end"], "2026-07-31");
    assert_eq!(json["data"]["document"]["doc_type"], "offer_letter");
    let code = json["data"]["reference_code"].as_str().unwrap();
    assert_eq!(json["data"]["document"]["reference_code"], code);
    assert_eq!(notifier.sent(), 1);

    let sent = OutboxRepo::list(&pool, Some(OUTBOX_SENT), 50, 0).await.unwrap();
    assert!(sent.iter().any(|e| e.kind == kinds::ACTIVATION));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_render_failure_leaves_intern_untouched(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let token = token_for_user(&admin);
    let id = common::register_intern(&pool, "asha@example.com").await;

    let app = common::build_test_app_with(
        pool.clone(),
        Arc::new(FailingRenderer),
        Arc::new(RecordingNotifier::default()),
    );
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interns/{id}/activate"),
        &token,
        activation_body(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "DOWNSTREAM_FAILURE");

    let intern = InternRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(!intern.is_active);
    assert!(intern.internship_start.is_none());
    assert_eq!(DocumentRepo::count_for_intern(&pool, id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delivery_failure_keeps_activation(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let token = token_for_user(&admin);
    let id = common::register_intern(&pool, "asha@example.com").await;

    let renderer = Arc::new(PdfLetterRenderer::new(common::test_config().letterhead));
    let app = common::build_test_app_with(
        pool.clone(),
        renderer,
        Arc::new(RecordingNotifier::failing()),
    );
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interns/{id}/activate"),
        &token,
        activation_body(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "NOTIFICATION_PENDING");

    let intern = InternRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(intern.is_active);
    assert_eq!(DocumentRepo::count_for_intern(&pool, id).await.unwrap(), 1);

    let failed = OutboxRepo::list(&pool, Some(OUTBOX_FAILED), 50, 0).await.unwrap();
    let entry = failed
        .iter()
        .find(|e| e.kind == kinds::ACTIVATION)
        .expect("activation email stays in the outbox");
    assert_eq!(entry.attempts, 1);
    assert_eq!(entry.intern_id, Some(id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_activation_conflicts(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let token = token_for_user(&admin);
    let id = common::active_intern(&pool, &token, "asha@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interns/{id}/activate"),
        &token,
        activation_body(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(DocumentRepo::count_for_intern(&pool, id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activate_rejects_inverted_window(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let token = token_for_user(&admin);
    let id = common::register_intern(&pool, "asha@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interns/{id}/activate"),
        &token,
        serde_json::json!({
            "internship_start": "2026-07-31",
            "internship_end": "2026-06-01",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activation_requires_admin(pool: PgPool) {
    let manager = common::create_manager(&pool, "m@example.com").await;
    let id = common::register_intern(&pool, "asha@example.com").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/interns/{id}/activate"),
        &token_for_user(&manager),
        activation_body(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_offer_letter_is_publicly_verifiable(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let token = token_for_user(&admin);
    let id = common::active_intern(&pool, &token, "asha@example.com").await;

    let documents = DocumentRepo::list_for_intern(&pool, id).await.unwrap();
    let code = documents[0].reference_code.clone().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/verify/{code}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["student_name"], "Asha Verma");
    assert_eq!(json["data"]["college_name"], "City College");
    assert_eq!(json["data"]["doc_type"], "offer_letter");

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/verify/{code}/document")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.starts_with(b"%PDF"));

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/verify/NOT-A-CODE").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_intern_sees_offer_letter_and_notification(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let id = common::active_intern(&pool, &token_for_user(&admin), "asha@example.com").await;
    let token = token_for(id, ROLE_INTERN, "asha@example.com");

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/interns/me/documents", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/interns/me/notifications", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect();
    assert!(titles.contains(&"Internship confirmed".to_string()));
}
