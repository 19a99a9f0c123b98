//! Integration tests for the intern-owned child tables.
//!
//! Exercises the repository layer against a real database:
//! - Registration rows and activation guard
//! - Attendance day uniqueness and resolution
//! - Assignment listing and removal by project
//! - Task week numbering
//! - Outbox delivery bookkeeping

use chrono::{Duration, NaiveDate, Utc};
use cohort_core::attendance::AttendanceStatus;
use cohort_core::notify::OutgoingEmail;
use cohort_core::roles::{ROLE_INTERN, ROLE_MANAGER};
use cohort_core::task::next_week_number;
use cohort_db::models::assignment::CreateAssignment;
use cohort_db::models::intern::CreateInternProfile;
use cohort_db::models::outbox::{kinds, OUTBOX_FAILED, OUTBOX_SENDING, OUTBOX_SENT, REDACTED_BODY};
use cohort_db::models::project::CreateProject;
use cohort_db::models::task::CreateTask;
use cohort_db::models::user::CreateUser;
use cohort_db::repositories::{
    AssignmentRepo, AttendanceRepo, InternRepo, OutboxRepo, ProjectRepo, TaskRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn new_intern(pool: &PgPool, email: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            role: ROLE_INTERN.to_string(),
            full_name: "Asha Verma".to_string(),
            email: email.to_string(),
            password_hash: None,
            is_active: false,
        },
    )
    .await
    .unwrap();
    InternRepo::create_profile(
        pool,
        user.id,
        &CreateInternProfile {
            phone: "9876543210".to_string(),
            college: "City College".to_string(),
            course: "B.Tech".to_string(),
            department: "CSE".to_string(),
            semester: "6".to_string(),
            ref_no: "REF-1".to_string(),
            interview_at: Utc::now(),
            recommendation_ref: "rec.pdf".to_string(),
            college_id_ref: "id.pdf".to_string(),
        },
    )
    .await
    .unwrap();
    user.id
}

async fn new_project(pool: &PgPool, title: &str) -> (i64, i64) {
    let manager = UserRepo::create(
        pool,
        &CreateUser {
            role: ROLE_MANAGER.to_string(),
            full_name: "Ravi Manager".to_string(),
            email: format!("{}@mgr.test", title.to_lowercase()),
            password_hash: Some("hash".to_string()),
            is_active: true,
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            title: title.to_string(),
            description: String::new(),
            manager_id: manager.id,
            start_date: date(2026, 1, 1),
            end_date: date(2026, 6, 30),
        },
    )
    .await
    .unwrap();
    (manager.id, project.id)
}

fn assignment(intern_id: i64, project_id: i64) -> CreateAssignment {
    CreateAssignment {
        intern_id,
        project_id,
        start_date: date(2026, 2, 1),
        end_date: date(2026, 3, 1),
    }
}

// ---------------------------------------------------------------------------
// Test: registration + activation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_registered_intern_is_inactive(pool: PgPool) {
    let id = new_intern(&pool, "asha@example.com").await;

    let intern = InternRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(!intern.is_active);
    assert_eq!(intern.phone, "9876543210");
    assert!(intern.activated_at.is_none());

    let inactive = InternRepo::list(&pool, Some(false), 50, 0).await.unwrap();
    assert_eq!(inactive.len(), 1);
    let active = InternRepo::list(&pool, Some(true), 50, 0).await.unwrap();
    assert!(active.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    new_intern(&pool, "dup@example.com").await;

    let err = UserRepo::create(
        &pool,
        &CreateUser {
            role: ROLE_MANAGER.to_string(),
            full_name: "Someone".to_string(),
            email: "dup@example.com".to_string(),
            password_hash: None,
            is_active: true,
        },
    )
    .await
    .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activation_only_applies_once(pool: PgPool) {
    let id = new_intern(&pool, "once@example.com").await;

    let first = UserRepo::activate(&pool, id, "hash-1").await.unwrap();
    assert!(first.unwrap().is_active);

    let second = UserRepo::activate(&pool, id, "hash-2").await.unwrap();
    assert!(second.is_none());

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.password_hash.as_deref(), Some("hash-1"));
}

// ---------------------------------------------------------------------------
// Test: attendance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_one_entry_per_day(pool: PgPool) {
    let id = new_intern(&pool, "att@example.com").await;
    let day = date(2026, 3, 4);

    let first = AttendanceRepo::mark_day(&pool, id, day, None).await.unwrap();
    let entry = first.expect("first mark inserts");
    assert_eq!(entry.status, "pending");
    assert_eq!(entry.attendance_date, day);

    let second = AttendanceRepo::mark_day(&pool, id, day, None).await.unwrap();
    assert!(second.is_none());

    let next_day = AttendanceRepo::mark_day(&pool, id, day + Duration::days(1), None)
        .await
        .unwrap();
    assert!(next_day.is_some());

    let history = AttendanceRepo::list_for_intern(&pool, id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_marks_insert_once(pool: PgPool) {
    let id = new_intern(&pool, "race@example.com").await;
    let day = date(2026, 3, 5);

    let (a, b) = tokio::join!(
        AttendanceRepo::mark_day(&pool, id, day, None),
        AttendanceRepo::mark_day(&pool, id, day, None),
    );
    let inserted = [a.unwrap(), b.unwrap()].iter().filter(|e| e.is_some()).count();
    assert_eq!(inserted, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_resolution_and_summary(pool: PgPool) {
    let id = new_intern(&pool, "sum@example.com").await;
    let (manager_id, project_id) = new_project(&pool, "Portal").await;
    AssignmentRepo::create(&pool, &assignment(id, project_id)).await.unwrap();

    let d1 = AttendanceRepo::mark_day(&pool, id, date(2026, 3, 2), None)
        .await
        .unwrap()
        .unwrap();
    AttendanceRepo::mark_day(&pool, id, date(2026, 3, 3), None)
        .await
        .unwrap();

    let pending = AttendanceRepo::list_pending(&pool, Some(manager_id)).await.unwrap();
    assert_eq!(pending.len(), 2);
    let unrelated = AttendanceRepo::list_pending(&pool, Some(manager_id + 1000))
        .await
        .unwrap();
    assert!(unrelated.is_empty());

    let resolved = AttendanceRepo::resolve(&pool, d1.id, AttendanceStatus::Present, manager_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.status, "present");
    assert_eq!(resolved.approved_by, Some(manager_id));
    assert!(resolved.approved_at.is_some());

    let summary = AttendanceRepo::summary_for_intern(&pool, id).await.unwrap();
    assert_eq!(summary.present, 1);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.absent, 0);

    let all = AttendanceRepo::counts_for_all(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].present, 1);
}

// ---------------------------------------------------------------------------
// Test: assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_remove_all_assignments_for_project(pool: PgPool) {
    let id = new_intern(&pool, "assign@example.com").await;
    let (_, project_a) = new_project(&pool, "Alpha").await;
    let (_, project_b) = new_project(&pool, "Beta").await;

    for _ in 0..3 {
        AssignmentRepo::create(&pool, &assignment(id, project_a)).await.unwrap();
    }
    AssignmentRepo::create(&pool, &assignment(id, project_b)).await.unwrap();

    let roster = AssignmentRepo::list_for_project(&pool, project_a).await.unwrap();
    assert_eq!(roster.len(), 3);

    let removed = AssignmentRepo::delete_for_project(&pool, id, project_a).await.unwrap();
    assert_eq!(removed, 3);

    let removed_again = AssignmentRepo::delete_for_project(&pool, id, project_a).await.unwrap();
    assert_eq!(removed_again, 0);

    let remaining = AssignmentRepo::list_for_intern(&pool, id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].project_title, "Beta");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_match_is_oldest_assignment(pool: PgPool) {
    let id = new_intern(&pool, "first@example.com").await;
    let (manager_id, project_id) = new_project(&pool, "Gamma").await;

    let first = AssignmentRepo::create(&pool, &assignment(id, project_id)).await.unwrap();
    AssignmentRepo::create(&pool, &assignment(id, project_id)).await.unwrap();

    let found = AssignmentRepo::find_first_for_project(&pool, id, project_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.id);
    assert_eq!(found.status, "assigned");

    assert!(AssignmentRepo::intern_managed_by(&pool, id, manager_id).await.unwrap());
    assert_eq!(
        AssignmentRepo::current_project(&pool, id).await.unwrap(),
        Some(project_id)
    );

    let completed = AssignmentRepo::complete_open_for_intern(&pool, id).await.unwrap();
    assert_eq!(completed, 2);
    assert_eq!(AssignmentRepo::current_project(&pool, id).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stale_assignment_update_is_not_applied(pool: PgPool) {
    let id = new_intern(&pool, "stale@example.com").await;
    let (_, project_id) = new_project(&pool, "Delta").await;
    let read = AssignmentRepo::create(&pool, &assignment(id, project_id)).await.unwrap();

    // Another request completes the assignment after `read` was loaded.
    let mut completed = read.clone();
    completed.status = "completed".to_string();
    AssignmentRepo::update(&pool, &completed, &read.status)
        .await
        .unwrap()
        .unwrap();

    // A patch validated against the old status must not land.
    let mut reopened = read.clone();
    reopened.status = "in-progress".to_string();
    let outcome = AssignmentRepo::update(&pool, &reopened, &read.status).await.unwrap();
    assert!(outcome.is_none());

    let stored = AssignmentRepo::find_by_id(&pool, read.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "completed");
}

// ---------------------------------------------------------------------------
// Test: tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_week_numbers_follow_task_count(pool: PgPool) {
    let id = new_intern(&pool, "tasks@example.com").await;
    let other = new_intern(&pool, "other@example.com").await;

    for n in 1..=3 {
        let prior = TaskRepo::count_for_intern(&pool, id).await.unwrap();
        let task = TaskRepo::create(
            &pool,
            id,
            next_week_number(prior),
            &CreateTask {
                title: format!("Task {n}"),
                description: String::new(),
                deadline: Utc::now() + Duration::days(7),
            },
        )
        .await
        .unwrap();
        assert_eq!(i64::from(task.week_number), prior + 1);
        assert_eq!(task.status, "pending");
        assert_eq!(task.feedback, "");
    }

    let other_task = TaskRepo::create(
        &pool,
        other,
        next_week_number(0),
        &CreateTask {
            title: "Other".to_string(),
            description: String::new(),
            deadline: Utc::now(),
        },
    )
    .await
    .unwrap();
    assert_eq!(other_task.week_number, 1);

    let clash = TaskRepo::create(
        &pool,
        id,
        2,
        &CreateTask {
            title: "Duplicate week".to_string(),
            description: String::new(),
            deadline: Utc::now(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        clash.as_database_error().and_then(|e| e.constraint()),
        Some("uq_tasks_intern_week")
    );

    let tasks = TaskRepo::list_for_intern(&pool, id).await.unwrap();
    let weeks: Vec<i32> = tasks.iter().map(|t| t.week_number).collect();
    assert_eq!(weeks, vec![1, 2, 3]);
}

// ---------------------------------------------------------------------------
// Test: outbox
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_outbox_due_and_delivery_state(pool: PgPool) {
    let id = new_intern(&pool, "mail@example.com").await;
    let email = OutgoingEmail {
        to: "mail@example.com".to_string(),
        subject: "Interview".to_string(),
        body: "See you".to_string(),
        attachment: None,
    };

    let entry = OutboxRepo::enqueue(&pool, Some(id), kinds::INTERVIEW_CONFIRMATION, &email)
        .await
        .unwrap();
    assert_eq!(entry.status, "pending");
    assert!(OutboxRepo::has_undelivered(&pool, id).await.unwrap());

    OutboxRepo::mark_failed(&pool, entry.id, "smtp down").await.unwrap();
    let failed = OutboxRepo::find_by_id(&pool, entry.id).await.unwrap().unwrap();
    assert_eq!(failed.status, OUTBOX_FAILED);
    assert_eq!(failed.attempts, 1);
    assert_eq!(failed.last_error.as_deref(), Some("smtp down"));

    let claimed = OutboxRepo::claim_due(&pool, 5, 10, 600).await.unwrap();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].status, OUTBOX_SENDING);
    assert!(claimed[0].claimed_at.is_some());

    // A claimed row is not handed out again until the claim goes stale.
    assert!(OutboxRepo::claim_due(&pool, 5, 10, 600).await.unwrap().is_empty());
    assert!(OutboxRepo::claim(&pool, entry.id, 600).await.unwrap().is_none());
    assert!(OutboxRepo::has_undelivered(&pool, id).await.unwrap());

    OutboxRepo::mark_sent(&pool, entry.id).await.unwrap();
    let sent = OutboxRepo::find_by_id(&pool, entry.id).await.unwrap().unwrap();
    assert_eq!(sent.status, OUTBOX_SENT);
    assert!(sent.sent_at.is_some());
    assert!(!OutboxRepo::has_undelivered(&pool, id).await.unwrap());
    assert!(OutboxRepo::claim(&pool, entry.id, 600).await.unwrap().is_none());
    assert_eq!(sent.body, "See you");
    assert_eq!(sent.to_email().subject, "Interview");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_outbox_claims_respect_attempts_and_staleness(pool: PgPool) {
    let email = OutgoingEmail {
        to: "m@example.com".to_string(),
        subject: "Account".to_string(),
        body: "Temporary password: Secret123!".to_string(),
        attachment: None,
    };
    let entry = OutboxRepo::enqueue(&pool, None, kinds::CREDENTIALS, &email)
        .await
        .unwrap();

    OutboxRepo::claim(&pool, entry.id, 600).await.unwrap().unwrap();
    OutboxRepo::mark_failed(&pool, entry.id, "smtp down").await.unwrap();
    assert!(OutboxRepo::claim_due(&pool, 1, 10, 600).await.unwrap().is_empty());

    // A single claim ignores the attempt cap.
    let claimed = OutboxRepo::claim(&pool, entry.id, 600).await.unwrap().unwrap();
    assert_eq!(claimed.attempts, 1);

    // Back-date the claim, then reclaim it with a shorter timeout.
    sqlx::query("UPDATE email_outbox SET claimed_at = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await
        .unwrap();
    assert!(OutboxRepo::claim(&pool, entry.id, 600).await.unwrap().is_none());
    assert_eq!(OutboxRepo::claim_due(&pool, 5, 10, 0).await.unwrap().len(), 1);

    OutboxRepo::mark_sent(&pool, entry.id).await.unwrap();
    let sent = OutboxRepo::find_by_id(&pool, entry.id).await.unwrap().unwrap();
    assert_eq!(sent.body, REDACTED_BODY);
    assert_eq!(sent.attempts, 2);
}
