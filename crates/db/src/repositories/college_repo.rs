//! Repository for the `colleges` directory.

use sqlx::PgPool;

use crate::models::college::{College, UpsertCollege};

const COLUMNS: &str = "id, name, contact_name, created_at, updated_at";

/// Lookup and maintenance of college contact names.
pub struct CollegeRepo;

impl CollegeRepo {
    /// List every college alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<College>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM colleges ORDER BY name");
        sqlx::query_as::<_, College>(&query).fetch_all(pool).await
    }

    /// Case-insensitive lookup by college name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<College>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM colleges WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, College>(&query)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    /// Insert a college or replace the contact name of an existing one.
    pub async fn upsert(pool: &PgPool, input: &UpsertCollege) -> Result<College, sqlx::Error> {
        let query = format!(
            "INSERT INTO colleges (name, contact_name)
             VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET contact_name = EXCLUDED.contact_name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, College>(&query)
            .bind(input.name.trim())
            .bind(input.contact_name.trim())
            .fetch_one(pool)
            .await
    }
}
