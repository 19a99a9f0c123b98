//! Repository for `intern_documents`.

use cohort_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::document::{CreateInternDocument, DocumentInfo, InternDocument};

const INFO_COLUMNS: &str = "id, intern_id, doc_type, content_type, reference_code, uploaded_at";

/// Documents held on an intern's record.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Attach a document to an intern.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateInternDocument,
    ) -> Result<DocumentInfo, sqlx::Error> {
        let query = format!(
            "INSERT INTO intern_documents
                (intern_id, doc_type, content_type, content, reference_code)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {INFO_COLUMNS}"
        );
        sqlx::query_as::<_, DocumentInfo>(&query)
            .bind(input.intern_id)
            .bind(&input.doc_type)
            .bind(&input.content_type)
            .bind(&input.content)
            .bind(&input.reference_code)
            .fetch_one(executor)
            .await
    }

    /// Metadata of an intern's documents, in upload order.
    pub async fn list_for_intern(
        pool: &PgPool,
        intern_id: DbId,
    ) -> Result<Vec<DocumentInfo>, sqlx::Error> {
        let query = format!(
            "SELECT {INFO_COLUMNS} FROM intern_documents
             WHERE intern_id = $1
             ORDER BY uploaded_at, id"
        );
        sqlx::query_as::<_, DocumentInfo>(&query)
            .bind(intern_id)
            .fetch_all(pool)
            .await
    }

    /// A full document, scoped to its owner.
    pub async fn find_for_intern(
        pool: &PgPool,
        intern_id: DbId,
        id: DbId,
    ) -> Result<Option<InternDocument>, sqlx::Error> {
        sqlx::query_as::<_, InternDocument>(
            "SELECT id, intern_id, doc_type, content_type, content, reference_code, uploaded_at
             FROM intern_documents
             WHERE id = $1 AND intern_id = $2",
        )
        .bind(id)
        .bind(intern_id)
        .fetch_optional(pool)
        .await
    }

    /// Number of documents an intern holds.
    pub async fn count_for_intern(pool: &PgPool, intern_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM intern_documents WHERE intern_id = $1")
            .bind(intern_id)
            .fetch_one(pool)
            .await
    }
}
