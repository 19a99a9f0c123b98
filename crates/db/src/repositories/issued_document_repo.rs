//! Repository for `issued_documents`, the verification archive.

use sqlx::{PgExecutor, PgPool};

use crate::models::document::{CreateIssuedDocument, IssuedDocument};

const COLUMNS: &str = "reference_code, intern_id, doc_type, student_name, college_name, \
                       department, issue_date, content, created_at";

/// Archived letters keyed by reference code.
pub struct IssuedDocumentRepo;

impl IssuedDocumentRepo {
    /// Archive an issued letter.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateIssuedDocument,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO issued_documents
                (reference_code, intern_id, doc_type, student_name, college_name,
                 department, issue_date, content)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&input.reference_code)
        .bind(input.intern_id)
        .bind(&input.doc_type)
        .bind(&input.student_name)
        .bind(&input.college_name)
        .bind(&input.department)
        .bind(input.issue_date)
        .bind(&input.content)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Look up an archived letter by its reference code.
    pub async fn find_by_code(
        pool: &PgPool,
        reference_code: &str,
    ) -> Result<Option<IssuedDocument>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issued_documents WHERE reference_code = $1");
        sqlx::query_as::<_, IssuedDocument>(&query)
            .bind(reference_code)
            .fetch_optional(pool)
            .await
    }
}
