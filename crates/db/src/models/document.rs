//! Intern documents and the issued-document archive.

use chrono::NaiveDate;
use cohort_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Metadata of a row in `intern_documents` (content excluded).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentInfo {
    pub id: DbId,
    pub intern_id: DbId,
    pub doc_type: String,
    pub content_type: String,
    pub reference_code: Option<String>,
    pub uploaded_at: Timestamp,
}

/// A full row from `intern_documents`.
#[derive(Debug, Clone, FromRow)]
pub struct InternDocument {
    pub id: DbId,
    pub intern_id: DbId,
    pub doc_type: String,
    pub content_type: String,
    pub content: Vec<u8>,
    pub reference_code: Option<String>,
    pub uploaded_at: Timestamp,
}

/// DTO for storing a document on an intern.
#[derive(Debug, Clone)]
pub struct CreateInternDocument {
    pub intern_id: DbId,
    pub doc_type: String,
    pub content_type: String,
    pub content: Vec<u8>,
    pub reference_code: Option<String>,
}

/// A row from `issued_documents`, the public verification archive.
#[derive(Debug, Clone, FromRow)]
pub struct IssuedDocument {
    pub reference_code: String,
    pub intern_id: Option<DbId>,
    pub doc_type: String,
    pub student_name: String,
    pub college_name: String,
    pub department: String,
    pub issue_date: NaiveDate,
    pub content: Vec<u8>,
    pub created_at: Timestamp,
}

/// DTO for archiving an issued letter.
#[derive(Debug, Clone)]
pub struct CreateIssuedDocument {
    pub reference_code: String,
    pub intern_id: DbId,
    pub doc_type: String,
    pub student_name: String,
    pub college_name: String,
    pub department: String,
    pub issue_date: NaiveDate,
    pub content: Vec<u8>,
}
