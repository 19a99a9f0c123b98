//! Letter and report payloads plus the [`DocumentRenderer`] boundary.
//!
//! The lifecycle never lays out documents itself. It assembles one of the
//! payload structs below and hands it to whichever renderer the server was
//! built with.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::attendance::AttendanceSummary;
use crate::types::Timestamp;

/// Document type tag for offer letters.
pub const DOC_OFFER_LETTER: &str = "offer_letter";
/// Document type tag for completion letters.
pub const DOC_COMPLETION_LETTER: &str = "completion_letter";

/// MIME type of every rendered document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Addressee used when the College Directory has no contact for a college.
pub const DEFAULT_CONTACT_NAME: &str = "The Dean";

/// Fields printed on an offer letter.
#[derive(Debug, Clone, Serialize)]
pub struct OfferLetter {
    pub college_name: String,
    pub contact_name: String,
    pub address_line: String,
    pub department: String,
    pub semester: String,
    pub ref_no: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub student_name: String,
    pub issued_on: NaiveDate,
}

/// Fields printed on a completion letter.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionLetter {
    pub college_name: String,
    pub contact_name: String,
    pub address_line: String,
    pub department: String,
    pub semester: String,
    pub ref_no: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub student_name: String,
    pub project_titles: Vec<String>,
    pub issued_on: NaiveDate,
}

/// One intern's line in an attendance report.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReportRow {
    pub intern_name: String,
    pub email: String,
    pub summary: AttendanceSummary,
}

/// Attendance summary across interns.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReport {
    pub generated_at: Timestamp,
    pub rows: Vec<AttendanceReportRow>,
}

/// A rendered letter and the public key it can be verified under.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    /// Unique per render; used by the public verification lookup.
    pub reference_code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Document rendering failed: {0}")]
    Failed(String),
}

/// Produces letter and report documents from structured fields.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render_offer_letter(
        &self,
        letter: &OfferLetter,
    ) -> Result<RenderedDocument, RenderError>;

    async fn render_completion_letter(
        &self,
        letter: &CompletionLetter,
    ) -> Result<RenderedDocument, RenderError>;

    async fn render_attendance_report(
        &self,
        report: &AttendanceReport,
    ) -> Result<Vec<u8>, RenderError>;
}
