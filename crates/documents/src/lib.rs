//! PDF rendering of offer letters, completion letters and attendance reports.
//!
//! [`PdfLetterRenderer`] implements the core [`DocumentRenderer`] boundary
//! with `lopdf`, using only the standard Helvetica fonts so no font files
//! ship with the server.

mod layout;
pub mod reference;

use async_trait::async_trait;
use chrono::NaiveDate;
use cohort_core::calendar::to_ist;
use cohort_core::letters::{
    AttendanceReport, CompletionLetter, DocumentRenderer, OfferLetter, RenderError,
    RenderedDocument,
};

use crate::layout::PageText;
use crate::reference::generate_reference_code;

const OFFER_PREFIX: &str = "OFR";
const COMPLETION_PREFIX: &str = "CMP";

/// Letterhead details printed at the top of every document.
#[derive(Debug, Clone)]
pub struct Letterhead {
    pub organisation_name: String,
    pub organisation_address: String,
}

/// Renders documents as single-column A4 PDFs.
#[derive(Debug, Clone)]
pub struct PdfLetterRenderer {
    letterhead: Letterhead,
}

impl PdfLetterRenderer {
    pub fn new(letterhead: Letterhead) -> Self {
        Self { letterhead }
    }

    fn letterhead(&self, text: &mut PageText) {
        text.heading(&self.letterhead.organisation_name);
        if !self.letterhead.organisation_address.is_empty() {
            text.line(&self.letterhead.organisation_address);
        }
        text.blank();
    }

    fn addressee(
        text: &mut PageText,
        reference_code: &str,
        issued_on: NaiveDate,
        contact_name: &str,
        college_name: &str,
        address_line: &str,
    ) {
        text.line(format!("Ref: {reference_code}"))
            .line(format!("Date: {}", format_date(issued_on)))
            .blank()
            .line("To,")
            .line(contact_name)
            .line(college_name);
        if !address_line.is_empty() {
            text.line(address_line);
        }
        text.blank();
    }

    fn verification_footer(text: &mut PageText, reference_code: &str) {
        text.blank().paragraph(&format!(
            "This letter can be verified online using reference code {reference_code}."
        ));
    }

    fn offer_letter_text(&self, letter: &OfferLetter, reference_code: &str) -> PageText {
        let mut text = PageText::new();
        self.letterhead(&mut text);
        Self::addressee(
            &mut text,
            reference_code,
            letter.issued_on,
            &letter.contact_name,
            &letter.college_name,
            &letter.address_line,
        );
        text.bold("Subject: Internship Offer Letter")
            .blank()
            .line(format!("Dear {},", letter.contact_name))
            .blank()
            .paragraph(&format!(
                "With reference to your letter no. {}, we are pleased to inform you that {}, \
                 a student of semester {} in the department of {}, has been selected for an \
                 internship at {}.",
                letter.ref_no,
                letter.student_name,
                letter.semester,
                letter.department,
                self.letterhead.organisation_name,
            ))
            .blank()
            .paragraph(&format!(
                "The internship will run from {} to {}. The intern is expected to follow the \
                 working hours and policies of the organisation for the duration of the \
                 internship.",
                format_date(letter.start_date),
                format_date(letter.end_date),
            ))
            .blank()
            .line("Yours sincerely,")
            .line(format!("For {}", self.letterhead.organisation_name));
        Self::verification_footer(&mut text, reference_code);
        text
    }

    fn completion_letter_text(&self, letter: &CompletionLetter, reference_code: &str) -> PageText {
        let mut text = PageText::new();
        self.letterhead(&mut text);
        Self::addressee(
            &mut text,
            reference_code,
            letter.issued_on,
            &letter.contact_name,
            &letter.college_name,
            &letter.address_line,
        );
        text.bold("Subject: Internship Completion Certificate")
            .blank()
            .line(format!("Dear {},", letter.contact_name))
            .blank()
            .paragraph(&format!(
                "This is to certify that {}, a student of semester {} in the department of {} \
                 (your reference no. {}), has successfully completed an internship at {} from \
                 {} to {}.",
                letter.student_name,
                letter.semester,
                letter.department,
                letter.ref_no,
                self.letterhead.organisation_name,
                format_date(letter.start_date),
                format_date(letter.end_date),
            ));
        if !letter.project_titles.is_empty() {
            text.blank().line("During the internship the student worked on:");
            for title in &letter.project_titles {
                text.line(format!("  - {title}"));
            }
        }
        text.blank()
            .paragraph("We wish the student every success in their future endeavours.")
            .blank()
            .line("Yours sincerely,")
            .line(format!("For {}", self.letterhead.organisation_name));
        Self::verification_footer(&mut text, reference_code);
        text
    }

    fn attendance_report_text(&self, report: &AttendanceReport) -> PageText {
        let mut text = PageText::new();
        self.letterhead(&mut text);
        text.bold("Attendance Report").line(format!(
            "Generated {}",
            to_ist(report.generated_at).format("%d %B %Y %H:%M IST")
        ));
        text.blank();
        if report.rows.is_empty() {
            text.line("No interns on record.");
            return text;
        }
        text.bold("Intern | Present | Absent | Pending | Present % | Absent %");
        for row in &report.rows {
            let s = &row.summary;
            text.line(format!(
                "{} <{}> | {} | {} | {} | {:.1}% | {:.1}%",
                row.intern_name,
                row.email,
                s.present,
                s.absent,
                s.pending,
                s.present_percentage(),
                s.absent_percentage()
            ));
        }
        text
    }
}

fn format_date(day: NaiveDate) -> String {
    day.format("%d %B %Y").to_string()
}

fn render_failed(err: lopdf::Error) -> RenderError {
    RenderError::Failed(err.to_string())
}

#[async_trait]
impl DocumentRenderer for PdfLetterRenderer {
    async fn render_offer_letter(
        &self,
        letter: &OfferLetter,
    ) -> Result<RenderedDocument, RenderError> {
        let reference_code = generate_reference_code(OFFER_PREFIX, letter.issued_on);
        let bytes = self
            .offer_letter_text(letter, &reference_code)
            .into_pdf()
            .map_err(render_failed)?;
        tracing::debug!(%reference_code, size = bytes.len(), "Rendered offer letter");
        Ok(RenderedDocument {
            bytes,
            reference_code,
        })
    }

    async fn render_completion_letter(
        &self,
        letter: &CompletionLetter,
    ) -> Result<RenderedDocument, RenderError> {
        let reference_code = generate_reference_code(COMPLETION_PREFIX, letter.issued_on);
        let bytes = self
            .completion_letter_text(letter, &reference_code)
            .into_pdf()
            .map_err(render_failed)?;
        tracing::debug!(%reference_code, size = bytes.len(), "Rendered completion letter");
        Ok(RenderedDocument {
            bytes,
            reference_code,
        })
    }

    async fn render_attendance_report(
        &self,
        report: &AttendanceReport,
    ) -> Result<Vec<u8>, RenderError> {
        self.attendance_report_text(report)
            .into_pdf()
            .map_err(render_failed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use cohort_core::attendance::AttendanceSummary;
    use cohort_core::letters::AttendanceReportRow;

    use super::*;
    use crate::layout::Line;

    fn renderer() -> PdfLetterRenderer {
        PdfLetterRenderer::new(Letterhead {
            organisation_name: "Acme Labs".to_string(),
            organisation_address: "1 Main Road, Pune".to_string(),
        })
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn offer() -> OfferLetter {
        OfferLetter {
            college_name: "City College".to_string(),
            contact_name: "Dr. Rao".to_string(),
            address_line: String::new(),
            department: "CSE".to_string(),
            semester: "6".to_string(),
            ref_no: "CC/2026/14".to_string(),
            start_date: day(2026, 4, 1),
            end_date: day(2026, 6, 30),
            student_name: "Asha Verma".to_string(),
            issued_on: day(2026, 3, 10),
        }
    }

    fn contains(text: &PageText, needle: &str) -> bool {
        text.lines().iter().any(|line| match line {
            Line::Heading(t) | Line::Body(t) | Line::Bold(t) => t.contains(needle),
            Line::Blank => false,
        })
    }

    #[tokio::test]
    async fn offer_letter_is_a_pdf_with_reference() {
        let rendered = renderer().render_offer_letter(&offer()).await.unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF-1.5"));
        assert!(rendered.reference_code.starts_with("OFR-2026-"));
        assert!(lopdf::Document::load_mem(&rendered.bytes).is_ok());
    }

    #[tokio::test]
    async fn every_render_gets_a_new_reference() {
        let r = renderer();
        let a = r.render_offer_letter(&offer()).await.unwrap();
        let b = r.render_offer_letter(&offer()).await.unwrap();
        assert_ne!(a.reference_code, b.reference_code);
    }

    #[test]
    fn offer_letter_text_names_student_and_window() {
        let text = renderer().offer_letter_text(&offer(), "OFR-2026-ABC");
        assert!(contains(&text, "Asha Verma"));
        assert!(contains(&text, "01 April 2026"));
        assert!(contains(&text, "30 June 2026"));
        assert!(contains(&text, "OFR-2026-ABC"));
        assert!(contains(&text, "Dr. Rao"));
    }

    #[tokio::test]
    async fn completion_letter_lists_projects() {
        let letter = CompletionLetter {
            college_name: "City College".to_string(),
            contact_name: "Dr. Rao".to_string(),
            address_line: String::new(),
            department: "CSE".to_string(),
            semester: "6".to_string(),
            ref_no: "CC/2026/14".to_string(),
            start_date: day(2026, 4, 1),
            end_date: day(2026, 6, 30),
            student_name: "Asha Verma".to_string(),
            project_titles: vec!["Portal".to_string(), "Search".to_string()],
            issued_on: day(2026, 7, 1),
        };
        let r = renderer();
        let text = r.completion_letter_text(&letter, "CMP-2026-X");
        assert!(contains(&text, "  - Portal"));
        assert!(contains(&text, "  - Search"));

        let rendered = r.render_completion_letter(&letter).await.unwrap();
        assert!(rendered.reference_code.starts_with("CMP-2026-"));
        assert!(rendered.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn attendance_report_renders_rows() {
        let report = AttendanceReport {
            generated_at: Utc::now(),
            rows: vec![AttendanceReportRow {
                intern_name: "Asha Verma".to_string(),
                email: "asha@example.com".to_string(),
                summary: AttendanceSummary {
                    present: 3,
                    absent: 1,
                    pending: 0,
                },
            }],
        };
        let r = renderer();
        let text = r.attendance_report_text(&report);
        assert!(contains(&text, "| 3 | 1 | 0 | 75.0%"));

        let bytes = r.render_attendance_report(&report).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn attendance_report_wraps_long_rows() {
        let report = AttendanceReport {
            generated_at: Utc::now(),
            rows: vec![AttendanceReportRow {
                intern_name: "Venkata Subramanya Lakshmi Narasimha Raghavendra Prasad".to_string(),
                email: "venkata.subramanya.lakshmi.narasimha@university-college.example.com"
                    .to_string(),
                summary: AttendanceSummary {
                    present: 3,
                    absent: 1,
                    pending: 0,
                },
            }],
        };
        let text = renderer().attendance_report_text(&report);
        let body: Vec<&Line> = text
            .lines()
            .iter()
            .filter(|l| matches!(l, Line::Body(_)))
            .collect();
        assert!(text.lines().iter().all(|l| match l {
            Line::Body(t) | Line::Bold(t) => t.chars().count() <= 88,
            _ => true,
        }));
        assert!(body.len() > 2);
        assert!(contains(&text, "75.0%"));
    }
}
