//! seminar-report: Schedule, evaluation, award and statistics reports.
//!
//! Reports are rendered as plain text from the seminar graph and can be
//! exported as text or as a self-contained HTML page.

pub mod html;
pub mod report;
pub mod text;

pub use report::{Report, ReportKind};
