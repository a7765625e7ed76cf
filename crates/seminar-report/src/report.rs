//! Generated reports and their export to disk.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use seminar_core::config::ReportFormat;
use seminar_core::graph::SeminarGraph;
use seminar_core::model::Award;
use seminar_core::statistics::SeminarStatistics;

use crate::{html, text};

/// What a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Schedule,
    Evaluation,
    Award,
    Statistics,
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Schedule => write!(f, "Schedule"),
            ReportKind::Evaluation => write!(f, "Evaluation"),
            ReportKind::Award => write!(f, "Award"),
            ReportKind::Statistics => write!(f, "Statistics"),
        }
    }
}

/// A generated report. The content is plain text; HTML is rendered from it
/// on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Unique report identifier.
    pub id: Uuid,
    pub kind: ReportKind,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    pub content: String,
}

impl Report {
    /// Wrap already rendered content.
    pub fn new(kind: ReportKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            generated_at: Utc::now(),
            content: content.into(),
        }
    }

    fn generate(kind: ReportKind, render: impl FnOnce(DateTime<Utc>) -> String) -> Self {
        let generated_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            generated_at,
            content: render(generated_at),
        }
    }

    pub fn schedule(graph: &SeminarGraph) -> Self {
        Self::generate(ReportKind::Schedule, |at| text::schedule_report(graph, at))
    }

    pub fn evaluation(graph: &SeminarGraph) -> Self {
        Self::generate(ReportKind::Evaluation, |at| text::evaluation_report(graph, at))
    }

    pub fn awards(graph: &SeminarGraph, awards: &[Award]) -> Self {
        Self::generate(ReportKind::Award, |at| text::award_report(graph, awards, at))
    }

    pub fn statistics(stats: &SeminarStatistics) -> Self {
        Self::generate(ReportKind::Statistics, |at| text::statistics_report(stats, at))
    }

    /// Render in the requested format.
    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.content.clone(),
            ReportFormat::Html => html::generate_html(self),
        }
    }

    /// Default export file name, e.g. `schedule-20250314-093000.html`.
    pub fn file_name(&self, format: ReportFormat) -> String {
        format!(
            "{}-{}.{}",
            self.kind.to_string().to_lowercase(),
            self.generated_at.format("%Y%m%d-%H%M%S"),
            format.extension()
        )
    }

    /// Write the rendered report to `path`, creating parent directories.
    pub fn export(&self, path: &Path, format: ReportFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.render(format))
            .with_context(|| format!("failed to export report to {}", path.display()))?;
        Ok(())
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Report - {}", self.kind, self.id)
    }
}
