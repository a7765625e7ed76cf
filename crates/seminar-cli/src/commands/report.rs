//! The `seminar report` commands.

use std::path::{Path, PathBuf};

use anyhow::Result;

use seminar_core::config::ReportFormat;
use seminar_core::model::AwardCategory;
use seminar_report::Report;

use super::Seminar;

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Schedule,
    Evaluation,
    Awards,
    Stats,
}

pub fn execute(
    data: Option<&Path>,
    config: Option<&Path>,
    kind: Kind,
    format: Option<ReportFormat>,
    output: Option<PathBuf>,
    export: bool,
) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    let format = format.unwrap_or(seminar.config.default_report_format);

    let report = match kind {
        Kind::Schedule => seminar.repo.with_graph(Report::schedule),
        Kind::Evaluation => seminar.repo.with_graph(Report::evaluation),
        Kind::Awards => {
            let mut awards = seminar.repo.awards();
            if awards.is_empty() {
                awards = seminar.repo.compute_awards(&AwardCategory::ALL);
            }
            seminar
                .repo
                .with_graph(|graph| Report::awards(graph, &awards))
        }
        Kind::Stats => Report::statistics(&seminar.repo.statistics()),
    };

    let target = match (output, export) {
        (Some(path), _) => Some(path),
        (None, true) => Some(seminar.config.report_dir.join(report.file_name(format))),
        (None, false) => None,
    };

    match target {
        Some(path) => {
            report.export(&path, format)?;
            tracing::info!(kind = %report.kind, "report exported");
            println!("{}", path.display());
        }
        None => print!("{}", report.render(format)),
    }
    Ok(())
}
