//! The `seminar submit`, `upload`, `withdraw` and `submissions` commands.

use std::path::Path;

use anyhow::{Context, Result};

use seminar_core::model::{NewSubmission, PresentationType};

use super::{print_json, Seminar};

pub fn submit(
    data: Option<&Path>,
    config: Option<&Path>,
    student: &str,
    title: String,
    abstract_text: String,
    presentation_type: PresentationType,
    supervisor: Option<String>,
    file: Option<String>,
) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    let id = seminar
        .repo
        .register_submission(
            student,
            NewSubmission {
                title,
                abstract_text,
                supervisor_name: supervisor,
                presentation_type,
                file_path: file,
            },
        )
        .with_context(|| format!("failed to register submission for {student}"))?;
    println!("{id}");
    Ok(())
}

pub fn upload(
    data: Option<&Path>,
    config: Option<&Path>,
    student: &str,
    submission: &str,
    path: &str,
) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    seminar.repo.upload_material(student, submission, path)?;
    println!("Attached {path} to {submission}");
    Ok(())
}

pub fn withdraw(data: Option<&Path>, config: Option<&Path>, submission: &str) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    let removed = seminar.repo.remove_submission(submission)?;
    println!(
        "Withdrew {} \"{}\" ({} evaluations removed)",
        removed.id,
        removed.title,
        removed.evaluations.len()
    );
    Ok(())
}

pub fn list(
    data: Option<&Path>,
    config: Option<&Path>,
    evaluator: Option<&str>,
    json: bool,
) -> Result<()> {
    use comfy_table::{Cell, Table};

    let seminar = Seminar::open(data, config)?;
    let submissions = match evaluator {
        Some(id) => {
            if seminar.repo.find_evaluator(id).is_none() {
                anyhow::bail!("no evaluator with id {id}");
            }
            seminar.repo.assigned_submissions(id)
        }
        None => seminar.repo.submissions(),
    };

    if json {
        return print_json(&submissions);
    }
    if submissions.is_empty() {
        println!("No submissions.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Title", "Student", "Type", "Session", "Board", "Evaluations", "Average",
    ]);
    for sub in &submissions {
        let average = seminar.repo.average_score(&sub.id).unwrap_or(0.0);
        table.add_row(vec![
            Cell::new(&sub.id),
            Cell::new(&sub.title),
            Cell::new(&sub.student_id),
            Cell::new(sub.presentation_type),
            Cell::new(sub.session_id.as_deref().unwrap_or("-")),
            Cell::new(if sub.board_id.is_empty() { "-" } else { sub.board_id.as_str() }),
            Cell::new(sub.evaluations.len()),
            Cell::new(format!("{average:.2}")),
        ]);
    }
    println!("{table}");
    Ok(())
}
