//! The `seminar session` commands.

use std::path::Path;

use anyhow::Result;

use seminar_core::model::{NewSession, PresentationType};

use super::{print_json, Seminar};

pub fn create(
    data: Option<&Path>,
    config: Option<&Path>,
    coordinator: &str,
    date: String,
    time: String,
    venue: String,
    session_type: PresentationType,
) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    let id = seminar.repo.create_session(
        coordinator,
        NewSession {
            date,
            time,
            venue,
            session_type,
        },
    )?;
    println!("{id}");
    Ok(())
}

pub fn delete(data: Option<&Path>, config: Option<&Path>, id: &str) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    let removed = seminar.repo.remove_session(id)?;
    println!(
        "Deleted {} ({} submissions and {} evaluators released)",
        removed.id,
        removed.submissions.len(),
        removed.evaluators.len()
    );
    Ok(())
}

pub fn list(data: Option<&Path>, config: Option<&Path>, json: bool) -> Result<()> {
    use comfy_table::{Cell, Table};

    let seminar = Seminar::open(data, config)?;
    let sessions = seminar.repo.sessions();

    if json {
        return print_json(&sessions);
    }
    if sessions.is_empty() {
        println!("No sessions available.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Date",
        "Time",
        "Venue",
        "Type",
        "Presentations",
        "Evaluators",
    ]);
    for s in &sessions {
        table.add_row(vec![
            Cell::new(&s.id),
            Cell::new(&s.date),
            Cell::new(&s.time),
            Cell::new(&s.venue),
            Cell::new(s.session_type),
            Cell::new(s.submissions.len()),
            Cell::new(s.evaluators.len()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn show(data: Option<&Path>, config: Option<&Path>, id: &str) -> Result<()> {
    use comfy_table::{Cell, Table};

    let seminar = Seminar::open(data, config)?;
    let Some(session) = seminar.repo.find_session(id) else {
        anyhow::bail!("no session with id {id}");
    };

    println!("Session ID: {}", session.id);
    println!("Date: {} {}", session.date, session.time);
    println!("Venue: {}", session.venue);
    println!("Type: {}", session.session_type);

    let mut presentations = Table::new();
    presentations.set_header(vec!["#", "Submission", "Title", "Student", "Board", "Average"]);
    for (i, sub_id) in session.submissions.iter().enumerate() {
        let Some(sub) = seminar.repo.find_submission(sub_id) else {
            continue;
        };
        let student = seminar
            .repo
            .find_user(&sub.student_id)
            .map(|u| u.name)
            .unwrap_or_else(|| sub.student_id.clone());
        presentations.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&sub.id),
            Cell::new(&sub.title),
            Cell::new(student),
            Cell::new(if sub.board_id.is_empty() { "-" } else { sub.board_id.as_str() }),
            Cell::new(format!(
                "{:.2}",
                seminar.repo.average_score(&sub.id).unwrap_or(0.0)
            )),
        ]);
    }
    println!("\nPresentations:\n{presentations}");

    let mut evaluators = Table::new();
    evaluators.set_header(vec!["#", "ID", "Name", "Expertise"]);
    for (i, eval_id) in session.evaluators.iter().enumerate() {
        let user = seminar.repo.find_evaluator(eval_id);
        let expertise = user
            .as_ref()
            .and_then(|u| u.as_evaluator())
            .map(|p| p.expertise.clone())
            .unwrap_or_default();
        evaluators.add_row(vec![
            Cell::new(i + 1),
            Cell::new(eval_id),
            Cell::new(user.map(|u| u.name).unwrap_or_default()),
            Cell::new(expertise),
        ]);
    }
    println!("\nEvaluators:\n{evaluators}");
    Ok(())
}
