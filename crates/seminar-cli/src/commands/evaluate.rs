//! The `seminar evaluate`, `seminar evaluations` and `seminar retract` commands.

use std::path::Path;

use anyhow::Result;

use seminar_core::evaluation::{details, evaluation_by, evaluations_by};
use seminar_core::model::Rubric;

use super::{print_json, Seminar};

const DETAIL_WIDTH: usize = 80;

/// Record an evaluation. Prints the new id, then the evaluation details.
pub fn execute(
    data: Option<&Path>,
    config: Option<&Path>,
    evaluator: &str,
    submission: &str,
    scores: [u8; 4],
    comments: &str,
) -> Result<()> {
    let [clarity, methodology, results, presentation] = scores;
    let rubric = Rubric::new(clarity, methodology, results, presentation);

    let seminar = Seminar::open(data, config)?;
    let id = seminar.repo.evaluate(evaluator, submission, rubric, comments)?;
    println!("{id}");

    let text = seminar.repo.with_graph(|graph| {
        evaluation_by(graph, evaluator, submission)
            .map(|evaluation| details(graph, evaluation, DETAIL_WIDTH))
    });
    if let Some(text) = text {
        println!("\n{text}");
    }
    Ok(())
}

/// List an evaluator's evaluations as a table, in full, or as JSON.
pub fn list(
    data: Option<&Path>,
    config: Option<&Path>,
    evaluator: &str,
    full: bool,
    json: bool,
) -> Result<()> {
    use comfy_table::{Cell, Table};

    let seminar = Seminar::open(data, config)?;
    if seminar.repo.find_evaluator(evaluator).is_none() {
        anyhow::bail!("no evaluator with id {evaluator}");
    }

    if json {
        return print_json(&seminar.repo.evaluations_by(evaluator));
    }

    seminar.repo.with_graph(|graph| {
        let evaluations = evaluations_by(graph, evaluator);
        if evaluations.is_empty() {
            println!("No evaluations.");
            return;
        }

        if full {
            let blocks: Vec<String> = evaluations
                .iter()
                .map(|evaluation| {
                    format!("{}\n{}", evaluation.id, details(graph, evaluation, DETAIL_WIDTH))
                })
                .collect();
            println!("{}", blocks.join("\n\n"));
            return;
        }

        let mut table = Table::new();
        table.set_header(vec!["ID", "Submission", "Title", "Total", "Percentage"]);
        for evaluation in &evaluations {
            let title = graph
                .submission(&evaluation.submission_id)
                .map(|s| s.title.as_str())
                .unwrap_or("-");
            table.add_row(vec![
                Cell::new(&evaluation.id),
                Cell::new(&evaluation.submission_id),
                Cell::new(title),
                Cell::new(format!("{}/40", evaluation.total_score())),
                Cell::new(format!("{:.2}%", evaluation.percentage())),
            ]);
        }
        println!("{table}");
    });
    Ok(())
}

pub fn retract(data: Option<&Path>, config: Option<&Path>, evaluation: &str) -> Result<()> {
    let seminar = Seminar::open(data, config)?;
    let removed = seminar.repo.remove_evaluation(evaluation)?;
    println!(
        "Retracted {} by {} on {}",
        removed.id, removed.evaluator_id, removed.submission_id
    );
    Ok(())
}
