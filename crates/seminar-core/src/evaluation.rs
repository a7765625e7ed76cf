//! Evaluation rules and score aggregation.

use crate::error::{ConstraintViolation, Result};
use crate::graph::SeminarGraph;
use crate::model::{opaque_id, Evaluation, Role, Rubric, Submission, User};

/// Record `evaluator_id`'s scores for `submission_id`.
///
/// Each (evaluator, submission) pair may be evaluated once; a second attempt
/// fails with [`ConstraintViolation::AlreadyEvaluated`]. Rubric values are
/// taken as given; range checking belongs to whoever collected them.
///
/// Returns the new evaluation id.
pub fn evaluate(
    graph: &mut SeminarGraph,
    evaluator_id: &str,
    submission_id: &str,
    rubric: Rubric,
    comments: &str,
) -> Result<String> {
    graph.require_role(evaluator_id, Role::Evaluator)?;
    let submission = graph.require_submission(submission_id)?;

    if graph
        .evaluations_of(submission)
        .any(|e| e.evaluator_id == evaluator_id)
    {
        return Err(ConstraintViolation::AlreadyEvaluated {
            evaluator_id: evaluator_id.to_string(),
            submission_id: submission_id.to_string(),
        }
        .into());
    }

    let id = opaque_id("EVAL");
    graph.insert_evaluation(Evaluation {
        id: id.clone(),
        rubric,
        comments: comments.to_string(),
        submission_id: submission_id.to_string(),
        evaluator_id: evaluator_id.to_string(),
    })?;
    Ok(id)
}

/// Find the evaluation a given evaluator wrote for a submission.
pub fn evaluation_by<'a>(
    graph: &'a SeminarGraph,
    evaluator_id: &str,
    submission_id: &str,
) -> Option<&'a Evaluation> {
    let submission = graph.submission(submission_id)?;
    graph
        .evaluations_of(submission)
        .find(|e| e.evaluator_id == evaluator_id)
}

/// Evaluations written by an evaluator, in the order they were recorded.
pub fn evaluations_by<'a>(graph: &'a SeminarGraph, evaluator_id: &str) -> Vec<&'a Evaluation> {
    graph
        .user(evaluator_id)
        .and_then(User::as_evaluator)
        .map(|profile| {
            profile
                .evaluations
                .iter()
                .filter_map(|id| graph.evaluation(id))
                .collect()
        })
        .unwrap_or_default()
}

/// Mean total score over a submission's evaluations; 0.0 when there are none.
pub fn average_score(graph: &SeminarGraph, submission: &Submission) -> f64 {
    let (sum, count) = graph
        .evaluations_of(submission)
        .fold((0u64, 0u64), |(sum, count), e| {
            (sum + u64::from(e.total_score()), count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Sum of total scores over a submission's evaluations.
pub fn total_marks(graph: &SeminarGraph, submission: &Submission) -> u64 {
    graph
        .evaluations_of(submission)
        .map(|e| u64::from(e.total_score()))
        .sum()
}

/// Render an evaluation's details with comments wrapped at `width` characters.
pub fn details(graph: &SeminarGraph, evaluation: &Evaluation, width: usize) -> String {
    let evaluator = graph
        .user(&evaluation.evaluator_id)
        .map(|u| u.name.as_str())
        .unwrap_or("Unknown Evaluator");
    let title = graph
        .submission(&evaluation.submission_id)
        .map(|s| s.title.as_str())
        .unwrap_or("Unknown Submission");
    let r = &evaluation.rubric;
    format!(
        "Evaluation by: {evaluator}\n\
         Submission: {title}\n\
         Problem Clarity: {}/10\n\
         Methodology: {}/10\n\
         Results: {}/10\n\
         Presentation: {}/10\n\
         Total: {}/40 ({:.2}%)\n\
         Comments:\n{}",
        r.problem_clarity,
        r.methodology,
        r.results,
        r.presentation,
        evaluation.total_score(),
        evaluation.percentage(),
        wrap_text(&evaluation.comments, width),
    )
}

/// Hard-wrap text every `width` characters, restarting the count at newlines.
///
/// Long runs without spaces are broken too.
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + text.len() / width);
    let mut count = 0;
    for ch in text.chars() {
        out.push(ch);
        if ch == '\n' {
            count = 0;
            continue;
        }
        count += 1;
        if count >= width {
            out.push('\n');
            count = 0;
        }
    }
    out
}
