//! Plain-text report bodies.
//!
//! Each function renders one report kind from the entity graph. The layout
//! is line oriented and meant to be read in a terminal or exported as-is.

use chrono::{DateTime, Utc};

use seminar_core::evaluation::{average_score, total_marks};
use seminar_core::graph::SeminarGraph;
use seminar_core::model::{Award, AwardCategory, PresentationType, Session};
use seminar_core::statistics::SeminarStatistics;

const RULE: &str = "-----------------------------------";

pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn header(out: &mut String, title: &str, at: DateTime<Utc>) {
    out.push_str(&format!("=== {title} ===\n"));
    out.push_str(&format!("Generated: {}\n\n", timestamp(at)));
}

fn student_name<'a>(graph: &'a SeminarGraph, student_id: &str) -> &'a str {
    graph
        .user(student_id)
        .map(|u| u.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("Unknown Student")
}

fn session_schedule(graph: &SeminarGraph, session: &Session, out: &mut String) {
    out.push_str(&format!("Session ID: {}\n", session.id));
    out.push_str(&format!("Date: {}\n", session.date));
    if !session.time.is_empty() {
        out.push_str(&format!("Time: {}\n", session.time));
    }
    out.push_str(&format!("Venue: {}\n", session.venue));
    out.push_str(&format!("Type: {}\n", session.session_type));
    out.push_str(&format!(
        "Number of Presentations: {}\n",
        session.submissions.len()
    ));
    out.push_str(&format!(
        "Number of Evaluators: {}\n",
        session.evaluators.len()
    ));

    out.push_str("\nPresentations:\n");
    for (i, id) in session.submissions.iter().enumerate() {
        match graph.submission(id) {
            Some(sub) => {
                out.push_str(&format!(
                    "  {}. {} - {} ({})",
                    i + 1,
                    sub.title,
                    student_name(graph, &sub.student_id),
                    sub.presentation_type
                ));
                if sub.presentation_type == PresentationType::Poster && !sub.board_id.is_empty() {
                    out.push_str(&format!(" [Board: {}]", sub.board_id));
                }
                out.push('\n');
            }
            None => out.push_str(&format!("  {}. Unknown Title\n", i + 1)),
        }
    }

    out.push_str("\nEvaluators:\n");
    for (i, id) in session.evaluators.iter().enumerate() {
        let user = graph.user(id);
        let name = user.map(|u| u.name.as_str()).unwrap_or("Unknown Evaluator");
        let expertise = user
            .and_then(|u| u.as_evaluator())
            .map(|p| p.expertise.as_str())
            .unwrap_or("Unknown");
        out.push_str(&format!("  {}. {} ({})\n", i + 1, name, expertise));
    }
}

/// Every session with its presentations and evaluators.
pub fn schedule_report(graph: &SeminarGraph, at: DateTime<Utc>) -> String {
    let mut out = String::new();
    header(&mut out, "SEMINAR SCHEDULE REPORT", at);

    if graph.sessions.is_empty() {
        out.push_str("No sessions available.\n");
        return out;
    }

    for session in &graph.sessions {
        session_schedule(graph, session, &mut out);
        out.push('\n');
        out.push_str(RULE);
        out.push_str("\n\n");
    }
    out
}

/// Scores per session and submission.
pub fn evaluation_report(graph: &SeminarGraph, at: DateTime<Utc>) -> String {
    let mut out = String::new();
    header(&mut out, "EVALUATION REPORT", at);

    if graph.sessions.is_empty() {
        out.push_str("No sessions available.\n");
        return out;
    }

    for session in &graph.sessions {
        out.push_str(&format!("Session: {} - {}\n", session.id, session.date));
        out.push_str(&format!("Venue: {}\n\n", session.venue));

        let submissions: Vec<_> = session
            .submissions
            .iter()
            .filter_map(|id| graph.submission(id))
            .collect();
        if submissions.is_empty() {
            out.push_str("  No submissions assigned.\n");
            out.push_str(RULE);
            out.push_str("\n\n");
            continue;
        }

        for sub in submissions {
            out.push_str(&format!("  Title: {}\n", sub.title));
            out.push_str(&format!("  Student: {}\n", student_name(graph, &sub.student_id)));
            out.push_str(&format!("  Type: {}\n", sub.presentation_type));
            out.push_str(&format!(
                "  Average Score: {:.2}\n",
                average_score(graph, sub)
            ));
            out.push_str(&format!(
                "  Number of Evaluations: {}\n",
                sub.evaluations.len()
            ));
            let evaluations: Vec<_> = graph.evaluations_of(sub).collect();
            if !evaluations.is_empty() {
                out.push_str("  Evaluations:\n");
                for evaluation in evaluations {
                    let evaluator = graph
                        .user(&evaluation.evaluator_id)
                        .map(|u| u.name.as_str())
                        .unwrap_or("Unknown Evaluator");
                    out.push_str(&format!(
                        "    - {}: {}/40\n",
                        evaluator,
                        evaluation.total_score()
                    ));
                }
            }
            out.push('\n');
        }
        out.push_str(RULE);
        out.push_str("\n\n");
    }
    out
}

/// One award's block, without trailing newline.
pub fn award_details(graph: &SeminarGraph, award: &Award) -> String {
    let winner = award.winner.as_deref().and_then(|id| graph.submission(id));
    match winner {
        None => format!("Award: {}\nWinner: Not yet determined", award.category),
        Some(sub) => format!(
            "Award: {}\n\
             Winner Submission ID: {}\n\
             Submission: {}\n\
             Student: {}\n\
             {}: {:.2}",
            award.category,
            sub.id,
            sub.title,
            student_name(graph, &sub.student_id),
            award.category.metric_label(),
            award.winning_score
        ),
    }
}

/// Award results, in the order given.
pub fn award_report(graph: &SeminarGraph, awards: &[Award], at: DateTime<Utc>) -> String {
    let mut out = String::new();
    header(&mut out, "AWARD CEREMONY REPORT", at);

    if awards.is_empty() {
        out.push_str("No awards available.\n");
        return out;
    }

    for award in awards {
        out.push_str(&award_details(graph, award));
        out.push('\n');
        out.push_str(RULE);
        out.push_str("\n\n");
    }
    out
}

/// Seminar-wide totals followed by a per-session breakdown.
pub fn statistics_report(stats: &SeminarStatistics, at: DateTime<Utc>) -> String {
    let mut out = String::new();
    header(&mut out, "SEMINAR STATISTICS", at);
    out.push_str(&format!("Total Sessions: {}\n", stats.total_sessions));
    out.push_str(&format!("Total Submissions: {}\n", stats.submissions_in_sessions));
    out.push_str(&format!("Total Evaluators: {}\n", stats.evaluator_assignments));
    out.push_str(&format!("Total Evaluations: {}\n", stats.evaluations_in_sessions));

    out.push_str(&format!(
        "\nRegistered: {} students, {} evaluators, {} coordinators\n",
        stats.students, stats.evaluators, stats.coordinators
    ));
    out.push_str(&format!(
        "Submissions: {} total, {} unassigned\n",
        stats.total_submissions, stats.unassigned_submissions
    ));

    if !stats.sessions.is_empty() {
        out.push_str("\nPer Session:\n");
        for s in &stats.sessions {
            let mean = s
                .mean_score
                .map(|m| format!("{m:.2}"))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "  {} ({}, {}) - {} presentations, {} evaluators, {} evaluations, mean {}\n",
                s.session_id,
                s.session_type,
                s.venue,
                s.submissions,
                s.evaluators,
                s.evaluations,
                mean
            ));
        }
    }
    out
}

/// A category ranking as numbered lines.
pub fn ranking_lines(
    graph: &SeminarGraph,
    category: AwardCategory,
    ranking: &[seminar_core::awards::RankedSubmission],
) -> String {
    if ranking.is_empty() {
        return format!("{category}: no eligible submissions\n");
    }
    let mut out = format!("{category} ({}):\n", category.metric_label());
    for (i, entry) in ranking.iter().enumerate() {
        let marks = graph
            .submission(&entry.submission_id)
            .map(|s| total_marks(graph, s))
            .unwrap_or(0);
        out.push_str(&format!(
            "  {}. {} - {} {:.2} ({} evaluations, {} marks)\n",
            i + 1,
            entry.title,
            student_name(graph, &entry.student_id),
            entry.metric,
            entry.evaluation_count,
            marks
        ));
    }
    out
}
