//! Seminar-wide counts and per-session summaries.

use serde::{Deserialize, Serialize};

use crate::evaluation::average_score;
use crate::graph::SeminarGraph;
use crate::model::{PresentationType, Role};

/// Aggregate counts over the whole seminar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeminarStatistics {
    /// Number of sessions.
    pub total_sessions: usize,
    /// Submissions placed in some session.
    pub submissions_in_sessions: usize,
    /// Evaluator seats summed over sessions.
    pub evaluator_assignments: usize,
    /// Evaluations of submissions that sit in a session.
    pub evaluations_in_sessions: usize,
    pub students: usize,
    pub evaluators: usize,
    pub coordinators: usize,
    /// All submissions, placed or not.
    pub total_submissions: usize,
    pub unassigned_submissions: usize,
    /// All evaluations, including those of unplaced submissions.
    pub total_evaluations: usize,
    /// Per-session breakdown, in session order.
    pub sessions: Vec<SessionSummary>,
}

/// Counts for a single session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub date: String,
    pub venue: String,
    pub session_type: PresentationType,
    pub submissions: usize,
    pub evaluators: usize,
    pub evaluations: usize,
    /// Mean of the average scores of evaluated submissions; `None` when
    /// nothing in the session has been evaluated.
    pub mean_score: Option<f64>,
}

/// Compute statistics from a graph.
pub fn compute(graph: &SeminarGraph) -> SeminarStatistics {
    let sessions: Vec<SessionSummary> = graph
        .sessions
        .iter()
        .map(|session| {
            let placed: Vec<_> = session
                .submissions
                .iter()
                .filter_map(|id| graph.submission(id))
                .collect();
            let evaluations = placed.iter().map(|s| s.evaluations.len()).sum();
            let averages: Vec<f64> = placed
                .iter()
                .filter(|s| !s.evaluations.is_empty())
                .map(|s| average_score(graph, s))
                .collect();
            let mean_score = if averages.is_empty() {
                None
            } else {
                Some(averages.iter().sum::<f64>() / averages.len() as f64)
            };
            SessionSummary {
                session_id: session.id.clone(),
                date: session.date.clone(),
                venue: session.venue.clone(),
                session_type: session.session_type,
                submissions: placed.len(),
                evaluators: session.evaluators.len(),
                evaluations,
                mean_score,
            }
        })
        .collect();

    let total_submissions = graph.submissions.len();
    let unassigned_submissions = graph
        .submissions
        .iter()
        .filter(|s| s.session_id.is_none())
        .count();

    SeminarStatistics {
        total_sessions: sessions.len(),
        submissions_in_sessions: sessions.iter().map(|s| s.submissions).sum(),
        evaluator_assignments: sessions.iter().map(|s| s.evaluators).sum(),
        evaluations_in_sessions: sessions.iter().map(|s| s.evaluations).sum(),
        students: graph.users_with_role(Role::Student).count(),
        evaluators: graph.users_with_role(Role::Evaluator).count(),
        coordinators: graph.users_with_role(Role::Coordinator).count(),
        total_submissions,
        unassigned_submissions,
        total_evaluations: graph.evaluations.len(),
        sessions,
    }
}
