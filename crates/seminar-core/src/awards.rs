//! Award ranking and winner selection.
//!
//! Best Oral and Best Poster rank by average total score. People's Choice
//! ranks by the *sum* of total scores, which favours submissions that
//! collected more evaluations. The asymmetry is deliberate and kept as is.

use serde::{Deserialize, Serialize};

use crate::evaluation::{average_score, total_marks};
use crate::graph::SeminarGraph;
use crate::model::{opaque_id, Award, AwardCategory, Submission};

/// One entry in a category ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSubmission {
    pub submission_id: String,
    pub title: String,
    pub student_id: String,
    pub metric: f64,
    pub evaluation_count: usize,
}

/// The value a submission is ranked by in `category`.
pub fn metric(graph: &SeminarGraph, category: AwardCategory, submission: &Submission) -> f64 {
    match category {
        AwardCategory::BestOral | AwardCategory::BestPoster => average_score(graph, submission),
        AwardCategory::PeoplesChoice => total_marks(graph, submission) as f64,
    }
}

fn is_eligible(category: AwardCategory, submission: &Submission) -> bool {
    if submission.evaluations.is_empty() {
        return false;
    }
    match category.eligible_type() {
        Some(kind) => submission.presentation_type == kind,
        None => true,
    }
}

/// Rank the eligible submissions of `pool` for `category`, best first.
///
/// Submissions without evaluations are left out. Equal metrics keep their
/// order from `pool`.
pub fn rank<'a, I>(graph: &SeminarGraph, category: AwardCategory, pool: I) -> Vec<RankedSubmission>
where
    I: IntoIterator<Item = &'a Submission>,
{
    let mut ranking: Vec<RankedSubmission> = pool
        .into_iter()
        .filter(|s| is_eligible(category, s))
        .map(|s| RankedSubmission {
            submission_id: s.id.clone(),
            title: s.title.clone(),
            student_id: s.student_id.clone(),
            metric: metric(graph, category, s),
            evaluation_count: s.evaluations.len(),
        })
        .collect();
    // sort_by is stable, so ties stay in input order.
    ranking.sort_by(|a, b| b.metric.total_cmp(&a.metric));
    ranking
}

/// Pick the winner of one category from `pool`.
///
/// The first submission in `pool` order with the highest metric wins; a later
/// submission must score strictly higher to take over. With no eligible
/// submission the award has no winner and a score of 0.0.
pub fn determine_winner<'a, I>(graph: &SeminarGraph, category: AwardCategory, pool: I) -> Award
where
    I: IntoIterator<Item = &'a Submission>,
{
    let mut best: Option<(&Submission, f64)> = None;
    for submission in pool.into_iter().filter(|s| is_eligible(category, s)) {
        let score = metric(graph, category, submission);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((submission, score)),
        }
    }

    Award {
        id: opaque_id("AWD"),
        category,
        winner: best.map(|(s, _)| s.id.clone()),
        winning_score: best.map(|(_, score)| score).unwrap_or(0.0),
    }
}

/// Compute one award per category over `pool`.
pub fn compute_awards(
    graph: &SeminarGraph,
    categories: &[AwardCategory],
    pool: &[&Submission],
) -> Vec<Award> {
    categories
        .iter()
        .map(|&category| determine_winner(graph, category, pool.iter().copied()))
        .collect()
}
