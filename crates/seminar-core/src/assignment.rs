//! Session assignment rules.
//!
//! Placing submissions and evaluators into sessions. Every check runs before
//! any link is written, so a rejected assignment leaves both sides untouched.

use crate::error::{ConstraintViolation, Result};
use crate::graph::SeminarGraph;
use crate::model::{PresentationType, Role, User};

/// Poster board label for the `position`-th submission in a session at `venue`.
///
/// Whitespace is stripped and the venue upper-cased; a blank venue becomes
/// `VENUE`.
pub fn board_id(venue: &str, position: usize) -> String {
    let compact: String = venue
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    let label = if compact.is_empty() { "VENUE" } else { &compact };
    format!("{label}-{position}")
}

/// Place a submission into a session.
///
/// Re-assigning a submission to the session it already sits in is a no-op.
pub fn assign_submission(graph: &mut SeminarGraph, session_id: &str, submission_id: &str) -> Result<()> {
    let session = graph.require_session(session_id)?;
    let submission = graph.require_submission(submission_id)?;

    if session.session_type != submission.presentation_type {
        return Err(ConstraintViolation::TypeMismatch {
            session_id: session.id.clone(),
            session_type: session.session_type,
            submission_id: submission.id.clone(),
            presentation_type: submission.presentation_type,
        }
        .into());
    }

    match submission.session_id.as_deref() {
        Some(current) if current == session_id => return Ok(()),
        Some(current) => {
            return Err(ConstraintViolation::AlreadyAssigned {
                submission_id: submission.id.clone(),
                session_id: current.to_string(),
            }
            .into())
        }
        None => {}
    }

    let same_student = session
        .submissions
        .iter()
        .filter(|id| id.as_str() != submission_id)
        .filter_map(|id| graph.submission(id))
        .any(|other| other.student_id == submission.student_id);
    if same_student {
        return Err(ConstraintViolation::DuplicateStudent {
            session_id: session.id.clone(),
            student_id: submission.student_id.clone(),
        }
        .into());
    }

    let venue = session.venue.clone();
    let is_poster = session.session_type == PresentationType::Poster;

    let position = match graph.session_mut(session_id) {
        Some(session) => {
            session.submissions.push(submission_id.to_string());
            session.submissions.len()
        }
        None => return Ok(()),
    };
    if let Some(submission) = graph.submission_mut(submission_id) {
        submission.session_id = Some(session_id.to_string());
        if is_poster && submission.board_id.trim().is_empty() {
            submission.board_id = board_id(&venue, position);
        }
    }
    Ok(())
}

/// Take a submission back out of a session. The board id is kept.
pub fn unassign_submission(graph: &mut SeminarGraph, session_id: &str, submission_id: &str) -> Result<()> {
    graph.require_session(session_id)?;
    let submission = graph.require_submission(submission_id)?;
    if submission.session_id.as_deref() != Some(session_id) {
        return Err(ConstraintViolation::NotAssigned {
            member_id: submission_id.to_string(),
            session_id: session_id.to_string(),
        }
        .into());
    }

    if let Some(session) = graph.session_mut(session_id) {
        session.submissions.retain(|id| id != submission_id);
    }
    if let Some(submission) = graph.submission_mut(submission_id) {
        submission.session_id = None;
    }
    Ok(())
}

/// Seat an evaluator on a session. Idempotent.
pub fn assign_evaluator(graph: &mut SeminarGraph, session_id: &str, evaluator_id: &str) -> Result<()> {
    graph.require_session(session_id)?;
    graph.require_role(evaluator_id, Role::Evaluator)?;

    if let Some(session) = graph.session_mut(session_id) {
        if !session.evaluators.iter().any(|id| id == evaluator_id) {
            session.evaluators.push(evaluator_id.to_string());
        }
    }
    if let Some(profile) = graph.user_mut(evaluator_id).and_then(User::evaluator_mut) {
        if !profile.sessions.iter().any(|id| id == session_id) {
            profile.sessions.push(session_id.to_string());
        }
    }
    Ok(())
}

/// Remove an evaluator from a session.
pub fn unassign_evaluator(graph: &mut SeminarGraph, session_id: &str, evaluator_id: &str) -> Result<()> {
    let session = graph.require_session(session_id)?;
    if !session.evaluators.iter().any(|id| id == evaluator_id) {
        return Err(ConstraintViolation::NotAssigned {
            member_id: evaluator_id.to_string(),
            session_id: session_id.to_string(),
        }
        .into());
    }

    if let Some(session) = graph.session_mut(session_id) {
        session.evaluators.retain(|id| id != evaluator_id);
    }
    if let Some(profile) = graph.user_mut(evaluator_id).and_then(User::evaluator_mut) {
        profile.sessions.retain(|id| id != session_id);
    }
    Ok(())
}

/// Every submission sitting in a session the evaluator is assigned to.
pub fn assigned_submission_ids(graph: &SeminarGraph, evaluator_id: &str) -> Vec<String> {
    let Some(profile) = graph.user(evaluator_id).and_then(User::as_evaluator) else {
        return Vec::new();
    };
    profile
        .sessions
        .iter()
        .filter_map(|id| graph.session(id))
        .flat_map(|session| session.submissions.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EntityKind, SeminarError};
    use crate::graph::tests::{evaluator, session, student, submission};
    use crate::model::PresentationType::{Oral, Poster};

    fn seeded() -> SeminarGraph {
        let mut graph = SeminarGraph::new();
        graph.insert_user(student("S001")).unwrap();
        graph.insert_user(student("S002")).unwrap();
        graph.insert_user(evaluator("E001")).unwrap();
        graph.insert_submission(submission("SUB-A", "S001", Oral)).unwrap();
        graph.insert_submission(submission("SUB-B", "S001", Oral)).unwrap();
        graph.insert_submission(submission("SUB-C", "S002", Oral)).unwrap();
        graph.insert_submission(submission("SUB-P", "S001", Poster)).unwrap();
        graph.insert_submission(submission("SUB-Q", "S002", Poster)).unwrap();
        graph.insert_session(session("SES-ORAL", Oral), None).unwrap();
        graph.insert_session(session("SES-POSTER", Poster), None).unwrap();
        graph
    }

    #[test]
    fn board_id_strips_whitespace() {
        assert_eq!(board_id("Main  Hall\tB", 2), "MAINHALLB-2");
        assert_eq!(board_id("   ", 1), "VENUE-1");
    }

    #[test]
    fn type_mismatch_is_rejected_without_mutation() {
        let mut graph = seeded();
        let before = graph.clone();
        let err = assign_submission(&mut graph, "SES-ORAL", "SUB-P").unwrap_err();
        assert!(matches!(
            err.constraint(),
            Some(ConstraintViolation::TypeMismatch { .. })
        ));
        assert_eq!(graph, before);
    }

    #[test]
    fn same_student_twice_in_session_is_rejected() {
        let mut graph = seeded();
        assign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();
        let err = assign_submission(&mut graph, "SES-ORAL", "SUB-B").unwrap_err();
        assert!(matches!(
            err.constraint(),
            Some(ConstraintViolation::DuplicateStudent { student_id, .. }) if student_id == "S001"
        ));
        assert_eq!(graph.session("SES-ORAL").unwrap().submissions.len(), 1);
        assert!(graph.submission("SUB-B").unwrap().session_id.is_none());

        assign_submission(&mut graph, "SES-ORAL", "SUB-C").unwrap();
        assert_eq!(graph.session("SES-ORAL").unwrap().submissions.len(), 2);
    }

    #[test]
    fn submission_must_leave_its_session_first() {
        let mut graph = seeded();
        graph.insert_session(session("SES-ORAL-2", Oral), None).unwrap();
        assign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();

        let err = assign_submission(&mut graph, "SES-ORAL-2", "SUB-A").unwrap_err();
        assert!(matches!(
            err.constraint(),
            Some(ConstraintViolation::AlreadyAssigned { session_id, .. }) if session_id == "SES-ORAL"
        ));

        // Same session again is harmless.
        assign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();
        assert_eq!(graph.session("SES-ORAL").unwrap().submissions.len(), 1);

        unassign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();
        assign_submission(&mut graph, "SES-ORAL-2", "SUB-A").unwrap();
        assert_eq!(
            graph.submission("SUB-A").unwrap().session_id.as_deref(),
            Some("SES-ORAL-2")
        );
    }

    #[test]
    fn poster_assignment_allocates_board_ids() {
        let mut graph = seeded();
        assign_submission(&mut graph, "SES-POSTER", "SUB-P").unwrap();
        assign_submission(&mut graph, "SES-POSTER", "SUB-Q").unwrap();
        assert_eq!(graph.submission("SUB-P").unwrap().board_id, "MAINHALL-1");
        assert_eq!(graph.submission("SUB-Q").unwrap().board_id, "MAINHALL-2");

        // Board ids survive unassignment and are not reissued.
        unassign_submission(&mut graph, "SES-POSTER", "SUB-P").unwrap();
        assert_eq!(graph.submission("SUB-P").unwrap().board_id, "MAINHALL-1");
        assign_submission(&mut graph, "SES-POSTER", "SUB-P").unwrap();
        assert_eq!(graph.submission("SUB-P").unwrap().board_id, "MAINHALL-1");
    }

    #[test]
    fn oral_assignment_leaves_board_empty() {
        let mut graph = seeded();
        assign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();
        assert!(graph.submission("SUB-A").unwrap().board_id.is_empty());
    }

    #[test]
    fn unassign_restores_previous_links() {
        let mut graph = seeded();
        let before = graph.clone();
        assign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();
        assign_evaluator(&mut graph, "SES-ORAL", "E001").unwrap();
        unassign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();
        unassign_evaluator(&mut graph, "SES-ORAL", "E001").unwrap();
        assert_eq!(graph, before);
    }

    #[test]
    fn unassign_requires_membership() {
        let mut graph = seeded();
        assert!(matches!(
            unassign_submission(&mut graph, "SES-ORAL", "SUB-A")
                .unwrap_err()
                .constraint(),
            Some(ConstraintViolation::NotAssigned { .. })
        ));
        assert!(unassign_evaluator(&mut graph, "SES-ORAL", "E001").is_err());
    }

    #[test]
    fn evaluator_assignment_is_idempotent() {
        let mut graph = seeded();
        assign_evaluator(&mut graph, "SES-ORAL", "E001").unwrap();
        assign_evaluator(&mut graph, "SES-ORAL", "E001").unwrap();
        assert_eq!(graph.session("SES-ORAL").unwrap().evaluators, vec!["E001".to_string()]);
        let profile = graph.user("E001").unwrap().as_evaluator().unwrap();
        assert_eq!(profile.sessions, vec!["SES-ORAL".to_string()]);
    }

    #[test]
    fn only_evaluators_can_be_seated() {
        let mut graph = seeded();
        let err = assign_evaluator(&mut graph, "SES-ORAL", "S001").unwrap_err();
        assert!(matches!(
            err.constraint(),
            Some(ConstraintViolation::RoleMismatch { expected: Role::Evaluator, .. })
        ));
        let err = assign_evaluator(&mut graph, "SES-NOPE", "E001").unwrap_err();
        assert!(matches!(err, SeminarError::NotFound { kind: EntityKind::Session, .. }));
    }

    #[test]
    fn session_removal_releases_members() {
        let mut graph = seeded();
        assign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();
        assign_submission(&mut graph, "SES-ORAL", "SUB-C").unwrap();
        assign_evaluator(&mut graph, "SES-ORAL", "E001").unwrap();

        graph.remove_session("SES-ORAL").unwrap();

        assert!(graph.session("SES-ORAL").is_none());
        assert!(graph.submission("SUB-A").unwrap().session_id.is_none());
        assert!(graph.submission("SUB-C").unwrap().session_id.is_none());
        assert!(graph.user("E001").unwrap().as_evaluator().unwrap().sessions.is_empty());
    }

    #[test]
    fn assigned_submissions_follow_sessions() {
        let mut graph = seeded();
        assign_submission(&mut graph, "SES-ORAL", "SUB-A").unwrap();
        assign_submission(&mut graph, "SES-POSTER", "SUB-Q").unwrap();
        assign_evaluator(&mut graph, "SES-ORAL", "E001").unwrap();
        assert_eq!(assigned_submission_ids(&graph, "E001"), vec!["SUB-A".to_string()]);
        assert!(assigned_submission_ids(&graph, "S001").is_empty());
    }
}
