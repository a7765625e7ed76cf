//! The entity arena.
//!
//! [`SeminarGraph`] holds every collection and is the unit that gets
//! snapshotted. Relations are stored as id lists on both sides; the insert and
//! remove methods here keep both sides in step. Business rules that sit on top
//! of these links live in [`crate::assignment`] and [`crate::evaluation`].

use serde::{Deserialize, Serialize};

use crate::error::{ConstraintViolation, EntityKind, Result, SeminarError};
use crate::model::{Award, Evaluation, Profile, Role, Session, Submission, User};

/// All seminar entities, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeminarGraph {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
    #[serde(default)]
    pub awards: Vec<Award>,
}

impl SeminarGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.submissions.is_empty()
            && self.sessions.is_empty()
            && self.evaluations.is_empty()
            && self.awards.is_empty()
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Case-insensitive existence check used for id uniqueness.
    pub fn user_id_taken(&self, id: &str) -> bool {
        self.users.iter().any(|u| u.id.eq_ignore_ascii_case(id))
    }

    pub fn user_with_role(&self, id: &str, role: Role) -> Option<&User> {
        self.user(id).filter(|u| u.role() == role)
    }

    pub fn users_with_role(&self, role: Role) -> impl Iterator<Item = &User> {
        self.users.iter().filter(move |u| u.role() == role)
    }

    pub fn submission(&self, id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn evaluation(&self, id: &str) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.id == id)
    }

    pub fn award(&self, id: &str) -> Option<&Award> {
        self.awards.iter().find(|a| a.id == id)
    }

    /// Evaluations attached to a submission, in submission order.
    pub fn evaluations_of<'a>(
        &'a self,
        submission: &'a Submission,
    ) -> impl Iterator<Item = &'a Evaluation> + 'a {
        submission
            .evaluations
            .iter()
            .filter_map(move |id| self.evaluation(id))
    }

    pub(crate) fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub(crate) fn submission_mut(&mut self, id: &str) -> Option<&mut Submission> {
        self.submissions.iter_mut().find(|s| s.id == id)
    }

    pub(crate) fn session_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Resolve a user id that must belong to `role`.
    pub(crate) fn require_role(&self, id: &str, role: Role) -> Result<&User> {
        let user = self
            .user(id)
            .ok_or_else(|| SeminarError::not_found(EntityKind::User, id))?;
        if user.role() != role {
            return Err(ConstraintViolation::RoleMismatch {
                user_id: id.to_string(),
                expected: role,
                actual: user.role(),
            }
            .into());
        }
        Ok(user)
    }

    pub(crate) fn require_submission(&self, id: &str) -> Result<&Submission> {
        self.submission(id)
            .ok_or_else(|| SeminarError::not_found(EntityKind::Submission, id))
    }

    pub(crate) fn require_session(&self, id: &str) -> Result<&Session> {
        self.session(id)
            .ok_or_else(|| SeminarError::not_found(EntityKind::Session, id))
    }

    // -----------------------------------------------------------------------
    // Identifiers
    // -----------------------------------------------------------------------

    /// Next sequential user id for `prefix`, e.g. `S007`.
    ///
    /// Only ids whose remainder after the prefix parses as a number count
    /// towards the maximum; anything else is ignored. The prefix is matched
    /// without regard to ASCII case, since id uniqueness is case-insensitive.
    pub fn next_id(&self, prefix: &str) -> String {
        let max = self
            .users
            .iter()
            .filter_map(|u| {
                u.id.get(..prefix.len())
                    .filter(|head| head.eq_ignore_ascii_case(prefix))
                    .and_then(|_| u.id.get(prefix.len()..))
            })
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("{prefix}{:03}", max.saturating_add(1))
    }

    // -----------------------------------------------------------------------
    // Inserts
    // -----------------------------------------------------------------------

    pub fn insert_user(&mut self, user: User) -> Result<()> {
        if self.user_id_taken(&user.id) {
            return Err(SeminarError::DuplicateId(user.id));
        }
        self.users.push(user);
        Ok(())
    }

    /// Insert a submission and link it to its owning student.
    ///
    /// Session placement and evaluations are established only through the
    /// assignment and evaluation rules, so a submission always enters the
    /// graph unassigned and unevaluated.
    pub fn insert_submission(&mut self, mut submission: Submission) -> Result<()> {
        if self.submission(&submission.id).is_some() {
            return Err(SeminarError::DuplicateId(submission.id));
        }
        self.require_role(&submission.student_id, Role::Student)?;

        submission.session_id = None;
        submission.evaluations.clear();

        if let Some(student) = self
            .user_mut(&submission.student_id)
            .and_then(User::student_mut)
        {
            student.submissions.push(submission.id.clone());
        }
        self.submissions.push(submission);
        Ok(())
    }

    /// Insert an empty session, optionally managed by a coordinator.
    pub fn insert_session(&mut self, mut session: Session, coordinator: Option<&str>) -> Result<()> {
        if self.session(&session.id).is_some() {
            return Err(SeminarError::DuplicateId(session.id));
        }
        if let Some(coordinator_id) = coordinator {
            self.require_role(coordinator_id, Role::Coordinator)?;
        }

        session.submissions.clear();
        session.evaluators.clear();

        if let Some(profile) = coordinator
            .and_then(|id| self.user_mut(id))
            .and_then(User::coordinator_mut)
        {
            profile.sessions.push(session.id.clone());
        }
        self.sessions.push(session);
        Ok(())
    }

    /// Insert an evaluation and link it to its submission and evaluator.
    ///
    /// Does not check for an existing evaluation of the same pair; see
    /// [`crate::evaluation::evaluate`].
    pub fn insert_evaluation(&mut self, evaluation: Evaluation) -> Result<()> {
        if self.evaluation(&evaluation.id).is_some() {
            return Err(SeminarError::DuplicateId(evaluation.id));
        }
        self.require_submission(&evaluation.submission_id)?;
        self.require_role(&evaluation.evaluator_id, Role::Evaluator)?;

        if let Some(submission) = self.submission_mut(&evaluation.submission_id) {
            submission.evaluations.push(evaluation.id.clone());
        }
        if let Some(profile) = self
            .user_mut(&evaluation.evaluator_id)
            .and_then(User::evaluator_mut)
        {
            profile.evaluations.push(evaluation.id.clone());
        }
        self.evaluations.push(evaluation);
        Ok(())
    }

    pub fn insert_award(&mut self, award: Award) -> Result<()> {
        if self.award(&award.id).is_some() {
            return Err(SeminarError::DuplicateId(award.id));
        }
        if let Some(winner) = &award.winner {
            self.require_submission(winner)?;
        }
        self.awards.push(award);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Removals
    // -----------------------------------------------------------------------

    /// Remove an evaluation and detach it from both owning lists.
    pub fn remove_evaluation(&mut self, id: &str) -> Result<Evaluation> {
        let pos = self
            .evaluations
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| SeminarError::not_found(EntityKind::Evaluation, id))?;
        let evaluation = self.evaluations.remove(pos);

        if let Some(submission) = self.submission_mut(&evaluation.submission_id) {
            submission.evaluations.retain(|e| e != id);
        }
        if let Some(profile) = self
            .user_mut(&evaluation.evaluator_id)
            .and_then(User::evaluator_mut)
        {
            profile.evaluations.retain(|e| e != id);
        }
        Ok(evaluation)
    }

    /// Remove a submission together with all of its evaluations.
    ///
    /// Evaluation ids that no longer resolve are dropped with the submission.
    pub fn remove_submission(&mut self, id: &str) -> Result<Submission> {
        let evaluation_ids = self.require_submission(id)?.evaluations.clone();
        for evaluation_id in &evaluation_ids {
            if self.evaluation(evaluation_id).is_some() {
                self.remove_evaluation(evaluation_id)?;
            }
        }

        let pos = self
            .submissions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SeminarError::not_found(EntityKind::Submission, id))?;
        let submission = self.submissions.remove(pos);

        if let Some(session_id) = &submission.session_id {
            if let Some(session) = self.session_mut(session_id) {
                session.submissions.retain(|s| s != id);
            }
        }
        if let Some(student) = self
            .user_mut(&submission.student_id)
            .and_then(User::student_mut)
        {
            student.submissions.retain(|s| s != id);
        }
        for award in self.awards.iter_mut() {
            if award.winner.as_deref() == Some(id) {
                award.winner = None;
                award.winning_score = 0.0;
            }
        }
        Ok(submission)
    }

    /// Remove a session, releasing its submissions and evaluators.
    pub fn remove_session(&mut self, id: &str) -> Result<Session> {
        let pos = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SeminarError::not_found(EntityKind::Session, id))?;
        let session = self.sessions.remove(pos);

        for submission_id in &session.submissions {
            if let Some(submission) = self.submission_mut(submission_id) {
                if submission.session_id.as_deref() == Some(id) {
                    submission.session_id = None;
                }
            }
        }
        for user in self.users.iter_mut() {
            match &mut user.profile {
                Profile::Evaluator(profile) => profile.sessions.retain(|s| s != id),
                Profile::Coordinator(profile) => profile.sessions.retain(|s| s != id),
                Profile::Student(_) => {}
            }
        }
        Ok(session)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{
        CoordinatorProfile, EvaluatorProfile, PresentationType, Rubric, StudentProfile,
    };

    pub(crate) fn student(id: &str) -> User {
        User {
            id: id.into(),
            name: format!("Student {id}"),
            email: format!("{}@uni.test", id.to_lowercase()),
            password: "pw".into(),
            profile: Profile::Student(StudentProfile {
                supervisor_name: "Dr. Default".into(),
                submissions: vec![],
            }),
        }
    }

    pub(crate) fn evaluator(id: &str) -> User {
        User {
            id: id.into(),
            name: format!("Evaluator {id}"),
            email: format!("{}@uni.test", id.to_lowercase()),
            password: "pw".into(),
            profile: Profile::Evaluator(EvaluatorProfile {
                expertise: "Systems".into(),
                ..Default::default()
            }),
        }
    }

    pub(crate) fn coordinator(id: &str) -> User {
        User {
            id: id.into(),
            name: format!("Coordinator {id}"),
            email: format!("{}@uni.test", id.to_lowercase()),
            password: "pw".into(),
            profile: Profile::Coordinator(CoordinatorProfile {
                department: "CS".into(),
                sessions: vec![],
            }),
        }
    }

    pub(crate) fn submission(id: &str, student_id: &str, kind: PresentationType) -> Submission {
        Submission {
            id: id.into(),
            title: format!("Paper {id}"),
            abstract_text: String::new(),
            supervisor_name: "Dr. Default".into(),
            presentation_type: kind,
            file_path: None,
            board_id: String::new(),
            student_id: student_id.into(),
            session_id: None,
            evaluations: vec![],
        }
    }

    pub(crate) fn session(id: &str, kind: PresentationType) -> Session {
        Session {
            id: id.into(),
            date: "2025-03-14".into(),
            time: "10:00".into(),
            venue: "Main Hall".into(),
            session_type: kind,
            submissions: vec![],
            evaluators: vec![],
        }
    }

    pub(crate) fn evaluation(id: &str, submission_id: &str, evaluator_id: &str, total: u8) -> Evaluation {
        // Spread the total over the rubric, 10 per criterion at most.
        let mut left = total;
        let mut take = || {
            let v = left.min(10);
            left -= v;
            v
        };
        let rubric = Rubric::new(take(), take(), take(), take());
        Evaluation {
            id: id.into(),
            rubric,
            comments: String::new(),
            submission_id: submission_id.into(),
            evaluator_id: evaluator_id.into(),
        }
    }

    #[test]
    fn next_id_skips_malformed_suffixes() {
        let mut graph = SeminarGraph::new();
        assert_eq!(graph.next_id("S"), "S001");
        graph.insert_user(student("S001")).unwrap();
        graph.insert_user(student("S007")).unwrap();
        graph.insert_user(student("Sabc")).unwrap();
        graph.insert_user(student("S0x9")).unwrap();
        graph.insert_user(evaluator("E042")).unwrap();
        assert_eq!(graph.next_id("S"), "S008");
        assert_eq!(graph.next_id("E"), "E043");
        assert_eq!(graph.next_id("C"), "C001");
    }

    #[test]
    fn next_id_grows_past_three_digits() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(student("S999")).unwrap();
        assert_eq!(graph.next_id("S"), "S1000");
    }

    #[test]
    fn next_id_counts_lowercase_ids() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(student("s005")).unwrap();
        assert_eq!(graph.next_id("S"), "S006");
    }

    #[test]
    fn user_ids_are_unique_ignoring_case() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(student("S001")).unwrap();
        let err = graph.insert_user(evaluator("s001")).unwrap_err();
        assert!(matches!(err, SeminarError::DuplicateId(id) if id == "s001"));
        assert_eq!(graph.users.len(), 1);
    }

    #[test]
    fn submission_links_to_student() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(student("S001")).unwrap();
        graph
            .insert_submission(submission("SUB-1", "S001", PresentationType::Oral))
            .unwrap();
        let owner = graph.user("S001").unwrap().as_student().unwrap();
        assert_eq!(owner.submissions, vec!["SUB-1".to_string()]);
    }

    #[test]
    fn submission_requires_a_student_owner() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(evaluator("E001")).unwrap();
        let err = graph
            .insert_submission(submission("SUB-1", "E001", PresentationType::Oral))
            .unwrap_err();
        assert!(matches!(
            err.constraint(),
            Some(ConstraintViolation::RoleMismatch { .. })
        ));
        let err = graph
            .insert_submission(submission("SUB-2", "S404", PresentationType::Oral))
            .unwrap_err();
        assert!(matches!(err, SeminarError::NotFound { kind: EntityKind::User, .. }));
        assert!(graph.submissions.is_empty());
    }

    #[test]
    fn removing_submission_cascades_evaluations() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(student("S001")).unwrap();
        graph.insert_user(evaluator("E001")).unwrap();
        graph
            .insert_submission(submission("SUB-1", "S001", PresentationType::Oral))
            .unwrap();
        graph
            .insert_evaluation(evaluation("EVAL-1", "SUB-1", "E001", 30))
            .unwrap();

        graph.remove_submission("SUB-1").unwrap();

        assert!(graph.evaluations.is_empty());
        assert!(graph.user("E001").unwrap().as_evaluator().unwrap().evaluations.is_empty());
        assert!(graph.user("S001").unwrap().as_student().unwrap().submissions.is_empty());
    }

    #[test]
    fn removing_submission_tolerates_dangling_evaluation_ids() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(student("S001")).unwrap();
        graph.insert_user(evaluator("E001")).unwrap();
        graph
            .insert_submission(submission("SUB-1", "S001", PresentationType::Oral))
            .unwrap();
        graph
            .insert_evaluation(evaluation("EVAL-1", "SUB-1", "E001", 30))
            .unwrap();
        graph.submissions[0].evaluations.insert(0, "EVAL-gone".into());

        let removed = graph.remove_submission("SUB-1").unwrap();

        assert_eq!(removed.id, "SUB-1");
        assert!(graph.submissions.is_empty());
        assert!(graph.evaluations.is_empty());
        assert!(graph.user("E001").unwrap().as_evaluator().unwrap().evaluations.is_empty());
    }

    #[test]
    fn removing_submission_clears_award_winner() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(student("S001")).unwrap();
        graph
            .insert_submission(submission("SUB-1", "S001", PresentationType::Poster))
            .unwrap();
        graph
            .insert_award(Award {
                id: "AWD-1".into(),
                category: crate::model::AwardCategory::BestPoster,
                winner: Some("SUB-1".into()),
                winning_score: 33.0,
            })
            .unwrap();

        graph.remove_submission("SUB-1").unwrap();

        let award = graph.award("AWD-1").unwrap();
        assert!(award.winner.is_none());
        assert_eq!(award.winning_score, 0.0);
    }

    #[test]
    fn session_is_managed_by_coordinator() {
        let mut graph = SeminarGraph::new();
        graph.insert_user(coordinator("C001")).unwrap();
        graph
            .insert_session(session("SES-1", PresentationType::Oral), Some("C001"))
            .unwrap();
        let managed = &graph.user("C001").unwrap().as_coordinator().unwrap().sessions;
        assert_eq!(managed, &vec!["SES-1".to_string()]);

        graph.remove_session("SES-1").unwrap();
        assert!(graph.user("C001").unwrap().as_coordinator().unwrap().sessions.is_empty());
    }

    #[test]
    fn missing_entities_are_not_found() {
        let mut graph = SeminarGraph::new();
        assert!(graph.remove_evaluation("EVAL-0").is_err());
        assert!(graph.remove_session("SES-0").is_err());
        assert!(graph.remove_submission("SUB-0").is_err());
        assert!(graph.session("SES-0").is_none());
    }
}
