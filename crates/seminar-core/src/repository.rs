//! The seminar repository.
//!
//! [`Repository`] is the single owner of the entity graph. Construct one at
//! startup and pass it by reference to whatever needs it.
//!
//! Every mutation takes the write lock for its whole check-then-write
//! sequence, including the snapshot save, so racing registrations or
//! evaluations cannot both pass a uniqueness check. Queries take the read
//! lock and hand back owned copies; a reader sees the graph either before or
//! after a mutation, never halfway.
//!
//! Persistence is write-through but best-effort: when a save fails the error
//! is logged and returned as [`SeminarError::Persistence`], and the in-memory
//! change stays applied.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::instrument;

use crate::assignment;
use crate::awards::{self, RankedSubmission};
use crate::error::{ConstraintViolation, Result, SeminarError};
use crate::evaluation;
use crate::graph::SeminarGraph;
use crate::model::{
    opaque_id, Award, AwardCategory, Evaluation, NewSession, NewSubmission, Registration, Role,
    Rubric, Session, Submission, User,
};
use crate::statistics::{self, SeminarStatistics};
use crate::store::{JsonFileStore, MemoryStore, SnapshotStore};

pub struct Repository {
    graph: RwLock<SeminarGraph>,
    store: Box<dyn SnapshotStore>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("store", &self.store.location())
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open a repository over `store`, loading whatever it holds.
    ///
    /// A missing snapshot starts an empty graph and writes it out; a corrupt
    /// or unreadable one is logged and replaced by an empty graph in memory.
    pub fn open(store: impl SnapshotStore + 'static) -> Self {
        let graph = load_or_empty(&store, true);
        Self {
            graph: RwLock::new(graph),
            store: Box::new(store),
        }
    }

    /// Open a repository backed by a JSON snapshot file.
    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::open(JsonFileStore::new(path))
    }

    /// A repository that never touches the disk.
    pub fn in_memory() -> Self {
        Self::open(MemoryStore::new())
    }

    fn read(&self) -> RwLockReadGuard<'_, SeminarGraph> {
        self.graph.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SeminarGraph> {
        self.graph.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, graph: &SeminarGraph) -> Result<()> {
        self.store.save(graph).map_err(|e| {
            tracing::error!(
                "failed to save snapshot to {}: {e}; in-memory state kept",
                self.store.location()
            );
            SeminarError::from(e)
        })
    }

    /// Run `op` under the write lock and save the result.
    ///
    /// `op` must validate before it writes; an `Err` from it means nothing
    /// changed, so no save is attempted.
    fn mutate<T>(&self, op: impl FnOnce(&mut SeminarGraph) -> Result<T>) -> Result<T> {
        let mut graph = self.write();
        let value = op(&mut graph)?;
        self.persist(&graph)?;
        Ok(value)
    }

    /// Run `f` against a consistent view of the graph.
    pub fn with_graph<R>(&self, f: impl FnOnce(&SeminarGraph) -> R) -> R {
        f(&self.read())
    }

    /// A full copy of the current graph.
    pub fn snapshot(&self) -> SeminarGraph {
        self.read().clone()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the current graph to the store.
    pub fn save(&self) -> Result<()> {
        let graph = self.write();
        self.persist(&graph)
    }

    /// Replace the in-memory graph with the stored one, or with an empty
    /// graph if the store is empty or unreadable.
    pub fn reload(&self) {
        let mut graph = self.write();
        *graph = load_or_empty(self.store.as_ref(), false);
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Insert a fully formed user. Fails on an id collision, ignoring case.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn add_user(&self, user: User) -> Result<()> {
        self.mutate(|graph| graph.insert_user(user))?;
        tracing::info!("user added");
        Ok(())
    }

    /// Next free sequential id for `prefix`.
    pub fn next_id(&self, prefix: &str) -> String {
        self.read().next_id(prefix)
    }

    /// Allocate an id for `role` and insert the user in one step.
    #[instrument(skip(self, registration), fields(role = %role))]
    pub fn register_user(&self, role: Role, registration: Registration) -> Result<String> {
        let id = self.mutate(|graph| {
            let id = graph.next_id(role.id_prefix());
            graph.insert_user(registration.into_user(id.clone(), role))?;
            Ok(id)
        })?;
        tracing::info!(user_id = %id, "user registered");
        Ok(id)
    }

    /// Match id, password and role exactly. Passwords are compared as plain
    /// text.
    #[instrument(skip(self, password))]
    pub fn authenticate(&self, id: &str, password: &str, role: Role) -> Option<User> {
        let graph = self.read();
        let user = graph
            .users
            .iter()
            .find(|u| u.id == id && u.password == password && u.role() == role)
            .cloned();
        if user.is_none() {
            tracing::debug!("authentication failed");
        }
        user
    }

    pub fn find_user(&self, id: &str) -> Option<User> {
        self.read().user(id).cloned()
    }

    pub fn find_student(&self, id: &str) -> Option<User> {
        self.read().user_with_role(id, Role::Student).cloned()
    }

    pub fn find_evaluator(&self, id: &str) -> Option<User> {
        self.read().user_with_role(id, Role::Evaluator).cloned()
    }

    pub fn find_coordinator(&self, id: &str) -> Option<User> {
        self.read().user_with_role(id, Role::Coordinator).cloned()
    }

    pub fn users(&self) -> Vec<User> {
        self.read().users.clone()
    }

    pub fn users_with_role(&self, role: Role) -> Vec<User> {
        self.read().users_with_role(role).cloned().collect()
    }

    pub fn students(&self) -> Vec<User> {
        self.users_with_role(Role::Student)
    }

    pub fn evaluators(&self) -> Vec<User> {
        self.users_with_role(Role::Evaluator)
    }

    pub fn coordinators(&self) -> Vec<User> {
        self.users_with_role(Role::Coordinator)
    }

    // -----------------------------------------------------------------------
    // Submissions
    // -----------------------------------------------------------------------

    pub fn find_submission(&self, id: &str) -> Option<Submission> {
        self.read().submission(id).cloned()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.read().submissions.clone()
    }

    /// Insert a prepared submission; it enters unassigned and unevaluated.
    #[instrument(skip(self, submission), fields(submission_id = %submission.id))]
    pub fn add_submission(&self, submission: Submission) -> Result<()> {
        self.mutate(|graph| graph.insert_submission(submission))
    }

    /// Create a submission owned by `student_id`.
    ///
    /// A supplied supervisor is captured on the submission and becomes the
    /// student's default; otherwise the current default is copied.
    #[instrument(skip(self, new), fields(title = %new.title))]
    pub fn register_submission(&self, student_id: &str, new: NewSubmission) -> Result<String> {
        let id = self.mutate(|graph| {
            let default_supervisor = graph
                .require_role(student_id, Role::Student)?
                .as_student()
                .map(|p| p.supervisor_name.clone())
                .unwrap_or_default();
            let supervisor_name = new
                .supervisor_name
                .clone()
                .unwrap_or_else(|| default_supervisor.clone());

            let id = opaque_id("SUB");
            graph.insert_submission(Submission {
                id: id.clone(),
                title: new.title,
                abstract_text: new.abstract_text,
                supervisor_name: supervisor_name.clone(),
                presentation_type: new.presentation_type,
                file_path: new.file_path.filter(|p| !p.trim().is_empty()),
                board_id: String::new(),
                student_id: student_id.to_string(),
                session_id: None,
                evaluations: Vec::new(),
            })?;

            if new.supervisor_name.is_some() {
                if let Some(profile) = graph.user_mut(student_id).and_then(User::student_mut) {
                    profile.supervisor_name = supervisor_name;
                }
            }
            Ok(id)
        })?;
        tracing::info!(submission_id = %id, "submission registered");
        Ok(id)
    }

    /// Attach presentation material. Only the owning student may do this.
    #[instrument(skip(self))]
    pub fn upload_material(&self, student_id: &str, submission_id: &str, path: &str) -> Result<()> {
        self.mutate(|graph| {
            graph.require_role(student_id, Role::Student)?;
            let owner = &graph.require_submission(submission_id)?.student_id;
            if owner != student_id {
                return Err(ConstraintViolation::NotOwner {
                    submission_id: submission_id.to_string(),
                    student_id: student_id.to_string(),
                }
                .into());
            }
            if let Some(submission) = graph.submission_mut(submission_id) {
                submission.file_path = Some(path.to_string());
            }
            Ok(())
        })
    }

    /// Change the supervisor recorded on one submission.
    #[instrument(skip(self))]
    pub fn set_submission_supervisor(&self, submission_id: &str, supervisor: &str) -> Result<()> {
        self.mutate(|graph| {
            graph.require_submission(submission_id)?;
            if let Some(submission) = graph.submission_mut(submission_id) {
                submission.supervisor_name = supervisor.to_string();
            }
            Ok(())
        })
    }

    /// Remove a submission and every evaluation of it.
    #[instrument(skip(self))]
    pub fn remove_submission(&self, id: &str) -> Result<Submission> {
        let removed = self.mutate(|graph| graph.remove_submission(id))?;
        tracing::info!(
            evaluations = removed.evaluations.len(),
            "submission removed"
        );
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    pub fn find_session(&self, id: &str) -> Option<Session> {
        self.read().session(id).cloned()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.read().sessions.clone()
    }

    /// Insert a prepared session, optionally under a managing coordinator.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub fn add_session(&self, session: Session, coordinator_id: Option<&str>) -> Result<()> {
        self.mutate(|graph| graph.insert_session(session, coordinator_id))
    }

    /// Create a session managed by `coordinator_id`.
    #[instrument(skip(self, new), fields(venue = %new.venue, session_type = %new.session_type))]
    pub fn create_session(&self, coordinator_id: &str, new: NewSession) -> Result<String> {
        let id = self.mutate(|graph| {
            let id = opaque_id("SES");
            graph.insert_session(
                Session {
                    id: id.clone(),
                    date: new.date,
                    time: new.time,
                    venue: new.venue,
                    session_type: new.session_type,
                    submissions: Vec::new(),
                    evaluators: Vec::new(),
                },
                Some(coordinator_id),
            )?;
            Ok(id)
        })?;
        tracing::info!(session_id = %id, "session created");
        Ok(id)
    }

    /// Delete a session, releasing its submissions and evaluators.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Result<Session> {
        let removed = self.mutate(|graph| graph.remove_session(id))?;
        tracing::info!(
            submissions = removed.submissions.len(),
            evaluators = removed.evaluators.len(),
            "session removed"
        );
        Ok(removed)
    }

    #[instrument(skip(self))]
    pub fn assign_submission(&self, session_id: &str, submission_id: &str) -> Result<()> {
        self.mutate(|graph| assignment::assign_submission(graph, session_id, submission_id))?;
        tracing::info!("submission assigned");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn unassign_submission(&self, session_id: &str, submission_id: &str) -> Result<()> {
        self.mutate(|graph| assignment::unassign_submission(graph, session_id, submission_id))
    }

    #[instrument(skip(self))]
    pub fn assign_evaluator(&self, session_id: &str, evaluator_id: &str) -> Result<()> {
        self.mutate(|graph| assignment::assign_evaluator(graph, session_id, evaluator_id))?;
        tracing::info!("evaluator assigned");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn unassign_evaluator(&self, session_id: &str, evaluator_id: &str) -> Result<()> {
        self.mutate(|graph| assignment::unassign_evaluator(graph, session_id, evaluator_id))
    }

    /// Submissions in every session the evaluator sits on.
    pub fn assigned_submissions(&self, evaluator_id: &str) -> Vec<Submission> {
        let graph = self.read();
        assignment::assigned_submission_ids(&graph, evaluator_id)
            .iter()
            .filter_map(|id| graph.submission(id).cloned())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Evaluations
    // -----------------------------------------------------------------------

    pub fn find_evaluation(&self, id: &str) -> Option<Evaluation> {
        self.read().evaluation(id).cloned()
    }

    pub fn evaluations(&self) -> Vec<Evaluation> {
        self.read().evaluations.clone()
    }

    /// Insert a prepared evaluation without the one-per-pair check.
    ///
    /// Use [`Repository::evaluate`] for anything user-driven.
    #[instrument(skip(self, evaluation), fields(evaluation_id = %evaluation.id))]
    pub fn add_evaluation(&self, evaluation: Evaluation) -> Result<()> {
        self.mutate(|graph| graph.insert_evaluation(evaluation))
    }

    /// Score a submission. One evaluation per (evaluator, submission) pair.
    #[instrument(skip(self, rubric, comments))]
    pub fn evaluate(
        &self,
        evaluator_id: &str,
        submission_id: &str,
        rubric: Rubric,
        comments: &str,
    ) -> Result<String> {
        let id = self.mutate(|graph| {
            evaluation::evaluate(graph, evaluator_id, submission_id, rubric, comments)
        })?;
        tracing::info!(evaluation_id = %id, total = rubric.total(), "evaluation recorded");
        Ok(id)
    }

    /// Evaluations written by `evaluator_id`, oldest first. Empty for an
    /// unknown id or a user who is not an evaluator.
    pub fn evaluations_by(&self, evaluator_id: &str) -> Vec<Evaluation> {
        let graph = self.read();
        evaluation::evaluations_by(&graph, evaluator_id)
            .into_iter()
            .cloned()
            .collect()
    }

    #[instrument(skip(self))]
    pub fn remove_evaluation(&self, id: &str) -> Result<Evaluation> {
        self.mutate(|graph| graph.remove_evaluation(id))
    }

    /// Average total score, or `None` if the submission does not exist.
    pub fn average_score(&self, submission_id: &str) -> Option<f64> {
        let graph = self.read();
        graph
            .submission(submission_id)
            .map(|s| evaluation::average_score(&graph, s))
    }

    /// Summed total scores, or `None` if the submission does not exist.
    pub fn total_marks(&self, submission_id: &str) -> Option<u64> {
        let graph = self.read();
        graph
            .submission(submission_id)
            .map(|s| evaluation::total_marks(&graph, s))
    }

    // -----------------------------------------------------------------------
    // Awards
    // -----------------------------------------------------------------------

    pub fn find_award(&self, id: &str) -> Option<Award> {
        self.read().award(id).cloned()
    }

    pub fn awards(&self) -> Vec<Award> {
        self.read().awards.clone()
    }

    #[instrument(skip(self, award), fields(category = %award.category))]
    pub fn add_award(&self, award: Award) -> Result<()> {
        self.mutate(|graph| graph.insert_award(award))
    }

    /// Compute awards over every submission. Nothing is stored.
    pub fn compute_awards(&self, categories: &[AwardCategory]) -> Vec<Award> {
        let graph = self.read();
        let pool: Vec<&Submission> = graph.submissions.iter().collect();
        awards::compute_awards(&graph, categories, &pool)
    }

    /// Every eligible submission for `category`, best first.
    pub fn rank(&self, category: AwardCategory) -> Vec<RankedSubmission> {
        let graph = self.read();
        awards::rank(&graph, category, graph.submissions.iter())
    }

    /// Compute awards and store them, replacing earlier awards of the same
    /// categories. A category listed twice is recorded once.
    #[instrument(skip(self))]
    pub fn record_awards(&self, categories: &[AwardCategory]) -> Result<Vec<Award>> {
        let mut unique: Vec<AwardCategory> = Vec::with_capacity(categories.len());
        for &category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        let computed = self.mutate(|graph| {
            let pool: Vec<&Submission> = graph.submissions.iter().collect();
            let computed = awards::compute_awards(graph, &unique, &pool);
            graph.awards.retain(|a| !unique.contains(&a.category));
            for award in &computed {
                graph.insert_award(award.clone())?;
            }
            Ok(computed)
        })?;
        for award in &computed {
            tracing::info!(
                category = %award.category,
                winner = award.winner.as_deref().unwrap_or("-"),
                score = award.winning_score,
                "award recorded"
            );
        }
        Ok(computed)
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    pub fn statistics(&self) -> SeminarStatistics {
        statistics::compute(&self.read())
    }
}

fn load_or_empty(store: &dyn SnapshotStore, initialize: bool) -> SeminarGraph {
    match store.load() {
        Ok(Some(graph)) => {
            tracing::info!(
                users = graph.users.len(),
                submissions = graph.submissions.len(),
                sessions = graph.sessions.len(),
                "loaded snapshot from {}",
                store.location()
            );
            graph
        }
        Ok(None) => {
            tracing::info!("no snapshot at {}, starting empty", store.location());
            let graph = SeminarGraph::new();
            if initialize {
                if let Err(e) = store.save(&graph) {
                    tracing::warn!("could not create snapshot at {}: {e}", store.location());
                }
            }
            graph
        }
        Err(e) => {
            tracing::warn!(
                "failed to load snapshot from {}: {e}; starting empty",
                store.location()
            );
            SeminarGraph::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::PresentationType;

    fn registration(name: &str, detail: &str) -> Registration {
        Registration {
            name: name.into(),
            email: format!("{}@uni.test", name.to_lowercase()),
            password: "secret".into(),
            detail: detail.into(),
        }
    }

    fn oral(title: &str) -> NewSubmission {
        NewSubmission {
            title: title.into(),
            abstract_text: "abstract".into(),
            supervisor_name: None,
            presentation_type: PresentationType::Oral,
            file_path: None,
        }
    }

    fn new_session(kind: PresentationType) -> NewSession {
        NewSession {
            date: "2025-03-14".into(),
            time: "09:00".into(),
            venue: "Room 101".into(),
            session_type: kind,
        }
    }

    #[test]
    fn registration_allocates_sequential_ids() {
        let repo = Repository::in_memory();
        let a = repo.register_user(Role::Student, registration("Ada", "Dr. H")).unwrap();
        let b = repo.register_user(Role::Student, registration("Bob", "Dr. H")).unwrap();
        let e = repo.register_user(Role::Evaluator, registration("Eve", "ML")).unwrap();
        assert_eq!((a.as_str(), b.as_str(), e.as_str()), ("S001", "S002", "E001"));
        assert_eq!(repo.next_id("S"), "S003");
        assert_eq!(repo.students().len(), 2);
        assert_eq!(repo.evaluators().len(), 1);
    }

    #[test]
    fn authentication_matches_all_three_fields() {
        let repo = Repository::in_memory();
        let id = repo.register_user(Role::Coordinator, registration("Cat", "CS")).unwrap();
        assert!(repo.authenticate(&id, "secret", Role::Coordinator).is_some());
        assert!(repo.authenticate(&id, "Secret", Role::Coordinator).is_none());
        assert!(repo.authenticate(&id, "secret", Role::Student).is_none());
        assert!(repo.authenticate("C999", "secret", Role::Coordinator).is_none());
    }

    #[test]
    fn lookups_fail_soft() {
        let repo = Repository::in_memory();
        assert!(repo.find_user("S001").is_none());
        assert!(repo.find_submission("SUB-x").is_none());
        assert!(repo.find_session("SES-x").is_none());
        assert!(repo.find_evaluation("EVAL-x").is_none());
        assert!(repo.find_award("AWD-x").is_none());
        assert!(repo.average_score("SUB-x").is_none());
    }

    #[test]
    fn supplied_supervisor_becomes_the_default() {
        let repo = Repository::in_memory();
        let s = repo.register_user(Role::Student, registration("Ada", "Dr. Old")).unwrap();

        let first = repo.register_submission(&s, oral("First")).unwrap();
        assert_eq!(repo.find_submission(&first).unwrap().supervisor_name, "Dr. Old");

        let mut second = oral("Second");
        second.supervisor_name = Some("Dr. New".into());
        let second = repo.register_submission(&s, second).unwrap();
        assert_eq!(repo.find_submission(&second).unwrap().supervisor_name, "Dr. New");
        assert_eq!(
            repo.find_student(&s).unwrap().as_student().unwrap().supervisor_name,
            "Dr. New"
        );

        repo.set_submission_supervisor(&first, "Dr. Edited").unwrap();
        assert_eq!(repo.find_submission(&first).unwrap().supervisor_name, "Dr. Edited");
        assert_eq!(
            repo.find_student(&s).unwrap().as_student().unwrap().supervisor_name,
            "Dr. New"
        );
    }

    #[test]
    fn only_the_owner_uploads_material() {
        let repo = Repository::in_memory();
        let a = repo.register_user(Role::Student, registration("Ada", "")).unwrap();
        let b = repo.register_user(Role::Student, registration("Bob", "")).unwrap();
        let sub = repo.register_submission(&a, oral("Mine")).unwrap();

        let err = repo.upload_material(&b, &sub, "/tmp/slides.pdf").unwrap_err();
        assert!(matches!(
            err.constraint(),
            Some(ConstraintViolation::NotOwner { .. })
        ));
        repo.upload_material(&a, &sub, "/tmp/slides.pdf").unwrap();
        assert_eq!(
            repo.find_submission(&sub).unwrap().file_path.as_deref(),
            Some("/tmp/slides.pdf")
        );
    }

    #[test]
    fn deleting_a_session_releases_everything() {
        let repo = Repository::in_memory();
        let c = repo.register_user(Role::Coordinator, registration("Cat", "CS")).unwrap();
        let e = repo.register_user(Role::Evaluator, registration("Eve", "ML")).unwrap();
        let s1 = repo.register_user(Role::Student, registration("Ada", "")).unwrap();
        let s2 = repo.register_user(Role::Student, registration("Bob", "")).unwrap();
        let sub1 = repo.register_submission(&s1, oral("One")).unwrap();
        let sub2 = repo.register_submission(&s2, oral("Two")).unwrap();
        let ses = repo.create_session(&c, new_session(PresentationType::Oral)).unwrap();
        repo.assign_submission(&ses, &sub1).unwrap();
        repo.assign_submission(&ses, &sub2).unwrap();
        repo.assign_evaluator(&ses, &e).unwrap();

        repo.remove_session(&ses).unwrap();

        assert!(repo.find_session(&ses).is_none());
        assert!(repo.find_submission(&sub1).unwrap().session_id.is_none());
        assert!(repo.find_submission(&sub2).unwrap().session_id.is_none());
        assert!(repo.find_evaluator(&e).unwrap().as_evaluator().unwrap().sessions.is_empty());
        assert!(repo.find_coordinator(&c).unwrap().as_coordinator().unwrap().sessions.is_empty());
    }

    #[test]
    fn failed_save_keeps_the_mutation() {
        let store = Arc::new(MemoryStore::new());
        let repo = Repository::open(Arc::clone(&store));
        store.set_fail_saves(true);

        let err = repo
            .add_user(crate::graph::tests::student("S010"))
            .unwrap_err();
        assert!(err.is_applied());
        assert!(repo.find_student("S010").is_some());

        store.set_fail_saves(false);
        repo.save().unwrap();
        let reopened = Repository::open(Arc::clone(&store));
        assert!(reopened.find_student("S010").is_some());
    }

    #[test]
    fn rejected_mutations_do_not_save() {
        let store = Arc::new(MemoryStore::new());
        let repo = Repository::open(Arc::clone(&store));
        let saves = store.save_count();
        let student = crate::graph::tests::student("S001");
        repo.add_user(student.clone()).unwrap();
        assert!(repo.add_user(student).is_err());
        assert_eq!(store.save_count(), saves + 1);
    }

    #[test]
    fn file_snapshot_reopens_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seminar.json");
        let repo = Repository::open_file(&path);
        let c = repo.register_user(Role::Coordinator, registration("Cat", "CS")).unwrap();
        let e = repo.register_user(Role::Evaluator, registration("Eve", "ML")).unwrap();
        let s = repo.register_user(Role::Student, registration("Ada", "Dr. H")).unwrap();
        let sub = repo
            .register_submission(
                &s,
                NewSubmission {
                    presentation_type: PresentationType::Poster,
                    ..oral("Poster")
                },
            )
            .unwrap();
        let ses = repo.create_session(&c, new_session(PresentationType::Poster)).unwrap();
        repo.assign_submission(&ses, &sub).unwrap();
        repo.assign_evaluator(&ses, &e).unwrap();
        repo.evaluate(&e, &sub, Rubric::new(7, 7, 7, 7), "fine").unwrap();
        repo.record_awards(&AwardCategory::ALL).unwrap();

        let reopened = Repository::open_file(&path);
        assert_eq!(reopened.snapshot(), repo.snapshot());
        assert_eq!(reopened.find_submission(&sub).unwrap().board_id, "ROOM101-1");

        repo.remove_submission(&sub).unwrap();
        reopened.reload();
        assert!(reopened.find_submission(&sub).is_none());
        assert!(reopened.evaluations().is_empty());
    }

    #[test]
    fn fractional_award_scores_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seminar.json");
        let repo = Repository::open_file(&path);
        let s = repo.register_user(Role::Student, registration("Ada", "")).unwrap();
        let sub = repo.register_submission(&s, oral("Talk")).unwrap();
        // Eight totals of 9 and one of 11: 83 / 9 does not terminate.
        for i in 0..9 {
            let e = repo
                .register_user(Role::Evaluator, registration(&format!("Eve{i}"), ""))
                .unwrap();
            let rubric = if i == 0 { Rubric::new(3, 3, 3, 2) } else { Rubric::new(3, 2, 2, 2) };
            repo.evaluate(&e, &sub, rubric, "").unwrap();
        }
        let awards = repo.record_awards(&[AwardCategory::BestOral]).unwrap();
        assert_eq!(awards[0].winning_score, 83.0 / 9.0);

        let reopened = Repository::open_file(&path);
        assert_eq!(reopened.awards()[0].winning_score, 83.0 / 9.0);
        assert_eq!(reopened.snapshot(), repo.snapshot());
    }

    #[test]
    fn corrupt_snapshot_opens_empty() {
        let repo = Repository::open(MemoryStore::with_content("certainly not json"));
        assert!(repo.snapshot().is_empty());
    }

    #[test]
    fn record_awards_replaces_previous_results() {
        let repo = Repository::in_memory();
        let s = repo.register_user(Role::Student, registration("Ada", "")).unwrap();
        let e = repo.register_user(Role::Evaluator, registration("Eve", "ML")).unwrap();
        let sub = repo.register_submission(&s, oral("Talk")).unwrap();

        let first = repo.record_awards(&AwardCategory::ALL).unwrap();
        assert!(first.iter().all(|a| a.winner.is_none()));

        repo.evaluate(&e, &sub, Rubric::new(9, 8, 7, 6), "").unwrap();
        let second = repo.record_awards(&[AwardCategory::BestOral]).unwrap();
        assert_eq!(second[0].winner.as_deref(), Some(sub.as_str()));

        let stored = repo.awards();
        assert_eq!(stored.len(), 3);
        let oral_awards: Vec<_> = stored
            .iter()
            .filter(|a| a.category == AwardCategory::BestOral)
            .collect();
        assert_eq!(oral_awards.len(), 1);
        assert_eq!(oral_awards[0].winning_score, 30.0);
    }

    #[test]
    fn record_awards_collapses_repeated_categories() {
        let repo = Repository::in_memory();
        let recorded = repo
            .record_awards(&[AwardCategory::BestOral, AwardCategory::BestOral])
            .unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(repo.awards().len(), 1);
    }

    #[test]
    fn evaluations_by_lists_an_evaluators_work() {
        let repo = Repository::in_memory();
        let s1 = repo.register_user(Role::Student, registration("Ada", "")).unwrap();
        let s2 = repo.register_user(Role::Student, registration("Bob", "")).unwrap();
        let e1 = repo.register_user(Role::Evaluator, registration("Eve", "")).unwrap();
        let e2 = repo.register_user(Role::Evaluator, registration("Ed", "")).unwrap();
        let a = repo.register_submission(&s1, oral("A")).unwrap();
        let b = repo.register_submission(&s2, oral("B")).unwrap();

        let first = repo.evaluate(&e1, &a, Rubric::new(5, 5, 5, 5), "").unwrap();
        repo.evaluate(&e2, &a, Rubric::new(6, 6, 6, 6), "").unwrap();
        let second = repo.evaluate(&e1, &b, Rubric::new(7, 7, 7, 7), "").unwrap();

        let ids: Vec<String> = repo.evaluations_by(&e1).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first, second.clone()]);

        repo.remove_evaluation(&second).unwrap();
        assert_eq!(repo.evaluations_by(&e1).len(), 1);
        assert!(repo.evaluations_by(&s1).is_empty());
        assert!(repo.evaluations_by("E404").is_empty());
    }

    #[test]
    fn concurrent_registrations_get_distinct_ids() {
        let repo = Arc::new(Repository::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    repo.register_user(Role::Student, registration(&format!("U{i}"), ""))
                        .unwrap()
                })
            })
            .collect();
        let mut ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(repo.next_id("S"), "S009");
    }

    #[test]
    fn concurrent_evaluations_of_one_pair_admit_one() {
        let repo = Arc::new(Repository::in_memory());
        let s = repo.register_user(Role::Student, registration("Ada", "")).unwrap();
        let e = repo.register_user(Role::Evaluator, registration("Eve", "")).unwrap();
        let sub = repo.register_submission(&s, oral("Talk")).unwrap();

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let (repo, e, sub) = (Arc::clone(&repo), e.clone(), sub.clone());
                std::thread::spawn(move || repo.evaluate(&e, &sub, Rubric::new(5, 5, 5, 5), "").is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(repo.find_submission(&sub).unwrap().evaluations.len(), 1);
    }
}
