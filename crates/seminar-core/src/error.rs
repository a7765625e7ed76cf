//! Error types for repository and rule operations.
//!
//! Lookups return `Option` and never produce these errors. Operations that
//! need an entity to act on report [`SeminarError::NotFound`].

use std::fmt;

use thiserror::Error;

use crate::model::{PresentationType, Role};

pub type Result<T, E = SeminarError> = std::result::Result<T, E>;

/// Kinds of entity held by the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Submission,
    Session,
    Evaluation,
    Award,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => write!(f, "user"),
            EntityKind::Submission => write!(f, "submission"),
            EntityKind::Session => write!(f, "session"),
            EntityKind::Evaluation => write!(f, "evaluation"),
            EntityKind::Award => write!(f, "award"),
        }
    }
}

/// Errors returned by repository mutations.
#[derive(Debug, Error)]
pub enum SeminarError {
    /// An entity with this id already exists.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A business rule rejected the mutation. Nothing was changed.
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    /// The mutation was applied in memory but could not be persisted.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl SeminarError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        SeminarError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns the constraint violation, if this is one.
    pub fn constraint(&self) -> Option<&ConstraintViolation> {
        match self {
            SeminarError::Constraint(c) => Some(c),
            _ => None,
        }
    }

    /// Returns `true` if the in-memory state was changed despite the error.
    pub fn is_applied(&self) -> bool {
        matches!(self, SeminarError::Persistence(_))
    }
}

/// Business-rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("session {session_id} is {session_type} but submission {submission_id} is {presentation_type}")]
    TypeMismatch {
        session_id: String,
        session_type: PresentationType,
        submission_id: String,
        presentation_type: PresentationType,
    },

    #[error("submission {submission_id} is already assigned to session {session_id}")]
    AlreadyAssigned {
        submission_id: String,
        session_id: String,
    },

    #[error("session {session_id} already holds a submission by student {student_id}")]
    DuplicateStudent {
        session_id: String,
        student_id: String,
    },

    #[error("evaluator {evaluator_id} has already evaluated submission {submission_id}")]
    AlreadyEvaluated {
        evaluator_id: String,
        submission_id: String,
    },

    #[error("user {user_id} is a {actual}, expected {expected}")]
    RoleMismatch {
        user_id: String,
        expected: Role,
        actual: Role,
    },

    #[error("submission {submission_id} is not owned by student {student_id}")]
    NotOwner {
        submission_id: String,
        student_id: String,
    },

    #[error("{member_id} is not assigned to session {session_id}")]
    NotAssigned {
        member_id: String,
        session_id: String,
    },
}

/// Snapshot I/O failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to parse snapshot: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// Raised by test stores that are told to fail.
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_messages() {
        let err: SeminarError = ConstraintViolation::AlreadyEvaluated {
            evaluator_id: "E001".into(),
            submission_id: "SUB-1".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "evaluator E001 has already evaluated submission SUB-1"
        );
        assert!(err.constraint().is_some());
        assert!(!err.is_applied());
    }

    #[test]
    fn persistence_counts_as_applied() {
        let err: SeminarError = PersistenceError::Unavailable("disk full".into()).into();
        assert!(err.is_applied());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn not_found_message() {
        let err = SeminarError::not_found(EntityKind::Session, "SES-9");
        assert_eq!(err.to_string(), "session not found: SES-9");
    }
}
