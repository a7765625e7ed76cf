//! seminar-core: Entity repository, rules, and award engine.
//!
//! This crate holds the seminar data model, the business rules for placing
//! submissions and evaluators into sessions and for scoring submissions, the
//! award engine, and the lock-guarded [`repository::Repository`] that owns
//! and persists the whole entity graph.

pub mod assignment;
pub mod awards;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod model;
pub mod repository;
pub mod statistics;
pub mod store;

pub use error::{ConstraintViolation, EntityKind, PersistenceError, SeminarError};
pub use repository::Repository;
