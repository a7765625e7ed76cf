//! Core data model types for the seminar engine.
//!
//! Entities refer to each other by id only. The [`crate::graph::SeminarGraph`]
//! arena owns every record; the id lists kept on each side of a relation are
//! maintained together by the repository and the rule modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Evaluator,
    Coordinator,
}

impl Role {
    /// Prefix used for generated user ids (`S001`, `E001`, `C001`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            Role::Student => "S",
            Role::Evaluator => "E",
            Role::Coordinator => "C",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "Student"),
            Role::Evaluator => write!(f, "Evaluator"),
            Role::Coordinator => write!(f, "Coordinator"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "evaluator" => Ok(Role::Evaluator),
            "coordinator" => Ok(Role::Coordinator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Presentation format of a submission, and the type of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresentationType {
    Oral,
    Poster,
}

impl fmt::Display for PresentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationType::Oral => write!(f, "Oral"),
            PresentationType::Poster => write!(f, "Poster"),
        }
    }
}

impl FromStr for PresentationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "oral" => Ok(PresentationType::Oral),
            "poster" => Ok(PresentationType::Poster),
            other => Err(format!("unknown presentation type: {other}")),
        }
    }
}

/// Award categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwardCategory {
    #[serde(rename = "Best Oral")]
    BestOral,
    #[serde(rename = "Best Poster")]
    BestPoster,
    #[serde(rename = "People's Choice")]
    PeoplesChoice,
}

impl AwardCategory {
    /// All categories, in ceremony order.
    pub const ALL: [AwardCategory; 3] = [
        AwardCategory::BestOral,
        AwardCategory::BestPoster,
        AwardCategory::PeoplesChoice,
    ];

    /// The presentation type a submission must have to compete, if any.
    pub fn eligible_type(self) -> Option<PresentationType> {
        match self {
            AwardCategory::BestOral => Some(PresentationType::Oral),
            AwardCategory::BestPoster => Some(PresentationType::Poster),
            AwardCategory::PeoplesChoice => None,
        }
    }

    /// Label for the metric this category is ranked by.
    pub fn metric_label(self) -> &'static str {
        match self {
            AwardCategory::BestOral | AwardCategory::BestPoster => "Average Score",
            AwardCategory::PeoplesChoice => "Total Marks",
        }
    }
}

impl fmt::Display for AwardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwardCategory::BestOral => write!(f, "Best Oral"),
            AwardCategory::BestPoster => write!(f, "Best Poster"),
            AwardCategory::PeoplesChoice => write!(f, "People's Choice"),
        }
    }
}

impl FromStr for AwardCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "bestoral" | "oral" => Ok(AwardCategory::BestOral),
            "bestposter" | "poster" => Ok(AwardCategory::BestPoster),
            "peopleschoice" | "people" => Ok(AwardCategory::PeoplesChoice),
            _ => Err(format!("unknown award category: {s}")),
        }
    }
}

/// A user account of any role.
///
/// The role is carried by the [`Profile`] tag, so a user can never disagree
/// with its own role-specific payload.
///
/// Passwords are stored and compared as plain text. This is a known weakness
/// kept so that authentication behaves exactly as existing snapshots expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile: Profile,
}

impl User {
    pub fn role(&self) -> Role {
        match self.profile {
            Profile::Student(_) => Role::Student,
            Profile::Evaluator(_) => Role::Evaluator,
            Profile::Coordinator(_) => Role::Coordinator,
        }
    }

    pub fn as_student(&self) -> Option<&StudentProfile> {
        match &self.profile {
            Profile::Student(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_evaluator(&self) -> Option<&EvaluatorProfile> {
        match &self.profile {
            Profile::Evaluator(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_coordinator(&self) -> Option<&CoordinatorProfile> {
        match &self.profile {
            Profile::Coordinator(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn student_mut(&mut self) -> Option<&mut StudentProfile> {
        match &mut self.profile {
            Profile::Student(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn evaluator_mut(&mut self) -> Option<&mut EvaluatorProfile> {
        match &mut self.profile {
            Profile::Evaluator(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn coordinator_mut(&mut self) -> Option<&mut CoordinatorProfile> {
        match &mut self.profile {
            Profile::Coordinator(p) => Some(p),
            _ => None,
        }
    }
}

/// Role-specific part of a [`User`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Profile {
    Student(StudentProfile),
    Evaluator(EvaluatorProfile),
    Coordinator(CoordinatorProfile),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Default supervisor copied onto new submissions.
    pub supervisor_name: String,
    /// Owned submissions, in registration order.
    #[serde(default)]
    pub submissions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorProfile {
    pub expertise: String,
    /// Evaluations authored by this evaluator.
    #[serde(default)]
    pub evaluations: Vec<String>,
    /// Sessions this evaluator sits on.
    #[serde(default)]
    pub sessions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorProfile {
    pub department: String,
    /// Sessions this coordinator manages. Not exclusive.
    #[serde(default)]
    pub sessions: Vec<String>,
}

/// Input for registering a new user; the id is allocated by the repository.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Supervisor, expertise or department depending on the role.
    pub detail: String,
}

impl Registration {
    pub(crate) fn into_user(self, id: String, role: Role) -> User {
        let profile = match role {
            Role::Student => Profile::Student(StudentProfile {
                supervisor_name: self.detail,
                submissions: Vec::new(),
            }),
            Role::Evaluator => Profile::Evaluator(EvaluatorProfile {
                expertise: self.detail,
                ..Default::default()
            }),
            Role::Coordinator => Profile::Coordinator(CoordinatorProfile {
                department: self.detail,
                sessions: Vec::new(),
            }),
        };
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            profile,
        }
    }
}

/// A research presentation submitted by a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    /// Copy of the supervisor at creation time; editable independently.
    pub supervisor_name: String,
    pub presentation_type: PresentationType,
    #[serde(default)]
    pub file_path: Option<String>,
    /// Poster board label. Empty until placed in a poster session.
    #[serde(default)]
    pub board_id: String,
    pub student_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub evaluations: Vec<String>,
}

/// Input for registering a submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub title: String,
    pub abstract_text: String,
    /// Falls back to the student's default supervisor when `None`.
    pub supervisor_name: Option<String>,
    pub presentation_type: PresentationType,
    pub file_path: Option<String>,
}

/// A scheduled seminar session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub time: String,
    pub venue: String,
    pub session_type: PresentationType,
    #[serde(default)]
    pub submissions: Vec<String>,
    #[serde(default)]
    pub evaluators: Vec<String>,
}

/// Input for creating a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub date: String,
    pub time: String,
    pub venue: String,
    pub session_type: PresentationType,
}

/// The four rubric sub-scores, each 0–10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rubric {
    pub problem_clarity: u8,
    pub methodology: u8,
    pub results: u8,
    pub presentation: u8,
}

impl Rubric {
    pub const MAX_PER_CRITERION: u8 = 10;
    pub const MAX_TOTAL: u32 = 40;

    pub fn new(problem_clarity: u8, methodology: u8, results: u8, presentation: u8) -> Self {
        Self {
            problem_clarity,
            methodology,
            results,
            presentation,
        }
    }

    /// Sum of the four sub-scores.
    pub fn total(&self) -> u32 {
        u32::from(self.problem_clarity)
            + u32::from(self.methodology)
            + u32::from(self.results)
            + u32::from(self.presentation)
    }
}

/// One evaluator's scoring of one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: String,
    pub rubric: Rubric,
    #[serde(default)]
    pub comments: String,
    pub submission_id: String,
    pub evaluator_id: String,
}

impl Evaluation {
    /// Total out of 40.
    pub fn total_score(&self) -> u32 {
        self.rubric.total()
    }

    /// Total as a percentage of the maximum.
    pub fn percentage(&self) -> f64 {
        self.total_score() as f64 / Rubric::MAX_TOTAL as f64 * 100.0
    }
}

/// A computed award. Not referenced by any other entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub id: String,
    pub category: AwardCategory,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub winning_score: f64,
}

/// Generate an opaque entity id such as `SUB-3f2a…`.
pub fn opaque_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
