use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted works.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkId(pub String);

/// Identifier wrapper for registered evaluators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EvaluatorId(pub String);

/// Identifier wrapper for recorded evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

/// How a work is presented at the exhibition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationType {
    Poster,
    Oral,
}

impl PresentationType {
    pub const fn label(self) -> &'static str {
        match self {
            PresentationType::Poster => "poster",
            PresentationType::Oral => "oral",
        }
    }
}

/// A submitted scientific work to be judged.
///
/// Works are created by the registration and import collaborators; the
/// engines only ever touch them through the assignment link set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: WorkId,
    pub title: String,
    pub authors: String,
    pub advisor: String,
    pub presentation: PresentationType,
    pub area: String,
    pub subarea: String,
}

/// Reserved marker in an area of expertise identifying process-focused
/// evaluators. Compared case-insensitively.
const PEDAGOGICAL_MARKER: &str = "pedag";

/// Role class of an evaluator, fixed at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorRole {
    Pedagogical,
    Technical,
}

impl EvaluatorRole {
    /// Classify an area of expertise against the reserved pedagogical
    /// marker. Any other area is a technical specialty.
    pub fn from_area(area: &str) -> Self {
        if area.to_lowercase().contains(PEDAGOGICAL_MARKER) {
            EvaluatorRole::Pedagogical
        } else {
            EvaluatorRole::Technical
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            EvaluatorRole::Pedagogical => "pedagogical",
            EvaluatorRole::Technical => "technical",
        }
    }
}

impl fmt::Display for EvaluatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A registered judge with a declared area of expertise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluator {
    pub id: EvaluatorId,
    pub name: String,
    /// Unique external credential identifier supplied at registration.
    pub registration: String,
    pub area: String,
    /// Subareas the evaluator declared an interest in. Membership is all
    /// that matters; order is irrelevant.
    pub subareas: BTreeSet<String>,
    pub role: EvaluatorRole,
    /// Count of works currently assigned. Rebuilt wholesale by each
    /// distribution run, never patched incrementally elsewhere.
    pub workload: u32,
}

impl Evaluator {
    /// Build an evaluator, deriving the role class from the declared area.
    pub fn new(
        id: EvaluatorId,
        name: impl Into<String>,
        registration: impl Into<String>,
        area: impl Into<String>,
        subareas: impl IntoIterator<Item = String>,
    ) -> Self {
        let area = area.into();
        let role = EvaluatorRole::from_area(&area);
        Self {
            id,
            name: name.into(),
            registration: registration.into(),
            area,
            subareas: subareas.into_iter().collect(),
            role,
            workload: 0,
        }
    }
}

/// Attribute-free link recording that an evaluator must evaluate a work.
/// Created only by a distribution run; cleared only by reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub work_id: WorkId,
    pub evaluator_id: EvaluatorId,
}

/// How an evaluation entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMethod {
    /// Self-service submission by the evaluator.
    Online,
    /// Paper sheet transcription confirmed by an administrator.
    ManualValidated,
    /// Sheet scores extracted by the external image pipeline.
    AiProcessed,
}

impl EvaluationMethod {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationMethod::Online => "online",
            EvaluationMethod::ManualValidated => "manual_validated",
            EvaluationMethod::AiProcessed => "ai_processed",
        }
    }
}

/// A scored review of one work by one evaluator. Immutable once recorded;
/// at most one exists per (evaluator, work) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    /// Five criterion scores, each in 1..=5.
    pub criteria: [u8; 5],
    pub method: EvaluationMethod,
    pub evaluator_id: EvaluatorId,
    pub work_id: WorkId,
}

impl Evaluation {
    /// Sum of the five criterion scores.
    pub fn total_score(&self) -> u32 {
        self.criteria.iter().map(|&score| u32::from(score)).sum()
    }
}

/// Singleton record gating the one-shot distribution run. The cleared
/// state is the `Default` value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionGuard {
    pub distributed: bool,
    pub distributed_at: Option<DateTime<Utc>>,
    pub distributed_by: Option<String>,
}

impl DistributionGuard {
    /// Stamp the guard for a successful distribution commit.
    pub fn completed(distributed_by: impl Into<String>) -> Self {
        Self {
            distributed: true,
            distributed_at: Some(Utc::now()),
            distributed_by: Some(distributed_by.into()),
        }
    }
}
