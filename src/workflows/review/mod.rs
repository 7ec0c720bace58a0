//! Evaluator-to-work distribution, score recording, and aggregation for
//! exhibition peer review.
//!
//! The distribution engine assigns one pedagogical and one or two technical
//! evaluators to every registered work under conflict-of-interest and
//! load-balancing constraints, gated by a singleton guard so the batch runs
//! once per exhibition cycle. The recorder validates score submissions
//! against the resulting assignment graph, and the reporting module derives
//! completion progress and per-area podiums from the evaluation set.

pub(crate) mod balance;
pub(crate) mod distribution;
pub mod domain;
pub(crate) mod eligibility;
pub mod memory;
pub(crate) mod recorder;
pub mod reporting;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use distribution::{DistributionError, SubareaShortfall};
pub use domain::{
    Assignment, DistributionGuard, Evaluation, EvaluationId, EvaluationMethod, Evaluator,
    EvaluatorId, EvaluatorRole, PresentationType, Work, WorkId,
};
pub use memory::InMemoryReviewStore;
pub use recorder::EvaluationError;
pub use reporting::{
    AreaPodium, DistributionOverview, EvaluationStatistics, OverallStats, PageInfo, PodiumPlace,
    ProgressReport, WorkProgress,
};
pub use repository::{DistributionCommit, ReviewStore, StoreError};
pub use router::review_router;
pub use service::{DistributionSummary, EvaluationView, ReviewService, ReviewServiceError};
