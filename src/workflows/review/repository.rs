use serde::{Deserialize, Serialize};

use super::domain::{
    Assignment, DistributionGuard, Evaluation, Evaluator, EvaluatorId, Work, WorkId,
};

/// Wholesale assignment state produced by a successful distribution run:
/// the full link set, a workload value for every evaluator, and the
/// stamped guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionCommit {
    pub assignments: Vec<Assignment>,
    pub workloads: Vec<(EvaluatorId, u32)>,
    pub guard: DistributionGuard,
}

/// Storage abstraction so the engines can be exercised in isolation.
///
/// Implementations must honor two transactional constraints:
/// `insert_evaluation` rejects a second evaluation for the same
/// (evaluator, work) pair with `Conflict`, and `commit_distribution`
/// rejects the commit with `Conflict` when the guard is already set, both
/// inside the store's own critical section.
pub trait ReviewStore: Send + Sync {
    fn load_works(&self) -> Result<Vec<Work>, StoreError>;
    fn load_evaluators(&self) -> Result<Vec<Evaluator>, StoreError>;
    fn load_assignments(&self) -> Result<Vec<Assignment>, StoreError>;
    fn load_evaluations(&self) -> Result<Vec<Evaluation>, StoreError>;
    fn find_work(&self, id: &WorkId) -> Result<Option<Work>, StoreError>;
    fn find_evaluator(&self, id: &EvaluatorId) -> Result<Option<Evaluator>, StoreError>;
    fn find_evaluation(
        &self,
        evaluator_id: &EvaluatorId,
        work_id: &WorkId,
    ) -> Result<Option<Evaluation>, StoreError>;
    fn is_assigned(&self, evaluator_id: &EvaluatorId, work_id: &WorkId)
        -> Result<bool, StoreError>;
    fn evaluations_by_evaluator(
        &self,
        evaluator_id: &EvaluatorId,
    ) -> Result<Vec<Evaluation>, StoreError>;
    fn evaluations_by_work(&self, work_id: &WorkId) -> Result<Vec<Evaluation>, StoreError>;
    fn guard(&self) -> Result<DistributionGuard, StoreError>;
    fn insert_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, StoreError>;
    fn commit_distribution(&self, commit: DistributionCommit) -> Result<(), StoreError>;
    /// Clear the guard, delete all evaluations and assignment links, and
    /// zero every workload counter.
    fn reset_distribution(&self) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
