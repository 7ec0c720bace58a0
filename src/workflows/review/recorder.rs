use std::sync::atomic::{AtomicU64, Ordering};

use super::domain::{Evaluation, EvaluationId, EvaluationMethod, EvaluatorId, WorkId};
use super::repository::{ReviewStore, StoreError};
use super::service::ReviewServiceError;

/// Validation failures raised while recording a score submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("exactly five criterion scores are required")]
    MissingCriteria,
    #[error("criterion {index} must be an integer from 1 (poor) to 5 (excellent)")]
    CriterionOutOfRange { index: usize },
    #[error("work not found")]
    WorkNotFound,
    #[error("evaluator not found")]
    EvaluatorNotFound,
    #[error("evaluator is not assigned to evaluate this work")]
    NotAssigned,
    #[error("this evaluator has already evaluated this work")]
    AlreadyEvaluated,
}

static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("eval-{id:06}"))
}

/// Bounds-check the raw criterion scores into the persisted form.
pub(crate) fn validate_criteria(raw: &[i64]) -> Result<[u8; 5], EvaluationError> {
    if raw.len() != 5 {
        return Err(EvaluationError::MissingCriteria);
    }
    let mut criteria = [0u8; 5];
    for (index, &score) in raw.iter().enumerate() {
        if !(1..=5).contains(&score) {
            return Err(EvaluationError::CriterionOutOfRange { index: index + 1 });
        }
        criteria[index] = score as u8;
    }
    Ok(criteria)
}

/// Validate and persist a single score submission.
///
/// Checks run in order: criteria bounds, work existence, evaluator
/// existence, assignment authorization, pair uniqueness. Workload is
/// untouched; it reflects assignment, not completion.
pub(crate) fn record_evaluation<S: ReviewStore>(
    store: &S,
    evaluator_id: &EvaluatorId,
    work_id: &WorkId,
    criteria: &[i64],
    method: EvaluationMethod,
) -> Result<Evaluation, ReviewServiceError> {
    let criteria = validate_criteria(criteria)?;

    if store.find_work(work_id)?.is_none() {
        return Err(EvaluationError::WorkNotFound.into());
    }
    if store.find_evaluator(evaluator_id)?.is_none() {
        return Err(EvaluationError::EvaluatorNotFound.into());
    }
    if !store.is_assigned(evaluator_id, work_id)? {
        return Err(EvaluationError::NotAssigned.into());
    }
    if store.find_evaluation(evaluator_id, work_id)?.is_some() {
        return Err(EvaluationError::AlreadyEvaluated.into());
    }

    let evaluation = Evaluation {
        id: next_evaluation_id(),
        criteria,
        method,
        evaluator_id: evaluator_id.clone(),
        work_id: work_id.clone(),
    };

    match store.insert_evaluation(evaluation) {
        Ok(stored) => Ok(stored),
        // A concurrent submission for the same pair won the store's
        // uniqueness constraint.
        Err(StoreError::Conflict) => Err(EvaluationError::AlreadyEvaluated.into()),
        Err(other) => Err(other.into()),
    }
}
