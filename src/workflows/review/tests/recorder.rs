use super::common::sample_store;
use crate::workflows::review::domain::{
    Assignment, DistributionGuard, EvaluationMethod, EvaluatorId, WorkId,
};
use crate::workflows::review::memory::InMemoryReviewStore;
use crate::workflows::review::recorder::{record_evaluation, validate_criteria, EvaluationError};
use crate::workflows::review::repository::{DistributionCommit, ReviewStore};
use crate::workflows::review::service::ReviewServiceError;

fn store_with_assignment() -> InMemoryReviewStore {
    let store = sample_store();
    store
        .commit_distribution(DistributionCommit {
            assignments: vec![Assignment {
                work_id: WorkId("w1".to_string()),
                evaluator_id: EvaluatorId("t1".to_string()),
            }],
            workloads: vec![(EvaluatorId("t1".to_string()), 1)],
            guard: DistributionGuard::completed("tests"),
        })
        .expect("commit assignment");
    store
}

#[test]
fn valid_submission_is_persisted() {
    let store = store_with_assignment();
    let evaluator_id = EvaluatorId("t1".to_string());
    let work_id = WorkId("w1".to_string());

    let evaluation = record_evaluation(
        &store,
        &evaluator_id,
        &work_id,
        &[5, 4, 3, 2, 1],
        EvaluationMethod::Online,
    )
    .expect("submission succeeds");

    assert_eq!(evaluation.criteria, [5, 4, 3, 2, 1]);
    assert_eq!(evaluation.total_score(), 15);
    assert!(store
        .find_evaluation(&evaluator_id, &work_id)
        .expect("lookup")
        .is_some());

    // Completion never touches the workload counter.
    let evaluator = store
        .find_evaluator(&evaluator_id)
        .expect("lookup")
        .expect("evaluator exists");
    assert_eq!(evaluator.workload, 1);
}

#[test]
fn out_of_range_criteria_are_rejected_with_their_position() {
    let store = store_with_assignment();
    let result = record_evaluation(
        &store,
        &EvaluatorId("t1".to_string()),
        &WorkId("w1".to_string()),
        &[5, 4, 6, 2, 1],
        EvaluationMethod::Online,
    );

    assert!(matches!(
        result,
        Err(ReviewServiceError::Evaluation(
            EvaluationError::CriterionOutOfRange { index: 3 }
        ))
    ));
}

#[test]
fn wrong_criteria_count_is_rejected() {
    assert!(matches!(
        validate_criteria(&[5, 4, 3]),
        Err(EvaluationError::MissingCriteria)
    ));
    assert!(matches!(
        validate_criteria(&[5, 4, 3, 2, 1, 1]),
        Err(EvaluationError::MissingCriteria)
    ));
    assert_eq!(validate_criteria(&[1, 2, 3, 4, 5]), Ok([1, 2, 3, 4, 5]));
}

#[test]
fn zero_and_negative_scores_are_out_of_range() {
    assert!(matches!(
        validate_criteria(&[0, 2, 3, 4, 5]),
        Err(EvaluationError::CriterionOutOfRange { index: 1 })
    ));
    assert!(matches!(
        validate_criteria(&[1, 2, 3, 4, -2]),
        Err(EvaluationError::CriterionOutOfRange { index: 5 })
    ));
}

#[test]
fn unknown_work_is_reported_before_the_evaluator_check() {
    let store = store_with_assignment();
    let result = record_evaluation(
        &store,
        &EvaluatorId("missing".to_string()),
        &WorkId("missing".to_string()),
        &[5, 4, 3, 2, 1],
        EvaluationMethod::Online,
    );

    assert!(matches!(
        result,
        Err(ReviewServiceError::Evaluation(EvaluationError::WorkNotFound))
    ));
}

#[test]
fn unknown_evaluator_is_rejected() {
    let store = store_with_assignment();
    let result = record_evaluation(
        &store,
        &EvaluatorId("missing".to_string()),
        &WorkId("w1".to_string()),
        &[5, 4, 3, 2, 1],
        EvaluationMethod::Online,
    );

    assert!(matches!(
        result,
        Err(ReviewServiceError::Evaluation(
            EvaluationError::EvaluatorNotFound
        ))
    ));
}

#[test]
fn unassigned_evaluator_is_not_authorized() {
    let store = store_with_assignment();
    let result = record_evaluation(
        &store,
        &EvaluatorId("t2".to_string()),
        &WorkId("w1".to_string()),
        &[5, 4, 3, 2, 1],
        EvaluationMethod::Online,
    );

    assert!(matches!(
        result,
        Err(ReviewServiceError::Evaluation(EvaluationError::NotAssigned))
    ));
}

#[test]
fn second_submission_for_the_same_pair_is_a_conflict() {
    let store = store_with_assignment();
    let evaluator_id = EvaluatorId("t1".to_string());
    let work_id = WorkId("w1".to_string());

    record_evaluation(
        &store,
        &evaluator_id,
        &work_id,
        &[5, 5, 5, 5, 5],
        EvaluationMethod::Online,
    )
    .expect("first submission succeeds");

    let second = record_evaluation(
        &store,
        &evaluator_id,
        &work_id,
        &[1, 1, 1, 1, 1],
        EvaluationMethod::ManualValidated,
    );
    assert!(matches!(
        second,
        Err(ReviewServiceError::Evaluation(
            EvaluationError::AlreadyEvaluated
        ))
    ));

    let persisted = store.evaluations_by_work(&work_id).expect("lookup");
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].criteria, [5, 5, 5, 5, 5]);
}
