use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::distribution::{plan_distribution, DistributionError};
use super::domain::{
    DistributionGuard, Evaluation, EvaluationId, EvaluationMethod, Evaluator, EvaluatorId,
    EvaluatorRole, Work, WorkId,
};
use super::recorder::{record_evaluation, EvaluationError};
use super::reporting::{
    distribution_overview, evaluation_progress, evaluation_statistics, works_podium, AreaPodium,
    DistributionOverview, EvaluationStatistics, ProgressReport,
};
use super::repository::{DistributionCommit, ReviewStore, StoreError};

/// Receipt returned to the administrator after a successful distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub total_works: usize,
    pub total_assignments: usize,
    pub pedagogical_evaluators: usize,
    pub technical_evaluators: usize,
    pub distributed_by: String,
    pub distributed_at: DateTime<Utc>,
}

/// A recorded evaluation joined with its work title for evaluator-facing
/// listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationView {
    pub id: EvaluationId,
    pub work_id: WorkId,
    pub work_title: String,
    pub criteria: [u8; 5],
    pub total_score: u32,
    pub method: EvaluationMethod,
}

/// Facade composing the distribution engine, evaluation recorder, and
/// aggregation queries over one entity store.
pub struct ReviewService<S> {
    store: Arc<S>,
}

impl<S> ReviewService<S>
where
    S: ReviewStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Run the one-shot distribution with the production random source.
    pub fn trigger_distribution(
        &self,
        triggered_by: &str,
    ) -> Result<DistributionSummary, ReviewServiceError> {
        self.trigger_distribution_with(&mut rand::rng(), triggered_by)
    }

    /// Run the distribution with an injected random source so outcomes can
    /// be pinned under test.
    ///
    /// Planning happens entirely in memory; the store only sees the commit,
    /// so a failed plan leaves persisted state untouched. The store
    /// re-checks the guard inside its own critical section, closing the
    /// race between two concurrent triggers.
    pub fn trigger_distribution_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        triggered_by: &str,
    ) -> Result<DistributionSummary, ReviewServiceError> {
        if self.store.guard()?.distributed {
            return Err(DistributionError::AlreadyDistributed.into());
        }

        let works = self.store.load_works()?;
        let evaluators = self.store.load_evaluators()?;
        let plan = plan_distribution(rng, &works, &evaluators)?;

        let guard = DistributionGuard::completed(triggered_by);
        let distributed_at = guard.distributed_at.unwrap_or_else(Utc::now);
        let total_assignments = plan.assignments.len();
        let commit = DistributionCommit {
            assignments: plan.assignments,
            workloads: plan.workloads.into_iter().collect(),
            guard,
        };

        match self.store.commit_distribution(commit) {
            Ok(()) => {}
            Err(StoreError::Conflict) => {
                return Err(DistributionError::AlreadyDistributed.into());
            }
            Err(other) => return Err(other.into()),
        }

        info!(
            total_works = works.len(),
            total_assignments,
            triggered_by,
            "distribution committed"
        );

        Ok(DistributionSummary {
            total_works: works.len(),
            total_assignments,
            pedagogical_evaluators: count_role(&evaluators, EvaluatorRole::Pedagogical),
            technical_evaluators: count_role(&evaluators, EvaluatorRole::Technical),
            distributed_by: triggered_by.to_string(),
            distributed_at,
        })
    }

    pub fn distribution_status(&self) -> Result<DistributionGuard, ReviewServiceError> {
        Ok(self.store.guard()?)
    }

    /// Clear the guard, all evaluations, all assignment links, and every
    /// workload counter. The only supported undo for a distribution.
    pub fn reset_distribution(&self) -> Result<(), ReviewServiceError> {
        self.store.reset_distribution()?;
        info!("distribution reset");
        Ok(())
    }

    pub fn submit_evaluation(
        &self,
        evaluator_id: &EvaluatorId,
        work_id: &WorkId,
        criteria: &[i64],
        method: EvaluationMethod,
    ) -> Result<Evaluation, ReviewServiceError> {
        record_evaluation(self.store.as_ref(), evaluator_id, work_id, criteria, method)
    }

    pub fn evaluations_by_evaluator(
        &self,
        evaluator_id: &EvaluatorId,
    ) -> Result<Vec<EvaluationView>, ReviewServiceError> {
        if self.store.find_evaluator(evaluator_id)?.is_none() {
            return Err(EvaluationError::EvaluatorNotFound.into());
        }
        let works = self.store.load_works()?;
        let evaluations = self.store.evaluations_by_evaluator(evaluator_id)?;
        Ok(evaluations
            .into_iter()
            .map(|evaluation| {
                let work_title = works
                    .iter()
                    .find(|work| work.id == evaluation.work_id)
                    .map(|work| work.title.clone())
                    .unwrap_or_default();
                EvaluationView {
                    total_score: evaluation.total_score(),
                    id: evaluation.id,
                    work_id: evaluation.work_id,
                    work_title,
                    criteria: evaluation.criteria,
                    method: evaluation.method,
                }
            })
            .collect())
    }

    pub fn evaluations_by_work(
        &self,
        work_id: &WorkId,
    ) -> Result<Vec<Evaluation>, ReviewServiceError> {
        if self.store.find_work(work_id)?.is_none() {
            return Err(EvaluationError::WorkNotFound.into());
        }
        Ok(self.store.evaluations_by_work(work_id)?)
    }

    /// Works assigned to one evaluator through the current link set.
    pub fn works_for_evaluator(
        &self,
        evaluator_id: &EvaluatorId,
    ) -> Result<Vec<Work>, ReviewServiceError> {
        if self.store.find_evaluator(evaluator_id)?.is_none() {
            return Err(EvaluationError::EvaluatorNotFound.into());
        }
        let assignments = self.store.load_assignments()?;
        let works = self.store.load_works()?;
        Ok(works
            .into_iter()
            .filter(|work| {
                assignments
                    .iter()
                    .any(|link| &link.evaluator_id == evaluator_id && link.work_id == work.id)
            })
            .collect())
    }

    pub fn progress(
        &self,
        page: usize,
        per_page: usize,
    ) -> Result<ProgressReport, ReviewServiceError> {
        let works = self.store.load_works()?;
        let evaluators = self.store.load_evaluators()?;
        let assignments = self.store.load_assignments()?;
        let evaluations = self.store.load_evaluations()?;
        Ok(evaluation_progress(
            &works,
            &evaluators,
            &assignments,
            &evaluations,
            page,
            per_page,
        ))
    }

    pub fn podium(&self) -> Result<BTreeMap<String, AreaPodium>, ReviewServiceError> {
        let works = self.store.load_works()?;
        let evaluations = self.store.load_evaluations()?;
        Ok(works_podium(&works, &evaluations))
    }

    pub fn statistics(&self) -> Result<EvaluationStatistics, ReviewServiceError> {
        let works = self.store.load_works()?;
        let evaluators = self.store.load_evaluators()?;
        let evaluations = self.store.load_evaluations()?;
        Ok(evaluation_statistics(&works, &evaluators, &evaluations))
    }

    pub fn distribution_overview(
        &self,
        page: usize,
        per_page: usize,
    ) -> Result<DistributionOverview, ReviewServiceError> {
        let works = self.store.load_works()?;
        let evaluators = self.store.load_evaluators()?;
        let assignments = self.store.load_assignments()?;
        Ok(distribution_overview(
            &works,
            &evaluators,
            &assignments,
            page,
            per_page,
        ))
    }
}

fn count_role(evaluators: &[Evaluator], role: EvaluatorRole) -> usize {
    evaluators
        .iter()
        .filter(|evaluator| evaluator.role == role)
        .count()
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Distribution(#[from] DistributionError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
