use std::sync::{Arc, Mutex};

use super::domain::{
    Assignment, DistributionGuard, Evaluation, Evaluator, EvaluatorId, Work, WorkId,
};
use super::repository::{DistributionCommit, ReviewStore, StoreError};

/// In-memory store backing the demo server and tests.
///
/// Entities live in plain vectors so load order is insertion order, which
/// is the stable iteration order the distribution pass and the podium
/// tie-breaks observe.
#[derive(Default, Clone)]
pub struct InMemoryReviewStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Default)]
struct StoreState {
    works: Vec<Work>,
    evaluators: Vec<Evaluator>,
    assignments: Vec<Assignment>,
    evaluations: Vec<Evaluation>,
    guard: DistributionGuard,
}

impl InMemoryReviewStore {
    /// Register a work on behalf of the external registration/import
    /// collaborators.
    pub fn insert_work(&self, work: Work) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if state.works.iter().any(|existing| existing.id == work.id) {
            return Err(StoreError::Conflict);
        }
        state.works.push(work);
        Ok(())
    }

    /// Register an evaluator. The external credential identifier is
    /// unique alongside the id.
    pub fn insert_evaluator(&self, evaluator: Evaluator) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if state
            .evaluators
            .iter()
            .any(|existing| existing.id == evaluator.id || existing.registration == evaluator.registration)
        {
            return Err(StoreError::Conflict);
        }
        state.evaluators.push(evaluator);
        Ok(())
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn load_works(&self) -> Result<Vec<Work>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.works.clone())
    }

    fn load_evaluators(&self) -> Result<Vec<Evaluator>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.evaluators.clone())
    }

    fn load_assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.assignments.clone())
    }

    fn load_evaluations(&self) -> Result<Vec<Evaluation>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.evaluations.clone())
    }

    fn find_work(&self, id: &WorkId) -> Result<Option<Work>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.works.iter().find(|work| &work.id == id).cloned())
    }

    fn find_evaluator(&self, id: &EvaluatorId) -> Result<Option<Evaluator>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .evaluators
            .iter()
            .find(|evaluator| &evaluator.id == id)
            .cloned())
    }

    fn find_evaluation(
        &self,
        evaluator_id: &EvaluatorId,
        work_id: &WorkId,
    ) -> Result<Option<Evaluation>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .evaluations
            .iter()
            .find(|evaluation| {
                &evaluation.evaluator_id == evaluator_id && &evaluation.work_id == work_id
            })
            .cloned())
    }

    fn is_assigned(
        &self,
        evaluator_id: &EvaluatorId,
        work_id: &WorkId,
    ) -> Result<bool, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .assignments
            .iter()
            .any(|link| &link.evaluator_id == evaluator_id && &link.work_id == work_id))
    }

    fn evaluations_by_evaluator(
        &self,
        evaluator_id: &EvaluatorId,
    ) -> Result<Vec<Evaluation>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .evaluations
            .iter()
            .filter(|evaluation| &evaluation.evaluator_id == evaluator_id)
            .cloned()
            .collect())
    }

    fn evaluations_by_work(&self, work_id: &WorkId) -> Result<Vec<Evaluation>, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state
            .evaluations
            .iter()
            .filter(|evaluation| &evaluation.work_id == work_id)
            .cloned()
            .collect())
    }

    fn guard(&self) -> Result<DistributionGuard, StoreError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.guard.clone())
    }

    fn insert_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if state.evaluations.iter().any(|existing| {
            existing.evaluator_id == evaluation.evaluator_id && existing.work_id == evaluation.work_id
        }) {
            return Err(StoreError::Conflict);
        }
        state.evaluations.push(evaluation.clone());
        Ok(evaluation)
    }

    fn commit_distribution(&self, commit: DistributionCommit) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        if state.guard.distributed {
            return Err(StoreError::Conflict);
        }
        state.assignments = commit.assignments;
        for (id, workload) in &commit.workloads {
            if let Some(evaluator) = state.evaluators.iter_mut().find(|e| &e.id == id) {
                evaluator.workload = *workload;
            }
        }
        state.guard = commit.guard;
        Ok(())
    }

    fn reset_distribution(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.guard = DistributionGuard::default();
        state.assignments.clear();
        state.evaluations.clear();
        for evaluator in &mut state.evaluators {
            evaluator.workload = 0;
        }
        Ok(())
    }
}
