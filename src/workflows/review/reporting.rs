use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{
    Assignment, Evaluation, EvaluationMethod, Evaluator, EvaluatorId, PresentationType, Work,
    WorkId,
};

/// Totals computed over the full work set, independent of pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_works: usize,
    pub total_evaluations: usize,
    pub total_expected_evaluations: usize,
    pub overall_progress: f64,
}

/// Evaluator still owing an evaluation for a work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEvaluator {
    pub id: EvaluatorId,
    pub name: String,
    pub registration: String,
}

/// Per-work completion snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkProgress {
    pub work_id: WorkId,
    pub title: String,
    pub area: String,
    pub subarea: String,
    pub total_evaluators: usize,
    pub completed_evaluations: usize,
    pub pending_evaluations: usize,
    pub progress_percentage: f64,
    pub pending_evaluators: Vec<PendingEvaluator>,
}

/// Offset pagination block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub pages: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_num: Option<usize>,
    pub next_num: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub overall_stats: OverallStats,
    pub works_progress: Vec<WorkProgress>,
    pub pagination: PageInfo,
}

/// Ranked works within one exhibition area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPodium {
    pub area: String,
    pub total_works: usize,
    pub evaluated_works: usize,
    pub podium: Vec<PodiumPlace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodiumPlace {
    pub work_id: WorkId,
    pub title: String,
    pub authors: String,
    pub advisor: String,
    pub presentation: PresentationType,
    pub subarea: String,
    pub evaluations_count: usize,
    pub average_score: f64,
    pub total_score: u32,
}

/// Cross-cutting evaluation totals for administrator dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStatistics {
    pub total_evaluations: usize,
    pub total_works: usize,
    pub total_evaluators: usize,
    pub active_evaluators: usize,
    pub online_evaluations: usize,
    pub manual_validated_evaluations: usize,
    pub ai_processed_evaluations: usize,
    pub completion_rate: f64,
}

/// Evaluator detail shown in the distribution listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedEvaluatorView {
    pub id: EvaluatorId,
    pub name: String,
    pub registration: String,
    pub area: String,
    pub subareas: Vec<String>,
    pub workload: u32,
}

/// One work with its assigned evaluation panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDistributionView {
    pub work_id: WorkId,
    pub title: String,
    pub authors: String,
    pub advisor: String,
    pub presentation: PresentationType,
    pub area: String,
    pub subarea: String,
    pub evaluators: Vec<AssignedEvaluatorView>,
    pub evaluators_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionOverview {
    pub distributions: Vec<WorkDistributionView>,
    pub pagination: PageInfo,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> (Vec<T>, PageInfo) {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();
    let pages = total.div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page);
    let end = start.saturating_add(per_page).min(total);

    let page_items: Vec<T> = if start < total {
        items.into_iter().skip(start).take(end - start).collect()
    } else {
        Vec::new()
    };

    let has_prev = page > 1;
    let has_next = end < total;
    let info = PageInfo {
        page,
        per_page,
        pages,
        total,
        has_prev,
        has_next,
        prev_num: has_prev.then(|| page - 1),
        next_num: has_next.then(|| page + 1),
    };
    (page_items, info)
}

/// Per-work and overall completion derived from the current assignment
/// graph and evaluation set. Read-only and idempotent; the overall block
/// always covers the full work set no matter which page is requested.
pub(crate) fn evaluation_progress(
    works: &[Work],
    evaluators: &[Evaluator],
    assignments: &[Assignment],
    evaluations: &[Evaluation],
    page: usize,
    per_page: usize,
) -> ProgressReport {
    let mut all_progress = Vec::with_capacity(works.len());
    let mut total_expected = 0;

    for work in works {
        let assigned: Vec<&EvaluatorId> = assignments
            .iter()
            .filter(|link| link.work_id == work.id)
            .map(|link| &link.evaluator_id)
            .collect();
        let work_evaluations: Vec<&Evaluation> = evaluations
            .iter()
            .filter(|evaluation| evaluation.work_id == work.id)
            .collect();
        let completed: HashSet<&EvaluatorId> = work_evaluations
            .iter()
            .map(|evaluation| &evaluation.evaluator_id)
            .collect();

        let pending_evaluators: Vec<PendingEvaluator> = assigned
            .iter()
            .filter(|id| !completed.contains(*id))
            .filter_map(|id| evaluators.iter().find(|evaluator| &&evaluator.id == id))
            .map(|evaluator| PendingEvaluator {
                id: evaluator.id.clone(),
                name: evaluator.name.clone(),
                registration: evaluator.registration.clone(),
            })
            .collect();

        let progress_percentage = if assigned.is_empty() {
            0.0
        } else {
            round1(work_evaluations.len() as f64 / assigned.len() as f64 * 100.0)
        };

        total_expected += assigned.len();
        all_progress.push(WorkProgress {
            work_id: work.id.clone(),
            title: work.title.clone(),
            area: work.area.clone(),
            subarea: work.subarea.clone(),
            total_evaluators: assigned.len(),
            completed_evaluations: work_evaluations.len(),
            pending_evaluations: assigned.len().saturating_sub(work_evaluations.len()),
            progress_percentage,
            pending_evaluators,
        });
    }

    let overall_progress = if total_expected == 0 {
        0.0
    } else {
        round1(evaluations.len() as f64 / total_expected as f64 * 100.0)
    };
    let overall_stats = OverallStats {
        total_works: works.len(),
        total_evaluations: evaluations.len(),
        total_expected_evaluations: total_expected,
        overall_progress,
    };

    let (works_progress, pagination) = paginate(all_progress, page, per_page);
    ProgressReport {
        overall_stats,
        works_progress,
        pagination,
    }
}

/// Top-3 ranking per area by average evaluation score.
///
/// Average = sum of all criteria over all of a work's evaluations divided
/// by (evaluation count x 5), rounded to 2 decimals. Works without
/// evaluations are counted but never ranked. Equal averages keep store
/// order (stable sort).
pub(crate) fn works_podium(
    works: &[Work],
    evaluations: &[Evaluation],
) -> BTreeMap<String, AreaPodium> {
    let mut areas: Vec<&str> = Vec::new();
    for work in works {
        if !areas.contains(&work.area.as_str()) {
            areas.push(work.area.as_str());
        }
    }

    let mut podium = BTreeMap::new();
    for area in areas {
        let area_works: Vec<&Work> = works.iter().filter(|work| work.area == area).collect();
        let mut scored: Vec<PodiumPlace> = Vec::new();
        for work in &area_works {
            let work_evaluations: Vec<&Evaluation> = evaluations
                .iter()
                .filter(|evaluation| evaluation.work_id == work.id)
                .collect();
            if work_evaluations.is_empty() {
                continue;
            }
            let total_score: u32 = work_evaluations
                .iter()
                .map(|evaluation| evaluation.total_score())
                .sum();
            let average_score =
                round2(f64::from(total_score) / (work_evaluations.len() * 5) as f64);
            scored.push(PodiumPlace {
                work_id: work.id.clone(),
                title: work.title.clone(),
                authors: work.authors.clone(),
                advisor: work.advisor.clone(),
                presentation: work.presentation,
                subarea: work.subarea.clone(),
                evaluations_count: work_evaluations.len(),
                average_score,
                total_score,
            });
        }

        scored.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
        let evaluated_works = scored.len();
        scored.truncate(3);

        podium.insert(
            area.to_string(),
            AreaPodium {
                area: area.to_string(),
                total_works: area_works.len(),
                evaluated_works,
                podium: scored,
            },
        );
    }
    podium
}

/// Exhibition-wide submission counters.
pub(crate) fn evaluation_statistics(
    works: &[Work],
    evaluators: &[Evaluator],
    evaluations: &[Evaluation],
) -> EvaluationStatistics {
    let active: HashSet<&EvaluatorId> = evaluations
        .iter()
        .map(|evaluation| &evaluation.evaluator_id)
        .collect();
    let by_method = |method: EvaluationMethod| {
        evaluations
            .iter()
            .filter(|evaluation| evaluation.method == method)
            .count()
    };
    let completion_rate = if evaluators.is_empty() {
        0.0
    } else {
        round1(active.len() as f64 / evaluators.len() as f64 * 100.0)
    };

    EvaluationStatistics {
        total_evaluations: evaluations.len(),
        total_works: works.len(),
        total_evaluators: evaluators.len(),
        active_evaluators: active.len(),
        online_evaluations: by_method(EvaluationMethod::Online),
        manual_validated_evaluations: by_method(EvaluationMethod::ManualValidated),
        ai_processed_evaluations: by_method(EvaluationMethod::AiProcessed),
        completion_rate,
    }
}

/// Paginated listing of how works were distributed across evaluators.
pub(crate) fn distribution_overview(
    works: &[Work],
    evaluators: &[Evaluator],
    assignments: &[Assignment],
    page: usize,
    per_page: usize,
) -> DistributionOverview {
    let all: Vec<WorkDistributionView> = works
        .iter()
        .map(|work| {
            let panel: Vec<AssignedEvaluatorView> = assignments
                .iter()
                .filter(|link| link.work_id == work.id)
                .filter_map(|link| {
                    evaluators
                        .iter()
                        .find(|evaluator| evaluator.id == link.evaluator_id)
                })
                .map(|evaluator| AssignedEvaluatorView {
                    id: evaluator.id.clone(),
                    name: evaluator.name.clone(),
                    registration: evaluator.registration.clone(),
                    area: evaluator.area.clone(),
                    subareas: evaluator.subareas.iter().cloned().collect(),
                    workload: evaluator.workload,
                })
                .collect();
            WorkDistributionView {
                work_id: work.id.clone(),
                title: work.title.clone(),
                authors: work.authors.clone(),
                advisor: work.advisor.clone(),
                presentation: work.presentation,
                area: work.area.clone(),
                subarea: work.subarea.clone(),
                evaluators_count: panel.len(),
                evaluators: panel,
            }
        })
        .collect();

    let (distributions, pagination) = paginate(all, page, per_page);
    DistributionOverview {
        distributions,
        pagination,
    }
}
