use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::balance::{pick_min_load, Candidate};
use super::domain::{Assignment, Evaluator, EvaluatorId, EvaluatorRole, Work, WorkId};
use super::eligibility::EligibilityFilter;

/// Assignment state computed by a successful planning pass. Applied to
/// the store as a single unit; nothing is persisted while planning runs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DistributionPlan {
    pub(crate) assignments: Vec<Assignment>,
    /// Rebuilt counter for every evaluator, assigned or not.
    pub(crate) workloads: BTreeMap<EvaluatorId, u32>,
}

/// A subarea the pre-check found impossible to staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubareaShortfall {
    pub subarea: String,
    pub missing: EvaluatorRole,
}

impl fmt::Display for SubareaShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subarea \"{}\" has no available {} evaluators",
            self.subarea, self.missing
        )
    }
}

/// Structured failures raised while planning or committing a distribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistributionError {
    #[error("works have already been distributed; reset the distribution first")]
    AlreadyDistributed,
    #[error("no works are registered for distribution")]
    NoWorks,
    #[error("at least one {0} evaluator must be registered")]
    MissingRole(EvaluatorRole),
    #[error("distribution is infeasible: {}", format_shortfalls(.0))]
    Infeasible(Vec<SubareaShortfall>),
    #[error("no eligible {role} evaluator for work \"{title}\" (area: {area}, subarea: {subarea})")]
    NoEligibleForWork {
        role: EvaluatorRole,
        title: String,
        area: String,
        subarea: String,
    },
}

fn format_shortfalls(shortfalls: &[SubareaShortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// True when the evaluator advises any work in the given subarea.
fn conflicts_with_subarea(works: &[Work], evaluator: &Evaluator, subarea: &str) -> bool {
    works
        .iter()
        .any(|work| work.advisor == evaluator.name && work.subarea == subarea)
}

/// Subarea-level staffing pre-check, reporting every shortfall at once so
/// an administrator can fix staffing in a single pass.
///
/// Pure over its inputs: the same works and evaluators always yield the
/// same shortfall list. Expertise is checked against a representative
/// work per subarea; the per-work pass re-validates exactly.
pub(crate) fn feasibility_shortfalls(
    works: &[Work],
    pedagogical: &[&Evaluator],
    technical: &[&Evaluator],
) -> Vec<SubareaShortfall> {
    let mut representatives: Vec<&Work> = Vec::new();
    let mut seen = BTreeSet::new();
    for work in works {
        if seen.insert(work.subarea.as_str()) {
            representatives.push(work);
        }
    }

    let mut shortfalls = Vec::new();
    for representative in representatives {
        let subarea = representative.subarea.as_str();
        let available_pedagogical = pedagogical
            .iter()
            .filter(|evaluator| !conflicts_with_subarea(works, evaluator, subarea))
            .count();
        let available_technical = technical
            .iter()
            .filter(|evaluator| {
                !conflicts_with_subarea(works, evaluator, subarea)
                    && evaluator.area == representative.area
            })
            .count();

        if available_pedagogical == 0 {
            shortfalls.push(SubareaShortfall {
                subarea: subarea.to_string(),
                missing: EvaluatorRole::Pedagogical,
            });
        } else if available_technical == 0 {
            shortfalls.push(SubareaShortfall {
                subarea: subarea.to_string(),
                missing: EvaluatorRole::Technical,
            });
        }
    }
    shortfalls
}

/// Compute the full evaluator-to-work mapping for one distribution run.
///
/// Works are processed in store order. Each receives exactly one
/// pedagogical evaluator and one or two technical evaluators with
/// matching expertise, drawn preferentially from those with a declared
/// interest in the work's subarea, always favoring the least loaded.
pub(crate) fn plan_distribution<R: Rng + ?Sized>(
    rng: &mut R,
    works: &[Work],
    evaluators: &[Evaluator],
) -> Result<DistributionPlan, DistributionError> {
    if works.is_empty() {
        return Err(DistributionError::NoWorks);
    }

    let pedagogical: Vec<&Evaluator> = evaluators
        .iter()
        .filter(|evaluator| evaluator.role == EvaluatorRole::Pedagogical)
        .collect();
    let technical: Vec<&Evaluator> = evaluators
        .iter()
        .filter(|evaluator| evaluator.role == EvaluatorRole::Technical)
        .collect();

    if pedagogical.is_empty() {
        return Err(DistributionError::MissingRole(EvaluatorRole::Pedagogical));
    }
    if technical.is_empty() {
        return Err(DistributionError::MissingRole(EvaluatorRole::Technical));
    }

    let shortfalls = feasibility_shortfalls(works, &pedagogical, &technical);
    if !shortfalls.is_empty() {
        return Err(DistributionError::Infeasible(shortfalls));
    }

    let filter = EligibilityFilter::new(works);
    let mut workloads: BTreeMap<EvaluatorId, u32> = evaluators
        .iter()
        .map(|evaluator| (evaluator.id.clone(), 0))
        .collect();
    let mut assignments: Vec<Assignment> = Vec::new();

    for work in works {
        let eligible_pedagogical: Vec<&Evaluator> = pedagogical
            .iter()
            .copied()
            .filter(|evaluator| filter.can_evaluate(evaluator, work))
            .collect();
        // Should not occur once the pre-check passed, but eligibility is
        // per-work while the pre-check is per-subarea.
        if eligible_pedagogical.is_empty() {
            return Err(no_eligible(EvaluatorRole::Pedagogical, work));
        }
        for id in pick_min_load(rng, &candidates(&eligible_pedagogical, &workloads), 1) {
            record(&mut assignments, &mut workloads, &work.id, id);
        }

        let eligible_technical: Vec<&Evaluator> = technical
            .iter()
            .copied()
            .filter(|evaluator| {
                filter.can_evaluate(evaluator, work) && filter.has_expertise(evaluator, work)
            })
            .collect();
        if eligible_technical.is_empty() {
            return Err(no_eligible(EvaluatorRole::Technical, work));
        }

        let slots: usize = rng.random_range(1..=2);
        let (interested, remaining): (Vec<&Evaluator>, Vec<&Evaluator>) = eligible_technical
            .iter()
            .copied()
            .partition(|evaluator| filter.has_subarea_interest(evaluator, work));

        let mut chosen: Vec<EvaluatorId> = Vec::with_capacity(slots);
        for tier in [interested, remaining] {
            if chosen.len() == slots {
                break;
            }
            let pool: Vec<&Evaluator> = tier
                .into_iter()
                .filter(|evaluator| !chosen.contains(&evaluator.id))
                .collect();
            chosen.extend(pick_min_load(
                rng,
                &candidates(&pool, &workloads),
                slots - chosen.len(),
            ));
        }
        for id in chosen {
            record(&mut assignments, &mut workloads, &work.id, id);
        }
    }

    Ok(DistributionPlan {
        assignments,
        workloads,
    })
}

fn candidates(pool: &[&Evaluator], workloads: &BTreeMap<EvaluatorId, u32>) -> Vec<Candidate> {
    pool.iter()
        .map(|evaluator| Candidate {
            id: evaluator.id.clone(),
            workload: workloads.get(&evaluator.id).copied().unwrap_or(0),
        })
        .collect()
}

fn record(
    assignments: &mut Vec<Assignment>,
    workloads: &mut BTreeMap<EvaluatorId, u32>,
    work_id: &WorkId,
    evaluator_id: EvaluatorId,
) {
    if let Some(load) = workloads.get_mut(&evaluator_id) {
        *load += 1;
    }
    assignments.push(Assignment {
        work_id: work_id.clone(),
        evaluator_id,
    });
}

fn no_eligible(role: EvaluatorRole, work: &Work) -> DistributionError {
    DistributionError::NoEligibleForWork {
        role,
        title: work.title.clone(),
        area: work.area.clone(),
        subarea: work.subarea.clone(),
    }
}
