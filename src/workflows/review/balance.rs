use rand::seq::SliceRandom;
use rand::Rng;

use super::domain::EvaluatorId;

/// Pool entry consulted by the balancer: an evaluator and its current
/// workload counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) id: EvaluatorId,
    pub(crate) workload: u32,
}

/// Pick `min(k, pool.len())` distinct evaluators, strictly favoring lower
/// workloads and choosing uniformly at random among ties.
///
/// The pool is walked tier by tier in ascending workload order; each tier
/// is shuffled before being drained, so equally loaded evaluators are
/// equally likely on every run.
pub(crate) fn pick_min_load<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[Candidate],
    k: usize,
) -> Vec<EvaluatorId> {
    let mut ordered: Vec<&Candidate> = pool.iter().collect();
    ordered.sort_by_key(|candidate| candidate.workload);

    let mut picked = Vec::with_capacity(k.min(pool.len()));
    let mut index = 0;
    while index < ordered.len() && picked.len() < k {
        let tier_load = ordered[index].workload;
        let mut tier: Vec<&Candidate> = Vec::new();
        while index < ordered.len() && ordered[index].workload == tier_load {
            tier.push(ordered[index]);
            index += 1;
        }
        tier.shuffle(rng);
        for candidate in tier {
            if picked.len() == k {
                break;
            }
            picked.push(candidate.id.clone());
        }
    }
    picked
}
