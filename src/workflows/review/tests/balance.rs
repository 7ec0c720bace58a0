use std::collections::BTreeSet;

use super::common::rng;
use crate::workflows::review::balance::{pick_min_load, Candidate};
use crate::workflows::review::domain::EvaluatorId;

fn candidate(id: &str, workload: u32) -> Candidate {
    Candidate {
        id: EvaluatorId(id.to_string()),
        workload,
    }
}

#[test]
fn prefers_the_least_loaded_candidate() {
    let pool = [candidate("a", 2), candidate("b", 0), candidate("c", 1)];
    let picked = pick_min_load(&mut rng(1), &pool, 1);
    assert_eq!(picked, vec![EvaluatorId("b".to_string())]);
}

#[test]
fn widens_to_heavier_tiers_when_the_minimum_runs_out() {
    let pool = [candidate("a", 0), candidate("b", 1), candidate("c", 2)];
    let picked = pick_min_load(&mut rng(2), &pool, 2);
    assert_eq!(
        picked,
        vec![EvaluatorId("a".to_string()), EvaluatorId("b".to_string())]
    );
}

#[test]
fn never_returns_more_than_the_pool_holds() {
    let pool = [candidate("a", 0), candidate("b", 0)];
    let picked = pick_min_load(&mut rng(3), &pool, 5);
    assert_eq!(picked.len(), 2);
    assert_ne!(picked[0], picked[1]);
}

#[test]
fn returns_nothing_for_an_empty_pool() {
    let picked = pick_min_load(&mut rng(4), &[], 3);
    assert!(picked.is_empty());
}

#[test]
fn ties_are_not_always_broken_the_same_way() {
    let pool = [candidate("a", 0), candidate("b", 0), candidate("c", 0)];
    let mut seen = BTreeSet::new();
    for seed in 0..32 {
        let picked = pick_min_load(&mut rng(seed), &pool, 1);
        seen.insert(picked[0].0.clone());
    }
    assert!(seen.len() > 1, "equal workloads should randomize the pick");
}
