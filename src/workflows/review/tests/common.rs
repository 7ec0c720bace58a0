use std::sync::Arc;

use axum::response::Response;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use crate::workflows::review::domain::{
    Evaluator, EvaluatorId, PresentationType, Work, WorkId,
};
use crate::workflows::review::memory::InMemoryReviewStore;
use crate::workflows::review::router::review_router;
use crate::workflows::review::service::ReviewService;

pub(super) fn work(id: &str, title: &str, advisor: &str, area: &str, subarea: &str) -> Work {
    Work {
        id: WorkId(id.to_string()),
        title: title.to_string(),
        authors: format!("Equipe {id}"),
        advisor: advisor.to_string(),
        presentation: PresentationType::Poster,
        area: area.to_string(),
        subarea: subarea.to_string(),
    }
}

pub(super) fn pedagogical(id: &str, name: &str) -> Evaluator {
    Evaluator::new(
        EvaluatorId(id.to_string()),
        name,
        format!("reg-{id}"),
        "Pedagógico",
        Vec::new(),
    )
}

pub(super) fn technical(id: &str, name: &str, area: &str, subareas: &[&str]) -> Evaluator {
    Evaluator::new(
        EvaluatorId(id.to_string()),
        name,
        format!("reg-{id}"),
        area,
        subareas.iter().map(|subarea| subarea.to_string()),
    )
}

pub(super) fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// One pedagogical evaluator, two technical evaluators in "Computação",
/// and one work in "Computação"/"IA" advised by a third person.
pub(super) fn sample_store() -> InMemoryReviewStore {
    let store = InMemoryReviewStore::default();
    for evaluator in [
        pedagogical("p1", "Paula Freire"),
        technical("t1", "Alan Turing", "Computação", &["IA"]),
        technical("t2", "Grace Hopper", "Computação", &[]),
    ] {
        store.insert_evaluator(evaluator).expect("seed evaluator");
    }
    store
        .insert_work(work(
            "w1",
            "Redes neurais na escola",
            "Carlos Chagas",
            "Computação",
            "IA",
        ))
        .expect("seed work");
    store
}

pub(super) fn service_over(
    store: &InMemoryReviewStore,
) -> Arc<ReviewService<InMemoryReviewStore>> {
    Arc::new(ReviewService::new(Arc::new(store.clone())))
}

pub(super) fn build_service() -> (Arc<ReviewService<InMemoryReviewStore>>, InMemoryReviewStore) {
    let store = sample_store();
    (service_over(&store), store)
}

pub(super) fn router_over(store: &InMemoryReviewStore) -> axum::Router {
    review_router(service_over(store))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
