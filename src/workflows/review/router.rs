use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::distribution::DistributionError;
use super::domain::{EvaluationMethod, EvaluatorId, WorkId};
use super::recorder::EvaluationError;
use super::repository::ReviewStore;
use super::service::{ReviewService, ReviewServiceError};

const DEFAULT_PER_PAGE: usize = 20;
const MAX_PER_PAGE: usize = 100;

/// Router builder exposing the review endpoints. Marshaling only; every
/// decision lives in the service.
pub fn review_router<S>(service: Arc<ReviewService<S>>) -> Router
where
    S: ReviewStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/review/distribution",
            post(trigger_distribution_handler::<S>)
                .get(distribution_status_handler::<S>)
                .delete(reset_distribution_handler::<S>),
        )
        .route(
            "/api/v1/review/distribution/works",
            get(distribution_works_handler::<S>),
        )
        .route(
            "/api/v1/review/evaluations",
            post(submit_evaluation_handler::<S>),
        )
        .route(
            "/api/v1/review/evaluations/evaluator/:evaluator_id",
            get(evaluations_by_evaluator_handler::<S>),
        )
        .route(
            "/api/v1/review/evaluations/work/:work_id",
            get(evaluations_by_work_handler::<S>),
        )
        .route(
            "/api/v1/review/works/evaluator/:evaluator_id",
            get(works_for_evaluator_handler::<S>),
        )
        .route("/api/v1/review/progress", get(progress_handler::<S>))
        .route("/api/v1/review/podium", get(podium_handler::<S>))
        .route("/api/v1/review/statistics", get(statistics_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TriggerDistributionRequest {
    pub(crate) triggered_by: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitEvaluationRequest {
    pub(crate) evaluator_id: String,
    pub(crate) work_id: String,
    pub(crate) criteria: Vec<i64>,
    /// Defaults to `online`; administrators confirming transcribed sheets
    /// pass `manual_validated` or `ai_processed`.
    #[serde(default)]
    pub(crate) method: Option<EvaluationMethod>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    per_page: Option<usize>,
}

impl PageQuery {
    fn resolve(&self) -> (usize, usize) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

pub(crate) async fn trigger_distribution_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    axum::Json(request): axum::Json<TriggerDistributionRequest>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.trigger_distribution(&request.triggered_by) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(ReviewServiceError::Distribution(DistributionError::AlreadyDistributed)) => {
            let payload = json!({
                "error": DistributionError::AlreadyDistributed.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Distribution(DistributionError::Infeasible(shortfalls))) => {
            let payload = json!({
                "error": "not enough eligible evaluators for one or more subareas",
                "subareas": shortfalls,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Distribution(other)) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error_response(other),
    }
}

pub(crate) async fn distribution_status_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.distribution_status() {
        Ok(guard) => (StatusCode::OK, axum::Json(guard)).into_response(),
        Err(error) => internal_error_response(error),
    }
}

pub(crate) async fn reset_distribution_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.reset_distribution() {
        Ok(()) => {
            let payload = json!({ "status": "reset" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error_response(error),
    }
}

pub(crate) async fn distribution_works_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Query(query): Query<PageQuery>,
) -> Response
where
    S: ReviewStore + 'static,
{
    let (page, per_page) = query.resolve();
    match service.distribution_overview(page, per_page) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => internal_error_response(error),
    }
}

pub(crate) async fn submit_evaluation_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    axum::Json(request): axum::Json<SubmitEvaluationRequest>,
) -> Response
where
    S: ReviewStore + 'static,
{
    let evaluator_id = EvaluatorId(request.evaluator_id);
    let work_id = WorkId(request.work_id);
    let method = request.method.unwrap_or(EvaluationMethod::Online);
    match service.submit_evaluation(&evaluator_id, &work_id, &request.criteria, method) {
        Ok(evaluation) => (StatusCode::CREATED, axum::Json(evaluation)).into_response(),
        Err(error) => evaluation_error_response(error),
    }
}

pub(crate) async fn evaluations_by_evaluator_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Path(evaluator_id): Path<String>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.evaluations_by_evaluator(&EvaluatorId(evaluator_id)) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => evaluation_error_response(error),
    }
}

pub(crate) async fn evaluations_by_work_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Path(work_id): Path<String>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.evaluations_by_work(&WorkId(work_id)) {
        Ok(evaluations) => (StatusCode::OK, axum::Json(evaluations)).into_response(),
        Err(error) => evaluation_error_response(error),
    }
}

pub(crate) async fn works_for_evaluator_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Path(evaluator_id): Path<String>,
) -> Response
where
    S: ReviewStore + 'static,
{
    match service.works_for_evaluator(&EvaluatorId(evaluator_id)) {
        Ok(works) => (StatusCode::OK, axum::Json(works)).into_response(),
        Err(error) => evaluation_error_response(error),
    }
}

pub(crate) async fn progress_handler<S>(
    State(service): State<Arc<ReviewService<S>>>,
    Query(query): Query<PageQuery>,
) -> Response
where
    S: ReviewStore + 'static,
{
    let (page, per_page) = query.resolve();
    match service.progress(page, per_page) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => internal_error_response(error),
    }
}

pub(crate) async fn podium_handler<S>(State(service): State<Arc<ReviewService<S>>>) -> Response
where
    S: ReviewStore + 'static,
{
    match service.podium() {
        Ok(podium) => (StatusCode::OK, axum::Json(podium)).into_response(),
        Err(error) => internal_error_response(error),
    }
}

pub(crate) async fn statistics_handler<S>(State(service): State<Arc<ReviewService<S>>>) -> Response
where
    S: ReviewStore + 'static,
{
    match service.statistics() {
        Ok(statistics) => (StatusCode::OK, axum::Json(statistics)).into_response(),
        Err(error) => internal_error_response(error),
    }
}

fn evaluation_error_response(error: ReviewServiceError) -> Response {
    let status = match &error {
        ReviewServiceError::Evaluation(EvaluationError::MissingCriteria)
        | ReviewServiceError::Evaluation(EvaluationError::CriterionOutOfRange { .. }) => {
            StatusCode::BAD_REQUEST
        }
        ReviewServiceError::Evaluation(EvaluationError::WorkNotFound)
        | ReviewServiceError::Evaluation(EvaluationError::EvaluatorNotFound) => {
            StatusCode::NOT_FOUND
        }
        ReviewServiceError::Evaluation(EvaluationError::NotAssigned) => StatusCode::FORBIDDEN,
        ReviewServiceError::Evaluation(EvaluationError::AlreadyEvaluated) => StatusCode::CONFLICT,
        _ => return internal_error_response(error),
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn internal_error_response(error: ReviewServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
