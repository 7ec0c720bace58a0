use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tracing::info;

use expo_review::config::AppConfig;
use expo_review::error::AppError;
use expo_review::telemetry;
use expo_review::workflows::review::domain::{
    EvaluationMethod, Evaluator, EvaluatorId, PresentationType, Work, WorkId,
};
use expo_review::workflows::review::service::ReviewServiceError;
use expo_review::workflows::review::{review_router, InMemoryReviewStore, ReviewService};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Exhibition Review Coordinator",
    about = "Run the exhibition peer-review coordination service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Seed a sample exhibition, run a distribution, and print the results
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Administrator identity stamped on the distribution
    #[arg(long, default_value = "demo-admin")]
    admin: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(InMemoryReviewStore::default());
    let service = Arc::new(ReviewService::new(store));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(review_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "exhibition review coordinator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = InMemoryReviewStore::default();
    let service = ReviewService::new(Arc::new(store.clone()));

    seed_sample_exhibition(&store)?;

    println!("Exhibition review demo");

    let summary = service.trigger_distribution(&args.admin)?;
    println!(
        "\nDistribution committed by {} at {}",
        summary.distributed_by, summary.distributed_at
    );
    println!(
        "- {} works, {} assignment links",
        summary.total_works, summary.total_assignments
    );
    println!(
        "- evaluator pool: {} pedagogical, {} technical",
        summary.pedagogical_evaluators, summary.technical_evaluators
    );

    let overview = service.distribution_overview(1, 50)?;
    println!("\nAssignment panels");
    for entry in &overview.distributions {
        let names: Vec<&str> = entry
            .evaluators
            .iter()
            .map(|evaluator| evaluator.name.as_str())
            .collect();
        println!(
            "- {} ({} / {}): {}",
            entry.title,
            entry.area,
            entry.subarea,
            names.join(", ")
        );
    }

    // Submit one online evaluation per work so progress and podium have
    // something to aggregate.
    let samples: [[i64; 5]; 4] = [
        [5, 4, 5, 4, 5],
        [4, 4, 3, 4, 4],
        [5, 5, 5, 4, 5],
        [3, 4, 3, 3, 4],
    ];
    for (index, entry) in overview.distributions.iter().enumerate() {
        if let Some(evaluator) = entry.evaluators.first() {
            service.submit_evaluation(
                &evaluator.id,
                &entry.work_id,
                &samples[index % samples.len()],
                EvaluationMethod::Online,
            )?;
        }
    }

    let progress = service.progress(1, 50)?;
    println!(
        "\nProgress: {}/{} evaluations ({}%)",
        progress.overall_stats.total_evaluations,
        progress.overall_stats.total_expected_evaluations,
        progress.overall_stats.overall_progress
    );
    for work in &progress.works_progress {
        println!(
            "- {}: {}/{} completed ({}%)",
            work.title, work.completed_evaluations, work.total_evaluators, work.progress_percentage
        );
    }

    let podium = service.podium()?;
    println!("\nPodium by area");
    for entry in podium.values() {
        println!(
            "- {} ({} works, {} evaluated)",
            entry.area, entry.total_works, entry.evaluated_works
        );
        for (rank, place) in entry.podium.iter().enumerate() {
            println!(
                "  {}. {} — average {}",
                rank + 1,
                place.title,
                place.average_score
            );
        }
    }

    Ok(())
}

fn seed_sample_exhibition(store: &InMemoryReviewStore) -> Result<(), AppError> {
    let evaluators = [
        evaluator("eval-01", "Helena Prado", "Pedagógico", &[]),
        evaluator("eval-02", "Marcos Lima", "Computação", &["IA", "Robótica"]),
        evaluator("eval-03", "Julia Castro", "Computação", &[]),
        evaluator("eval-04", "Renata Alves", "Biologia", &["Genética"]),
        evaluator("eval-05", "Pedro Nunes", "Biologia", &[]),
    ];
    for entry in evaluators {
        store
            .insert_evaluator(entry)
            .map_err(ReviewServiceError::from)?;
    }

    let works = [
        work(
            "work-01",
            "Classificador de resíduos com visão computacional",
            "Sofia Teixeira",
            "Computação",
            "IA",
        ),
        work(
            "work-02",
            "Braço robótico de baixo custo",
            "Rafael Moreira",
            "Computação",
            "Robótica",
        ),
        work(
            "work-03",
            "Mapeamento genético de plantas nativas",
            "Sofia Teixeira",
            "Biologia",
            "Genética",
        ),
        work(
            "work-04",
            "Biodigestor escolar",
            "Rafael Moreira",
            "Biologia",
            "Energia",
        ),
    ];
    for entry in works {
        store.insert_work(entry).map_err(ReviewServiceError::from)?;
    }

    Ok(())
}

fn evaluator(id: &str, name: &str, area: &str, subareas: &[&str]) -> Evaluator {
    Evaluator::new(
        EvaluatorId(id.to_string()),
        name,
        format!("reg-{id}"),
        area,
        subareas.iter().map(|subarea| subarea.to_string()),
    )
}

fn work(id: &str, title: &str, advisor: &str, area: &str, subarea: &str) -> Work {
    Work {
        id: WorkId(id.to_string()),
        title: title.to_string(),
        authors: format!("Turma de {advisor}"),
        advisor: advisor.to_string(),
        presentation: PresentationType::Poster,
        area: area.to_string(),
        subarea: subarea.to_string(),
    }
}
