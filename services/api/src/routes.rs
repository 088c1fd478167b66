use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use cognivio::error::AppError;
use cognivio::workflows::assessment::normalizer::round_to;
use cognivio::workflows::assessment::{
    aggregate, assessment_router, level_for, recommend, summarize, AssessmentRepository,
    AssessmentService, ElementScore, FrameworkKind, PerformanceLevel, ScoreScale,
    TeacherDirectory,
};
use cognivio::workflows::import::ScoreImporter;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// CSV score export to preview without persisting it.
#[derive(Debug, Deserialize)]
pub(crate) struct ScorePreviewRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) scale: Option<ScoreScale>,
    #[serde(default)]
    pub(crate) framework: FrameworkKind,
    #[serde(default)]
    pub(crate) elements: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScorePreviewResponse {
    pub(crate) scale: ScoreScale,
    pub(crate) element_scores: Vec<ElementScore>,
    pub(crate) overall_score: Option<f64>,
    pub(crate) level: Option<PerformanceLevel>,
    pub(crate) summary: String,
    pub(crate) recommendations: Vec<String>,
}

pub(crate) fn with_assessment_routes<R, T>(
    service: Arc<AssessmentService<R, T>>,
) -> axum::Router
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/score-imports/preview",
            axum::routing::post(score_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_preview_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScorePreviewRequest>,
) -> Result<Json<ScorePreviewResponse>, AppError> {
    let ScorePreviewRequest {
        csv,
        scale,
        framework,
        elements,
    } = payload;
    let scale = scale.unwrap_or(state.raw_scale);

    let element_scores = ScoreImporter::retain_selected(
        ScoreImporter::from_reader(Cursor::new(csv.into_bytes()), scale)?,
        framework,
        &elements,
    );
    let summaries = aggregate(&element_scores);
    let overall_score = summaries.overall();
    let ratings = summaries.ratings();

    Ok(Json(ScorePreviewResponse {
        scale,
        overall_score: overall_score.map(|value| round_to(value, 2)),
        level: overall_score.map(level_for),
        summary: summarize(&ratings, overall_score.unwrap_or(0.0)),
        recommendations: recommend(&ratings),
        element_scores,
    }))
}
