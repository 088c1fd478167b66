use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DateWindow, TeacherId, TeacherProfile};
use super::repository::{AssessmentRepository, RepositoryError, TeacherDirectory};
use super::rubric::{self, FrameworkKind};
use super::service::{AssessmentService, AssessmentServiceError, AssessmentSubmission};

/// Router builder exposing the teacher, assessment, and rollup endpoints.
pub fn assessment_router<R, T>(service: Arc<AssessmentService<R, T>>) -> Router
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    Router::new()
        .route("/api/v1/teachers", post(register_teacher_handler::<R, T>))
        .route("/api/v1/assessments", post(record_assessment_handler::<R, T>))
        .route("/api/v1/roster", get(roster_handler::<R, T>))
        .route(
            "/api/v1/teachers/:teacher_id/dashboard",
            get(dashboard_handler::<R, T>),
        )
        .route(
            "/api/v1/teachers/:teacher_id/summary-insights",
            get(insights_handler::<R, T>),
        )
        .route(
            "/api/v1/teachers/:teacher_id/peer-recommendations",
            get(peer_recommendations_handler::<R, T>),
        )
        .route("/api/v1/frameworks", get(frameworks_handler))
        .route("/api/v1/frameworks/:kind", get(framework_handler))
        .with_state(service)
}

/// Date bounds and element selection shared by the rollup endpoints.
///
/// Bounds accept `YYYY-MM-DD` (whole day, inclusive) or an RFC 3339 instant;
/// `elements` is a comma-separated id list.
#[derive(Debug, Default, Deserialize)]
pub struct RollupQuery {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub elements: Option<String>,
}

impl RollupQuery {
    pub fn window(&self) -> Result<DateWindow, String> {
        let start = self
            .start
            .as_deref()
            .map(|raw| parse_bound(raw, Bound::Start))
            .transpose()?;
        let end = self
            .end
            .as_deref()
            .map(|raw| parse_bound(raw, Bound::End))
            .transpose()?;
        Ok(DateWindow::new(start, end))
    }

    pub fn selected_elements(&self) -> Option<Vec<String>> {
        let selected: Vec<String> = self
            .elements
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        (!selected.is_empty()).then_some(selected)
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_bound(raw: &str, bound: Bound) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))?;
    let window = match bound {
        Bound::Start => DateWindow::from_dates(Some(date), None).start,
        Bound::End => DateWindow::from_dates(None, Some(date)).end,
    };
    window.ok_or_else(|| format!("'{raw}' is outside the supported date range"))
}

pub(crate) async fn register_teacher_handler<R, T>(
    State(service): State<Arc<AssessmentService<R, T>>>,
    axum::Json(profile): axum::Json<TeacherProfile>,
) -> Response
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    match service.register_teacher(profile) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(AssessmentServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "teacher already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn record_assessment_handler<R, T>(
    State(service): State<Arc<AssessmentService<R, T>>>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    match service.record_assessment(submission) {
        Ok(result) => (StatusCode::CREATED, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn roster_handler<R, T>(
    State(service): State<Arc<AssessmentService<R, T>>>,
    Query(query): Query<RollupQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    let window = match query.window() {
        Ok(window) => window,
        Err(message) => return bad_request(message),
    };

    match service.roster(query.selected_elements(), &window) {
        Ok(roster) => (StatusCode::OK, axum::Json(roster.to_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R, T>(
    State(service): State<Arc<AssessmentService<R, T>>>,
    Path(teacher_id): Path<String>,
    Query(query): Query<RollupQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    let window = match query.window() {
        Ok(window) => window,
        Err(message) => return bad_request(message),
    };

    match service.dashboard(&TeacherId(teacher_id), &window) {
        Ok(dashboard) => (StatusCode::OK, axum::Json(dashboard.to_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn insights_handler<R, T>(
    State(service): State<Arc<AssessmentService<R, T>>>,
    Path(teacher_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    match service.insights(&TeacherId(teacher_id)) {
        Ok(insights) => (StatusCode::OK, axum::Json(insights)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn peer_recommendations_handler<R, T>(
    State(service): State<Arc<AssessmentService<R, T>>>,
    Path(teacher_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    match service.peer_recommendations(&TeacherId(teacher_id)) {
        Ok(recommendations) => {
            let payload = json!({
                "recommendations": recommendations,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn frameworks_handler() -> Response {
    (StatusCode::OK, axum::Json(rubric::summaries())).into_response()
}

pub(crate) async fn framework_handler(Path(kind): Path<String>) -> Response {
    match kind.parse::<FrameworkKind>() {
        Ok(kind) => (StatusCode::OK, axum::Json(rubric::framework(kind))).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

fn bad_request(message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::UnknownTeacher(_) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Import(_) => StatusCode::BAD_REQUEST,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
