use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::passport::FieldSet;
use super::repository::{CaseId, RepositoryError, ReviewSink, ScreeningRecord, ScreeningRepository};
use super::service::{ScreeningService, ScreeningServiceError};

/// Request body for a screening submission. `fields` accepts any of the
/// capture payload shapes; `evaluated_on` pins the date plausibility
/// window, defaulting to today.
#[derive(Debug, Deserialize)]
pub struct ScreeningRequest {
    pub fields: serde_json::Value,
    #[serde(default)]
    pub evaluated_on: Option<NaiveDate>,
}

/// Paging controls for the case listing.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// Router builder exposing HTTP endpoints for screening and lookup.
pub fn screening_router<R, S>(service: Arc<ScreeningService<R, S>>) -> Router
where
    R: ScreeningRepository + 'static,
    S: ReviewSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/screenings",
            post(screen_handler::<R, S>).get(recent_handler::<R, S>),
        )
        .route("/api/v1/screenings/:case_id", get(case_handler::<R, S>))
        .with_state(service)
}

pub(crate) async fn screen_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    axum::Json(request): axum::Json<ScreeningRequest>,
) -> Response
where
    R: ScreeningRepository + 'static,
    S: ReviewSink + 'static,
{
    let fields = FieldSet::from_json(&request.fields);
    let evaluated_on = request
        .evaluated_on
        .unwrap_or_else(|| Local::now().date_naive());

    match service.screen(fields, evaluated_on) {
        Ok(record) => {
            let view = record.view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(ScreeningServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "case already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn recent_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    R: ScreeningRepository + 'static,
    S: ReviewSink + 'static,
{
    match service.recent(query.limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(ScreeningRecord::view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn case_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: ScreeningRepository + 'static,
    S: ReviewSink + 'static,
{
    let id = CaseId(case_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(ScreeningServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "case_id": id.0,
                "error": "unknown case",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
