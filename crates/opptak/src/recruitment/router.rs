use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PeriodDraft, PeriodId};
use super::repository::{PeriodRepository, RepositoryError};
use super::service::{PeriodService, PeriodServiceError};

/// Header carrying the caller's committee memberships, comma separated.
pub const USER_COMMITTEES_HEADER: &str = "x-user-committees";

/// Router builder exposing period administration and intake queries.
pub fn period_router<R>(service: Arc<PeriodService<R>>) -> Router
where
    R: PeriodRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/periods",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/v1/periods/current", get(current_handler::<R>))
        .route(
            "/api/v1/periods/:period_id",
            get(get_handler::<R>)
                .put(replace_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/periods/:period_id/committees",
            get(committees_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CurrentQuery {
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

fn error_response(error: PeriodServiceError) -> Response {
    match error {
        PeriodServiceError::Validation(error) => {
            let payload = json!({
                "error": error.to_string(),
                "kind": error.kind(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        PeriodServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "period not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        PeriodServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "period already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn parse_id(raw: &str) -> Result<PeriodId, Response> {
    PeriodId::parse(raw).map_err(|error| {
        let payload = json!({ "error": error.to_string() });
        (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
    })
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<PeriodService<R>>>,
    axum::Json(draft): axum::Json<PeriodDraft>,
) -> Response
where
    R: PeriodRepository + 'static,
{
    match service.create(draft) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<PeriodService<R>>>) -> Response
where
    R: PeriodRepository + 'static,
{
    match service.list() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn current_handler<R>(
    State(service): State<Arc<PeriodService<R>>>,
    Query(query): Query<CurrentQuery>,
) -> Response
where
    R: PeriodRepository + 'static,
{
    let now = query.now.unwrap_or_else(Utc::now);
    match service.current(now) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<PeriodService<R>>>,
    Path(period_id): Path<String>,
) -> Response
where
    R: PeriodRepository + 'static,
{
    let id = match parse_id(&period_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn replace_handler<R>(
    State(service): State<Arc<PeriodService<R>>>,
    Path(period_id): Path<String>,
    axum::Json(draft): axum::Json<PeriodDraft>,
) -> Response
where
    R: PeriodRepository + 'static,
{
    let id = match parse_id(&period_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.replace(&id, draft) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<PeriodService<R>>>,
    Path(period_id): Path<String>,
) -> Response
where
    R: PeriodRepository + 'static,
{
    let id = match parse_id(&period_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match service.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn committees_handler<R>(
    State(service): State<Arc<PeriodService<R>>>,
    Path(period_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: PeriodRepository + 'static,
{
    let id = match parse_id(&period_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let memberships = headers
        .get(USER_COMMITTEES_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let user_committees = memberships
        .split(',')
        .map(str::trim)
        .filter(|committee| !committee.is_empty());

    match service.committee_access(&id, user_committees, Utc::now()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}
