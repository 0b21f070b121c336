use crate::infra::{deserialize_optional_time, AppState};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Duration, NaiveTime};
use opptak::error::AppError;
use opptak::recruitment::schedule::{TimeSlot, TimeSlotGrid};
use opptak::recruitment::{period_router, PeriodRepository, PeriodService};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SlotsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    pub(crate) day_start: Option<NaiveTime>,
    #[serde(default, deserialize_with = "deserialize_optional_time")]
    pub(crate) day_end: Option<NaiveTime>,
    #[serde(default)]
    pub(crate) interview_minutes: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SlotsResponse {
    pub(crate) day_start: NaiveTime,
    pub(crate) day_end: NaiveTime,
    pub(crate) interview_minutes: i64,
    pub(crate) slots: Vec<TimeSlot>,
}

pub(crate) fn with_period_routes<R>(service: Arc<PeriodService<R>>) -> axum::Router
where
    R: PeriodRepository + 'static,
{
    period_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/schedule/slots",
            axum::routing::get(slots_endpoint),
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

/// Slot grid for one working day; omitted parameters fall back to config.
pub(crate) async fn slots_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let scheduling = state.scheduling;
    let day_start = query.day_start.unwrap_or(scheduling.day_start);
    let day_end = query.day_end.unwrap_or(scheduling.day_end);
    let interview_minutes = query
        .interview_minutes
        .unwrap_or_else(|| i64::from(scheduling.interview_minutes));

    // Lengths too large to represent are rejected like non-positive ones.
    let length = Duration::try_minutes(interview_minutes).unwrap_or_else(Duration::zero);
    let grid = TimeSlotGrid::new(day_start, day_end, length)?;

    Ok(Json(SlotsResponse {
        day_start,
        day_end,
        interview_minutes,
        slots: grid.time_slots(),
    }))
}
