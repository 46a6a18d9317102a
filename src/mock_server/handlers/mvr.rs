//! MVR record endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;

use super::{data, error_response, is_missing, not_found, paginate, unprocessable, ListQuery, SharedState};
use crate::JsonMap;

/// Body of a record status change.
#[derive(Debug, Deserialize)]
pub struct UpdateMvrParams {
    pub status: String,
}

/// GET /mvr-records
pub async fn list_mvr_records(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let state = state.read().await;

    let mut records = state.list_mvr_records(query.driver_id.as_deref(), query.status.as_deref());
    match query.sort.as_deref() {
        Some("-created_at" | "-request_date") => {
            records.sort_by(|a, b| b.request_date.cmp(&a.request_date));
        }
        Some("created_at" | "request_date") => {
            records.sort_by(|a, b| a.request_date.cmp(&b.request_date));
        }
        _ => {}
    }

    paginate(records, &query)
}

/// GET /mvr-records/{id}
pub async fn get_mvr_record(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.read().await;

    match state.mvr_records.get(&id) {
        Some(record) => data(StatusCode::OK, record),
        None => not_found("MVR record", &id),
    }
}

/// POST /mvr-records
pub async fn request_mvr_record(
    State(state): State<SharedState>,
    Json(body): Json<JsonMap>,
) -> Response {
    if is_missing(&body, "driver_id") {
        return unprocessable("The driver_id field is required.");
    }

    let mut state = state.write().await;

    let driver_id = body
        .get("driver_id")
        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
        .unwrap_or_default();
    if !state.drivers.contains_key(&driver_id) {
        return not_found("Driver", &driver_id);
    }

    match state.create_mvr_record(body) {
        Some(record) => data(StatusCode::CREATED, record),
        None => unprocessable("Invalid MVR request."),
    }
}

/// PATCH /mvr-records/{id}
///
/// Only pending records may be cancelled.
pub async fn update_mvr_record(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(params): Json<UpdateMvrParams>,
) -> Response {
    let mut state = state.write().await;

    let Some(record) = state.mvr_records.get(&id) else {
        return not_found("MVR record", &id);
    };
    if params.status == "cancelled" && !record.is_pending() {
        return error_response(
            StatusCode::CONFLICT,
            "Invalid transition",
            format!("MVR record {id} is {} and cannot be cancelled", record.status),
        );
    }

    match state.set_mvr_status(&id, &params.status) {
        Some(record) => data(StatusCode::OK, record),
        None => not_found("MVR record", &id),
    }
}

/// POST /mvr-records/{id}/refresh
///
/// Pending records complete on refresh.
pub async fn refresh_mvr_record(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;

    let Some(record) = state.mvr_records.get_mut(&id) else {
        return not_found("MVR record", &id);
    };
    if record.is_pending() {
        record.status = "completed".to_string();
        record.report_date = Some(chrono::Utc::now());
    }
    data(StatusCode::OK, &*record)
}
