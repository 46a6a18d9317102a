//! Fleet endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{data, is_missing, not_found, paginate, unprocessable, ListQuery, SharedState};
use crate::{Driver, JsonMap};

/// Body of a roster addition.
#[derive(Debug, Deserialize)]
pub struct AddDriverParams {
    pub driver_id: String,
}

/// GET /fleets
pub async fn list_fleets(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let state = state.read().await;
    paginate(state.list_fleets(query.status.as_deref()), &query)
}

/// GET /fleets/{id}
pub async fn get_fleet(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.read().await;

    match state.fleets.get(&id) {
        Some(fleet) => data(StatusCode::OK, fleet),
        None => not_found("Fleet", &id),
    }
}

/// POST /fleets
pub async fn create_fleet(State(state): State<SharedState>, Json(body): Json<JsonMap>) -> Response {
    if is_missing(&body, "name") {
        return unprocessable("The name field is required.");
    }

    let mut state = state.write().await;
    match state.create_fleet(body) {
        Some(fleet) => data(StatusCode::CREATED, fleet),
        None => unprocessable("Invalid fleet payload."),
    }
}

/// PUT /fleets/{id}
pub async fn update_fleet(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<JsonMap>,
) -> Response {
    let mut state = state.write().await;

    match state.update_fleet(&id, body) {
        Some(fleet) => data(StatusCode::OK, fleet),
        None => not_found("Fleet", &id),
    }
}

/// DELETE /fleets/{id}
pub async fn delete_fleet(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;

    if state.delete_fleet(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Fleet", &id)
    }
}

/// GET /fleets/{id}/drivers
pub async fn list_fleet_drivers(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let state = state.read().await;

    if !state.fleets.contains_key(&id) {
        return not_found("Fleet", &id);
    }

    let drivers: Vec<&Driver> = state
        .fleet_drivers(&id)
        .into_iter()
        .filter(|d| query.status.as_deref().map_or(true, |s| d.status() == Some(s)))
        .collect();
    paginate(drivers, &query)
}

/// POST /fleets/{id}/drivers
pub async fn add_fleet_driver(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(params): Json<AddDriverParams>,
) -> Response {
    let mut state = state.write().await;

    if !state.fleets.contains_key(&id) {
        return not_found("Fleet", &id);
    }
    if !state.drivers.contains_key(&params.driver_id) {
        return not_found("Driver", &params.driver_id);
    }

    state.add_fleet_member(&id, &params.driver_id);
    (
        StatusCode::CREATED,
        Json(json!({ "fleet_id": id, "driver_id": params.driver_id })),
    )
        .into_response()
}

/// DELETE /fleets/{id}/drivers/{driver_id}
pub async fn remove_fleet_driver(
    State(state): State<SharedState>,
    Path((id, driver_id)): Path<(String, String)>,
) -> Response {
    let mut state = state.write().await;

    if state.remove_fleet_member(&id, &driver_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Fleet member", &driver_id)
    }
}
