//! Driver endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{data, error_response, is_missing, not_found, paginate, unprocessable, ListQuery, SharedState};
use crate::{Driver, JsonMap, LicenseInfo};

const DRIVER_STATUSES: [&str; 3] = ["active", "inactive", "suspended"];

/// Body of a status transition.
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: String,
    pub reason: Option<String>,
}

/// Body of a license link request.
#[derive(Debug, Deserialize)]
pub struct LinkLicenseParams {
    pub license_number: String,
    pub state: String,
}

/// GET /drivers
pub async fn list_drivers(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let state = state.read().await;

    let mut drivers = state.list_drivers(query.status.as_deref());
    if let Some(sort) = query.sort.as_deref() {
        sort_drivers(&mut drivers, sort);
    }

    paginate(drivers, &query)
}

/// Apply the first key of a `sort` parameter; `-` prefix means descending.
fn sort_drivers(drivers: &mut [&Driver], sort: &str) {
    let key = sort.split(',').next().unwrap_or_default();
    let (field, descending) = match key.strip_prefix('-') {
        Some(field) => (field, true),
        None => (key, false),
    };

    match field {
        "first_name" => drivers.sort_by(|a, b| a.first_name.cmp(&b.first_name)),
        "last_name" => drivers.sort_by(|a, b| a.last_name.cmp(&b.last_name)),
        "name" => drivers.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        }),
        _ => return,
    }
    if descending {
        drivers.reverse();
    }
}

/// GET /drivers/{id}
pub async fn get_driver(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.read().await;

    match state.drivers.get(&id) {
        Some(driver) => data(StatusCode::OK, driver),
        None => not_found("Driver", &id),
    }
}

/// POST /drivers
pub async fn create_driver(State(state): State<SharedState>, Json(body): Json<JsonMap>) -> Response {
    for field in ["first_name", "last_name"] {
        if is_missing(&body, field) {
            return unprocessable(format!("The {field} field is required."));
        }
    }

    let mut state = state.write().await;
    match state.create_driver(body) {
        Some(driver) => data(StatusCode::CREATED, driver),
        None => unprocessable("Invalid driver payload."),
    }
}

/// PUT /drivers/{id}
pub async fn update_driver(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<JsonMap>,
) -> Response {
    let mut state = state.write().await;

    match state.update_driver(&id, body) {
        Some(driver) => data(StatusCode::OK, driver),
        None => not_found("Driver", &id),
    }
}

/// DELETE /drivers/{id}
pub async fn delete_driver(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;

    if state.delete_driver(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Driver", &id)
    }
}

/// PATCH /drivers/{id}/status
pub async fn update_driver_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(params): Json<StatusParams>,
) -> Response {
    if !DRIVER_STATUSES.contains(&params.status.as_str()) {
        return unprocessable(format!("Unknown status '{}'.", params.status));
    }

    let mut changes = JsonMap::new();
    changes.insert("status".to_string(), json!(params.status));
    if let Some(reason) = params.reason {
        changes.insert("reason".to_string(), json!(reason));
    }

    let mut state = state.write().await;
    match state.update_driver(&id, changes) {
        Some(driver) => data(StatusCode::OK, driver),
        None => not_found("Driver", &id),
    }
}

/// GET /drivers/{id}/mvr
pub async fn get_driver_mvr(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.read().await;

    if !state.drivers.contains_key(&id) {
        return not_found("Driver", &id);
    }
    match state.latest_mvr_record(&id) {
        Some(record) => data(StatusCode::OK, record),
        None => error_response(
            StatusCode::NOT_FOUND,
            "MVR not found",
            format!("Driver {id} has no MVR on file"),
        ),
    }
}

/// POST /drivers/{id}/mvr
pub async fn request_driver_mvr(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(mut body): Json<JsonMap>,
) -> Response {
    let mut state = state.write().await;

    let Some(driver) = state.drivers.get(&id) else {
        return not_found("Driver", &id);
    };
    if let Some(number) = driver.license_number.clone() {
        body.entry("license_number").or_insert_with(|| json!(number));
    }
    body.insert("driver_id".to_string(), json!(id));

    match state.create_mvr_record(body) {
        Some(record) => data(StatusCode::CREATED, record),
        None => unprocessable("Invalid MVR request."),
    }
}

/// GET /drivers/{id}/mvr/history
pub async fn driver_mvr_history(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    let state = state.read().await;

    if !state.drivers.contains_key(&id) {
        return not_found("Driver", &id);
    }
    let mut records = state.list_mvr_records(Some(&id), None);
    records.sort_by(|a, b| b.request_date.cmp(&a.request_date));

    paginate(records, &query)
}

/// POST /drivers/{id}/license-discovery
pub async fn discover_driver_licenses(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;

    match state.drivers.get(&id) {
        Some(driver) => {
            let licenses: Vec<&LicenseInfo> = state.licenses_for_driver(driver);
            Json(json!({ "licenses": licenses })).into_response()
        }
        None => not_found("Driver", &id),
    }
}

/// POST /drivers/{id}/licenses
pub async fn link_driver_license(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(params): Json<LinkLicenseParams>,
) -> Response {
    let mut state = state.write().await;

    if !state.drivers.contains_key(&id) {
        return not_found("Driver", &id);
    }
    if state.find_license(&params.state, &params.license_number).is_none() {
        return not_found("License", &params.license_number);
    }

    let mut changes = JsonMap::new();
    changes.insert("license_number".to_string(), json!(params.license_number));
    match state.update_driver(&id, changes) {
        Some(driver) => Json(json!({ "driver": driver })).into_response(),
        None => not_found("Driver", &id),
    }
}

/// DELETE /drivers/{id}/licenses/{state}/{number}
pub async fn unlink_driver_license(
    State(state): State<SharedState>,
    Path((id, _license_state, number)): Path<(String, String, String)>,
) -> Response {
    let mut state = state.write().await;

    let Some(driver) = state.drivers.get(&id) else {
        return not_found("Driver", &id);
    };
    if driver.license_number.as_deref() != Some(number.as_str()) {
        return not_found("License", &number);
    }

    let mut changes = JsonMap::new();
    changes.insert("license_number".to_string(), serde_json::Value::Null);
    state.update_driver(&id, changes);
    StatusCode::NO_CONTENT.into_response()
}
