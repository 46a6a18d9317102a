//! License discovery endpoint handlers.
//!
//! Discovery matches drivers by name (or the `ssn` metadata entry) and
//! returns the licenses on file for their license numbers.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::SharedState;
use crate::mock_server::state::MockState;
use crate::{BulkValidationResult, Driver, JsonMap, LicenseInfo, LicenseLookup};

const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;

/// Body of a bulk validation request.
#[derive(Debug, Deserialize)]
pub struct BulkValidationParams {
    pub licenses: Vec<LicenseLookup>,
}

/// Query of the expiring-soon endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<i64>,
}

fn licenses_response(licenses: Vec<&LicenseInfo>) -> Response {
    Json(json!({ "licenses": licenses })).into_response()
}

/// POST /license-discovery/validate
pub async fn validate_license(
    State(state): State<SharedState>,
    Json(lookup): Json<LicenseLookup>,
) -> Response {
    let state = state.read().await;
    let license = state.find_license(&lookup.state, &lookup.license_number);
    Json(json!({ "license": license })).into_response()
}

/// GET /license-discovery/history/{state}/{number}
pub async fn license_history(
    State(state): State<SharedState>,
    Path((license_state, number)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    let history: Vec<&LicenseInfo> = state.find_license(&license_state, &number).into_iter().collect();
    Json(json!({ "history": history })).into_response()
}

/// GET /license-discovery/expired
pub async fn expired_licenses(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    licenses_response(state.all_licenses().into_iter().filter(|l| l.is_expired()).collect())
}

/// GET /license-discovery/expiring-soon
pub async fn expiring_licenses(
    State(state): State<SharedState>,
    Query(query): Query<ExpiringQuery>,
) -> Response {
    let days = query.days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS);
    let state = state.read().await;
    licenses_response(
        state
            .all_licenses()
            .into_iter()
            .filter(|l| !l.is_expired() && l.is_expiring_soon(days))
            .collect(),
    )
}

/// GET /license-discovery/suspended
pub async fn suspended_licenses(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    licenses_response(state.all_licenses().into_iter().filter(|l| l.is_suspended()).collect())
}

/// POST /license-discovery/bulk-validate
pub async fn bulk_validate(
    State(state): State<SharedState>,
    Json(params): Json<BulkValidationParams>,
) -> Response {
    let state = state.read().await;

    let results: Vec<BulkValidationResult> = params
        .licenses
        .into_iter()
        .map(|lookup| {
            let found = state.find_license(&lookup.state, &lookup.license_number).cloned();
            let errors = match &found {
                Some(_) => Vec::new(),
                None => vec![json!("License not found")],
            };
            BulkValidationResult {
                license_number: lookup.license_number,
                state: lookup.state,
                valid: found.as_ref().is_some_and(LicenseInfo::is_active),
                license_info: found,
                errors,
            }
        })
        .collect();

    Json(json!({ "results": results })).into_response()
}

/// POST /license-discovery/personal, /multi-state and /all-states
///
/// `state` narrows to one state and `states` to a list.
pub async fn discover_by_personal_info(
    State(state): State<SharedState>,
    Json(body): Json<JsonMap>,
) -> Response {
    let first = text(&body, "first_name");
    let last = text(&body, "last_name");

    let state = state.read().await;
    let licenses = discover(&state, &body, |d| {
        d.first_name.eq_ignore_ascii_case(first) && d.last_name.eq_ignore_ascii_case(last)
    });
    licenses_response(licenses)
}

/// POST /license-discovery/ssn
pub async fn discover_by_ssn(State(state): State<SharedState>, Json(body): Json<JsonMap>) -> Response {
    let ssn = text(&body, "ssn");

    let state = state.read().await;
    let licenses = discover(&state, &body, |d| {
        !ssn.is_empty() && d.meta("ssn").and_then(Value::as_str) == Some(ssn)
    });
    licenses_response(licenses)
}

fn discover<'a, F>(state: &'a MockState, body: &JsonMap, matches: F) -> Vec<&'a LicenseInfo>
where
    F: Fn(&Driver) -> bool,
{
    let states = state_filter(body);
    state
        .drivers
        .values()
        .filter(|&d| matches(d))
        .flat_map(|d| state.licenses_for_driver(d))
        .filter(|l| states.as_ref().map_or(true, |s| s.contains(&l.state.to_uppercase())))
        .collect()
}

/// Upper-cased states from `state` or `states`; `None` means every state.
fn state_filter(body: &JsonMap) -> Option<Vec<String>> {
    if let Some(Value::Array(states)) = body.get("states") {
        return Some(
            states
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_uppercase)
                .collect(),
        );
    }
    body.get("state")
        .and_then(Value::as_str)
        .map(|s| vec![s.to_uppercase()])
}

fn text<'a>(body: &'a JsonMap, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}
