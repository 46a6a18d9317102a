//! HTTP request handlers for the mock server.

pub mod auth;
pub mod drivers;
pub mod fleets;
pub mod licenses;
pub mod mvr;

pub use auth::*;
pub use drivers::*;
pub use fleets::*;
pub use licenses::*;
pub use mvr::*;

use std::sync::Arc;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::DEFAULT_PAGE_SIZE;

/// State shared by every handler.
pub type SharedState = Arc<RwLock<MockState>>;

/// Query parameters accepted by list endpoints.
///
/// Unknown filters are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub driver_id: Option<String>,
    pub sort: Option<String>,
    pub count_only: Option<bool>,
}

/// Slice `items` into a page and wrap it in `{data, meta}`.
///
/// With `count_only=true` only `{count}` is returned.
pub(crate) fn paginate<T: Serialize>(items: Vec<&T>, query: &ListQuery) -> Response {
    let total = items.len();
    if query.count_only == Some(true) {
        return Json(json!({ "count": total })).into_response();
    }

    let per_page = query.limit.or(query.per_page).unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let page = query.page.unwrap_or(1).max(1);
    let start = (page as usize - 1).saturating_mul(per_page as usize);

    let data: Vec<&T> = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    Json(json!({
        "data": data,
        "meta": {
            "total": total,
            "current_page": page,
            "per_page": per_page,
        }
    }))
    .into_response()
}

/// Wrap a single entity in `{data}`.
pub(crate) fn data<T: Serialize>(status: StatusCode, item: &T) -> Response {
    (status, Json(json!({ "data": item }))).into_response()
}

/// A JSON error body in the shape the live API uses.
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub(crate) fn not_found(kind: &str, id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        &format!("{kind} not found"),
        format!("No {} found with id: {id}", kind.to_lowercase()),
    )
}

pub(crate) fn unprocessable(message: impl Into<String>) -> Response {
    error_response(StatusCode::UNPROCESSABLE_ENTITY, "Validation failed", message)
}

/// The bearer token from an `Authorization` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Whether a payload field is missing, null or an empty string.
pub(crate) fn is_missing(body: &crate::JsonMap, field: &str) -> bool {
    match body.get(field) {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
