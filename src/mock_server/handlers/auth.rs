//! Authentication endpoint handlers.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{bearer_token, error_response, SharedState};
use crate::DEFAULT_EXPIRES_IN;

/// Body of a login request.
#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

/// Body of a refresh request.
#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub refresh_token: String,
}

fn token_response(access_token: String, refresh_token: String) -> Response {
    Json(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": DEFAULT_EXPIRES_IN,
        "token_type": "Bearer",
    }))
    .into_response()
}

fn unauthorized(message: &str) -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Unauthorized", message)
}

/// POST /auth/login
pub async fn login(State(state): State<SharedState>, Json(params): Json<LoginParams>) -> Response {
    let mut state = state.write().await;

    if !state.check_credentials(&params.username, &params.password) {
        return unauthorized("Invalid credentials");
    }

    let (access, refresh) = state.issue_tokens(&params.username);
    token_response(access, refresh)
}

/// POST /auth/refresh
pub async fn refresh(State(state): State<SharedState>, Json(params): Json<RefreshParams>) -> Response {
    let mut state = state.write().await;

    match state.redeem_refresh_token(&params.refresh_token) {
        Some((access, refresh)) => token_response(access, refresh),
        None => unauthorized("Invalid refresh token"),
    }
}

/// POST /auth/logout
pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Some(token) = bearer_token(&headers) {
        state.write().await.revoke_token(token);
    }
    StatusCode::NO_CONTENT.into_response()
}

/// GET /auth/user
pub async fn current_user(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.read().await;

    match bearer_token(&headers).and_then(|t| state.token_owner(t)) {
        Some(username) => Json(json!({ "username": username })).into_response(),
        None => unauthorized("Unauthenticated."),
    }
}

/// GET /auth/validate
pub async fn validate(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.read().await;

    if bearer_token(&headers).is_some_and(|t| state.accepts_token(t)) {
        Json(json!({ "valid": true })).into_response()
    } else {
        unauthorized("Unauthenticated.")
    }
}
