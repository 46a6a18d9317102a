//! Token-based authentication endpoints.

use serde_json::json;

use crate::client::{JsonMap, SambaSafetyClient};
use crate::error::{Result, SambaSafetyError};
use crate::models::{Resource, TokenBundle};

/// Login, token refresh and session checks.
///
/// [`logout`](Self::logout) and [`validate_token`](Self::validate_token)
/// are best-effort: failures are logged and reported as `false`.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: SambaSafetyClient,
}

impl AuthService {
    /// Wrap a client.
    pub fn new(client: SambaSafetyClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token bundle.
    ///
    /// # Errors
    ///
    /// Returns [`SambaSafetyError::Authentication`] if the server answers
    /// without an access token.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenBundle> {
        let response = self
            .client
            .post(
                "auth/login",
                &json!({"username": username, "password": password}),
            )
            .await?;
        token_from_response(response, "Login failed: No access token received")
    }

    /// Exchange a refresh token for a new bundle.
    ///
    /// If the server omits `refresh_token`, the one passed in is kept.
    #[tracing::instrument(skip_all)]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenBundle> {
        let response = self
            .client
            .post("auth/refresh", &json!({"refresh_token": refresh_token}))
            .await?;
        let mut token =
            token_from_response(response, "Token refresh failed: No access token received")?;
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }

    /// End the session. Returns `false` on any failure.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> bool {
        match self.client.post_empty("auth/logout").await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "logout failed");
                false
            }
        }
    }

    /// The raw profile of the authenticated user.
    #[tracing::instrument(skip(self))]
    pub async fn current_user(&self) -> Result<JsonMap> {
        self.client.get("auth/user").await
    }

    /// Whether the current credentials are accepted. Returns `false` on any
    /// failure.
    #[tracing::instrument(skip(self))]
    pub async fn validate_token(&self) -> bool {
        match self.client.get("auth/validate").await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "token validation failed");
                false
            }
        }
    }
}

fn token_from_response(response: JsonMap, missing: &str) -> Result<TokenBundle> {
    let token = TokenBundle::from_json(response)?;
    if token.access_token.is_empty() {
        return Err(SambaSafetyError::authentication(missing));
    }
    Ok(token)
}
