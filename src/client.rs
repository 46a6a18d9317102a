//! SambaSafety API client.
//!
//! Low-level HTTP client that handles authentication, JSON encoding and
//! error mapping. Resource operations are implemented via traits on the
//! model types and composed by the services.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{ClientConfig, EnvSettings};
use crate::error::{Result, SambaSafetyError};

/// A decoded JSON object.
pub type JsonMap = serde_json::Map<String, Value>;

/// Query string parameters for GET requests.
pub type QueryParams = BTreeMap<String, String>;

/// Low-level SambaSafety API client.
///
/// Every request carries `Authorization: Bearer <key>`, JSON content
/// negotiation headers and the client identifier. Successful responses are
/// decoded into a [`JsonMap`]; failures are mapped onto
/// [`SambaSafetyError`].
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool. It holds no per-call state, so one instance can be
/// shared between concurrent tasks.
///
/// # Example
///
/// ```no_run
/// use sambasafety::SambaSafetyClient;
///
/// # async fn example() -> sambasafety::Result<()> {
/// // Create from environment variables
/// let client = SambaSafetyClient::from_env()?;
///
/// // Or configure manually
/// let client = SambaSafetyClient::new("your-api-key", "https://api.sambasafety.com/v1")?;
/// let drivers = client.get("drivers").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SambaSafetyClient {
    http: Client,
    base_url: Arc<Url>,
    token: Option<String>,
}

impl std::fmt::Debug for SambaSafetyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SambaSafetyClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl SambaSafetyClient {
    /// Create a client from environment variables.
    ///
    /// Uses `SAMBASAFETY_API_KEY` for authentication, optionally
    /// `SAMBASAFETY_API_URL` for the base URL and `SAMBASAFETY_TIMEOUT_SECS`
    /// for the request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `SAMBASAFETY_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let settings = EnvSettings::load()?;
        Self::with_config(&settings.api_key, &settings.base_url, settings.config)
    }

    /// Create a new client with the provided API key and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        Self::with_config(api_key, base_url, ClientConfig::default())
    }

    /// Create a new client with explicit transport options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or an extra header is invalid.
    pub fn with_config(api_key: &str, base_url: &str, config: ClientConfig) -> Result<Self> {
        Self::build(Some(api_key.to_string()), base_url, config)
    }

    /// Create a client without credentials, used to obtain a token.
    pub(crate) fn unauthenticated(base_url: &str, config: ClientConfig) -> Result<Self> {
        Self::build(None, base_url, config)
    }

    fn build(token: Option<String>, base_url: &str, config: ClientConfig) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(Self::default_headers(&config)?)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(config.timeout);

        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token,
        })
    }

    fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| SambaSafetyError::InvalidConfig(format!("invalid header name '{name}'")))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                SambaSafetyError::InvalidConfig(format!("invalid value for header '{name}'"))
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<JsonMap> {
        let request = self.request(Method::GET, path)?;
        Self::send(request).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<JsonMap> {
        let request = self.request(Method::GET, path)?.query(query);
        Self::send(request).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonMap> {
        let request = self.request(Method::POST, path)?.json(body);
        Self::send(request).await
    }

    /// Make a POST request without a body.
    #[tracing::instrument(skip(self))]
    pub async fn post_empty(&self, path: &str) -> Result<JsonMap> {
        let request = self.request(Method::POST, path)?;
        Self::send(request).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonMap> {
        let request = self.request(Method::PUT, path)?.json(body);
        Self::send(request).await
    }

    /// Make a PATCH request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<JsonMap> {
        let request = self.request(Method::PATCH, path)?.json(body);
        Self::send(request).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<JsonMap> {
        let request = self.request(Method::DELETE, path)?;
        Self::send(request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        // A leading slash would replace the base URL's path prefix.
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let builder = self.http.request(method, url);

        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(request: RequestBuilder) -> Result<JsonMap> {
        let response = request.send().await?;
        Self::check_response(response).await
    }

    /// Check response status, decode the body and convert errors.
    async fn check_response(response: Response) -> Result<JsonMap> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return parse_body(&body);
        }

        let message = extract_error_message(&body);
        tracing::debug!(status = status.as_u16(), %message, "request failed");
        Err(SambaSafetyError::from_status(status.as_u16(), message))
    }
}

/// Decode a successful response body into a JSON object.
///
/// Empty and `null` bodies decode to an empty map.
fn parse_body(body: &str) -> Result<JsonMap> {
    if body.trim().is_empty() {
        return Ok(JsonMap::new());
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(JsonMap::new()),
        Ok(other) => Err(SambaSafetyError::ResponseFormat(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(SambaSafetyError::ResponseFormat(format!(
            "Invalid JSON response: {e}"
        ))),
    }
}

/// Extract error message from a failed response body.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
        if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
            return err.to_string();
        }
    }

    "Unknown error".to_string()
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
