//! High-level entry points.
//!
//! [`SambaSafety`] bundles a configured client with every service.
//! [`Authenticator`] obtains a token with username and password and hands
//! back a [`SambaSafety`] bound to it.

use chrono::{DateTime, Duration, Utc};

use crate::client::SambaSafetyClient;
use crate::config::{ClientConfig, EnvSettings, DEFAULT_API_URL};
use crate::error::{Result, SambaSafetyError};
use crate::models::TokenBundle;
use crate::services::{
    AuthService, DriverService, FleetService, LicenseDiscoveryService, MvrService,
};

/// Tokens are treated as expired this long before their stated lifetime ends.
const EXPIRY_MARGIN_SECS: i64 = 300;

/// SambaSafety API facade.
///
/// All services share one underlying client and are built up front.
///
/// # Example
///
/// ```no_run
/// use sambasafety::SambaSafety;
///
/// # async fn example() -> sambasafety::Result<()> {
/// let sdk = SambaSafety::new("your-api-key", "https://api.sambasafety.com/v1")?;
/// let drivers = sdk.drivers().list(&Default::default()).await?;
/// for driver in drivers.active_drivers() {
///     println!("{}", driver.full_name());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SambaSafety {
    client: SambaSafetyClient,
    drivers: DriverService,
    fleets: FleetService,
    mvr: MvrService,
    auth: AuthService,
    license_discovery: LicenseDiscoveryService,
}

impl SambaSafety {
    /// Create a facade authenticated with an API key or bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        Self::with_config(api_key, base_url, ClientConfig::default())
    }

    /// Create a facade with explicit transport options.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or an extra header is invalid.
    pub fn with_config(api_key: &str, base_url: &str, config: ClientConfig) -> Result<Self> {
        let client = SambaSafetyClient::with_config(api_key, base_url, config)?;
        Ok(Self::from_client(client))
    }

    /// Create a facade from `SAMBASAFETY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`SambaSafetyError::ConfigMissing`] if no API key is set.
    pub fn from_env() -> Result<Self> {
        let settings = EnvSettings::load()?;
        Self::with_config(&settings.api_key, &settings.base_url, settings.config)
    }

    /// Wrap an existing client.
    pub fn from_client(client: SambaSafetyClient) -> Self {
        Self {
            drivers: DriverService::new(client.clone()),
            fleets: FleetService::new(client.clone()),
            mvr: MvrService::new(client.clone()),
            auth: AuthService::new(client.clone()),
            license_discovery: LicenseDiscoveryService::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &SambaSafetyClient {
        &self.client
    }

    pub fn drivers(&self) -> &DriverService {
        &self.drivers
    }

    pub fn fleets(&self) -> &FleetService {
        &self.fleets
    }

    pub fn mvr(&self) -> &MvrService {
        &self.mvr
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn license_discovery(&self) -> &LicenseDiscoveryService {
        &self.license_discovery
    }
}

#[derive(Debug, Clone)]
struct IssuedToken {
    bundle: TokenBundle,
    issued_at: DateTime<Utc>,
}

/// Username/password login helper.
///
/// Keeps the most recent token bundle together with the instant it was
/// received, so expiry can be judged later.
///
/// # Example
///
/// ```no_run
/// use sambasafety::Authenticator;
///
/// # async fn example() -> sambasafety::Result<()> {
/// let mut auth = Authenticator::default();
/// let sdk = auth.login("fleet-admin", "hunter2").await?;
/// if auth.is_token_expired() {
///     let refresh = auth.token().and_then(|t| t.refresh_token.clone()).unwrap_or_default();
///     let sdk = auth.refresh(&refresh).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticator {
    base_url: String,
    config: ClientConfig,
    token: Option<IssuedToken>,
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl Authenticator {
    pub fn new(base_url: &str) -> Self {
        Self::with_config(base_url, ClientConfig::default())
    }

    pub fn with_config(base_url: &str, config: ClientConfig) -> Self {
        Self {
            base_url: base_url.to_string(),
            config,
            token: None,
        }
    }

    /// Log in and return a facade bound to the new access token.
    ///
    /// # Errors
    ///
    /// Returns [`SambaSafetyError::Authentication`] if the credentials are
    /// rejected or no access token is returned.
    #[tracing::instrument(skip(self, password), fields(base_url = %self.base_url))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<SambaSafety> {
        let client = SambaSafetyClient::unauthenticated(&self.base_url, self.config.clone())?;
        let bundle = AuthService::new(client).login(username, password).await?;
        self.bind(bundle)
    }

    /// Skip login and use an API key directly. The stored token is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn login_with_api_key(&self, api_key: &str) -> Result<SambaSafety> {
        SambaSafety::with_config(api_key, &self.base_url, self.config.clone())
    }

    /// Exchange a refresh token and return a facade bound to the new token.
    ///
    /// # Errors
    ///
    /// Returns [`SambaSafetyError::Authentication`] if no token has been
    /// obtained yet or the refresh is rejected.
    #[tracing::instrument(skip_all, fields(base_url = %self.base_url))]
    pub async fn refresh(&mut self, refresh_token: &str) -> Result<SambaSafety> {
        let Some(current) = &self.token else {
            return Err(SambaSafetyError::authentication(
                "No token data available for refresh",
            ));
        };

        let client = SambaSafetyClient::with_config(
            &current.bundle.access_token,
            &self.base_url,
            self.config.clone(),
        )?;
        let bundle = AuthService::new(client).refresh_token(refresh_token).await?;
        self.bind(bundle)
    }

    /// The most recent token bundle, if any.
    pub fn token(&self) -> Option<&TokenBundle> {
        self.token.as_ref().map(|t| &t.bundle)
    }

    /// When the current token was received.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.token.as_ref().map(|t| t.issued_at)
    }

    /// True without a token, or within five minutes of the token's expiry.
    /// A bundle with a zero lifetime is treated as non-expiring.
    pub fn is_token_expired(&self) -> bool {
        self.is_token_expired_at(Utc::now())
    }

    fn is_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        let Some(token) = &self.token else {
            return true;
        };
        if token.bundle.expires_in == 0 {
            return false;
        }

        let lifetime = i64::try_from(token.bundle.expires_in).unwrap_or(i64::MAX);
        let refresh_at = token
            .issued_at
            .checked_add_signed(Duration::seconds(lifetime.saturating_sub(EXPIRY_MARGIN_SECS)));
        refresh_at.map_or(false, |at| now >= at)
    }

    fn bind(&mut self, bundle: TokenBundle) -> Result<SambaSafety> {
        let sdk = SambaSafety::with_config(&bundle.access_token, &self.base_url, self.config.clone())?;
        self.token = Some(IssuedToken {
            bundle,
            issued_at: Utc::now(),
        });
        Ok(sdk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resource;
    use serde_json::json;

    fn authenticator_with(expires_in: u64, issued_at: DateTime<Utc>) -> Authenticator {
        let bundle = TokenBundle::from_value(json!({
            "access_token": "tok",
            "expires_in": expires_in
        }))
        .unwrap();
        Authenticator {
            token: Some(IssuedToken { bundle, issued_at }),
            ..Authenticator::default()
        }
    }

    #[test]
    fn test_no_token_is_expired() {
        assert!(Authenticator::default().is_token_expired());
        assert!(Authenticator::default().token().is_none());
    }

    #[test]
    fn test_fresh_token_is_not_expired() {
        let auth = authenticator_with(3600, Utc::now());
        assert!(!auth.is_token_expired());
        assert_eq!(auth.token().map(|t| t.access_token.as_str()), Some("tok"));
    }

    #[test]
    fn test_token_expires_five_minutes_early() {
        let issued = Utc::now();
        let auth = authenticator_with(3600, issued);

        assert!(!auth.is_token_expired_at(issued + Duration::seconds(3299)));
        assert!(auth.is_token_expired_at(issued + Duration::seconds(3300)));
        assert!(auth.is_token_expired_at(issued + Duration::seconds(4000)));
    }

    #[test]
    fn test_short_lived_token_is_immediately_stale() {
        let auth = authenticator_with(120, Utc::now());
        assert!(auth.is_token_expired());
    }

    #[test]
    fn test_zero_lifetime_never_expires() {
        let auth = authenticator_with(0, Utc::now() - Duration::days(30));
        assert!(!auth.is_token_expired());
    }

    #[tokio::test]
    async fn test_refresh_without_token_fails() {
        let mut auth = Authenticator::new("http://localhost:1");
        let err = auth.refresh("r1").await.unwrap_err();
        assert!(matches!(err, SambaSafetyError::Authentication { status_code: None, .. }));
        assert_eq!(err.message(), "No token data available for refresh");
    }

    #[test]
    fn test_login_with_api_key_leaves_token_alone() {
        let auth = Authenticator::new("http://localhost:1");
        let sdk = auth.login_with_api_key("key").unwrap();
        assert_eq!(sdk.client().base_url().as_str(), "http://localhost:1/");
        assert!(auth.token().is_none());
    }
}
