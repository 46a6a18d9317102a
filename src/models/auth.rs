//! Authentication token bundle.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, PickFirst};

use super::Resource;

/// Default token lifetime when the server omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Tokens returned by the login and refresh endpoints.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Token lifetime in seconds.
    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Resource for TokenBundle {}

impl std::fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBundle")
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}
