//! Error types for SambaSafety API operations.

use thiserror::Error;

/// Errors that can occur during SambaSafety API operations.
#[derive(Debug, Error)]
pub enum SambaSafetyError {
    /// Credentials were rejected (401/403) or no access token was issued.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
    },

    /// The payload was rejected by the server (400/422) or by local validation.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        status_code: Option<u16>,
    },

    /// A successful response did not carry a JSON object of the expected shape.
    #[error("Invalid response format: {0}")]
    ResponseFormat(String),

    /// Any other API failure. `status_code` is `None` when no response was received.
    #[error("SambaSafety API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    /// Configuration is missing or incomplete.
    #[error("SambaSafety configuration required: {0}")]
    ConfigMissing(String),

    /// Configuration value could not be used by the transport.
    #[error("Invalid SambaSafety configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SambaSafetyError {
    /// Local validation failure with no HTTP status.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            status_code: None,
        }
    }

    /// Authentication failure raised by the SDK itself.
    pub(crate) fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code: None,
        }
    }

    /// Map a non-2xx status and its extracted message to the error taxonomy.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Authentication {
                message,
                status_code: Some(status),
            },
            400 | 422 => Self::Validation {
                message,
                status_code: Some(status),
            },
            _ => Self::Api {
                message,
                status_code: Some(status),
            },
        }
    }

    /// The HTTP status code, when the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { status_code, .. }
            | Self::Validation { status_code, .. }
            | Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// The human-readable message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Authentication { message, .. }
            | Self::Validation { message, .. }
            | Self::Api { message, .. } => message.clone(),
            Self::ResponseFormat(msg) | Self::ConfigMissing(msg) | Self::InvalidConfig(msg) => {
                msg.clone()
            }
            Self::InvalidUrl(e) => e.to_string(),
        }
    }
}

impl From<reqwest::Error> for SambaSafetyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Api {
            message: format!("HTTP request failed: {err}"),
            status_code: None,
        }
    }
}

impl From<serde_json::Error> for SambaSafetyError {
    fn from(err: serde_json::Error) -> Self {
        Self::ResponseFormat(err.to_string())
    }
}

/// Result type alias for SambaSafety operations.
pub type Result<T> = core::result::Result<T, SambaSafetyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_taxonomy() {
        let err = SambaSafetyError::from_status(401, "bad token".to_string());
        assert!(matches!(err, SambaSafetyError::Authentication { .. }));
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(err.message(), "bad token");

        let err = SambaSafetyError::from_status(403, "forbidden".to_string());
        assert!(matches!(err, SambaSafetyError::Authentication { .. }));

        let err = SambaSafetyError::from_status(422, "invalid".to_string());
        assert!(matches!(err, SambaSafetyError::Validation { .. }));

        let err = SambaSafetyError::from_status(400, "bad request".to_string());
        assert!(matches!(err, SambaSafetyError::Validation { .. }));

        let err = SambaSafetyError::from_status(500, "boom".to_string());
        assert!(matches!(err, SambaSafetyError::Api { .. }));
        assert_eq!(err.status_code(), Some(500));

        let err = SambaSafetyError::from_status(404, "missing".to_string());
        assert!(matches!(err, SambaSafetyError::Api { .. }));
    }

    #[test]
    fn test_local_validation_has_no_status() {
        let err = SambaSafetyError::validation("Field 'first_name' is required");
        assert_eq!(err.status_code(), None);
        assert_eq!(err.to_string(), "Validation failed: Field 'first_name' is required");
    }
}
