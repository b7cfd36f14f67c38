//! Error types for GitLab client operations

use std::time::Duration;

use compact_str::CompactString;
use thiserror::Error;

/// Structured error types for GitLab client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error with endpoint context
    #[error("Failed to parse JSON response from {endpoint}: {source}")]
    JsonParse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON that does not have the shape the operation returns
    #[error("Unexpected response from {endpoint}: expected {expected}")]
    UnexpectedShape { endpoint: String, expected: &'static str },

    /// GitLab API returned an error response
    #[error("GitLab API error (HTTP {status}): {message}")]
    GitlabApi { status: u16, message: CompactString, body: String },

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration field validation failed
    #[error("Invalid {field}: {message}")]
    ConfigValidation { field: String, message: String },

    /// The token was rejected (HTTP 401)
    #[error("Authentication failed")]
    Authentication { body: String },

    /// The token lacks permission for the resource (HTTP 403)
    #[error("Access forbidden")]
    Forbidden { body: String },

    /// Resource not found (HTTP 404)
    #[error("Resource not found: {path}")]
    NotFound { path: String, body: String },

    /// A pagination link pointed away from the configured GitLab origin
    #[error("Refusing to follow link to another origin: {url}")]
    ForeignLink { url: String },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimit { retry_after: Option<Duration>, body: String },
}

impl ClientError {
    /// Create a JSON parsing error with endpoint context
    pub fn json_parse(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse { endpoint: endpoint.into(), source }
    }

    pub fn unexpected_shape(endpoint: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedShape { endpoint: endpoint.into(), expected }
    }

    /// Create a GitLab API error
    pub fn gitlab_api(
        status: u16,
        message: impl Into<CompactString>,
        body: impl Into<String>,
    ) -> Self {
        Self::GitlabApi { status, message: message.into(), body: body.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a configuration field validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }

    /// Create a not found error
    pub fn not_found(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self::NotFound { path: path.into(), body: body.into() }
    }

    /// Create a rate limit error
    pub fn rate_limit(retry_after: Option<Duration>, body: impl Into<String>) -> Self {
        Self::RateLimit { retry_after, body: body.into() }
    }

    /// HTTP status of the response that caused this error, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Authentication { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::NotFound { .. } => Some(404),
            ClientError::RateLimit { .. } => Some(429),
            ClientError::GitlabApi { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body of the failed request, if there was one
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::Authentication { body }
            | ClientError::Forbidden { body }
            | ClientError::NotFound { body, .. }
            | ClientError::RateLimit { body, .. }
            | ClientError::GitlabApi { body, .. } => Some(body),
            _ => None,
        }
    }

}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
