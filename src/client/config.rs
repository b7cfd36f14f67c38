//! Configuration management for GitLab client

use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;

use super::error::{ClientError, Result};

/// Main configuration for GitLab client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GitLab API base URL, e.g. `https://gitlab.example.com/api/v4`
    pub base_url: CompactString,
    /// Access token
    pub private_token: CompactString,
    /// How the token is presented to GitLab
    pub token_kind: TokenKind,
    /// Username or id to impersonate through the `Sudo` header
    pub sudo: Option<CompactString>,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// Authentication header used for the access token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenKind {
    /// Personal, project or group access token sent as `PRIVATE-TOKEN`
    #[default]
    Private,
    /// OAuth2 token sent as `Authorization: Bearer`
    OAuth,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: CompactString,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Dump raw HTTP response bodies to files
    pub log_responses: bool,
    /// Directory for the response dumps
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("gitlab-runners/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_responses: false,
            log_directory: Some(PathBuf::from("glrunners-responses")),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(
        base_url: impl Into<CompactString>,
        private_token: impl Into<CompactString>,
    ) -> Self {
        let base_url: CompactString = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').into(),
            private_token: private_token.into(),
            token_kind: TokenKind::default(),
            sudo: None,
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config_validation("base_url", "cannot be empty"));
        }

        if self.private_token.is_empty() {
            return Err(ClientError::config_validation("private_token", "cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config_validation(
                "base_url",
                "must start with http:// or https://",
            ));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config_validation("timeout", "must be greater than zero"));
        }

        Ok(())
    }

    /// Set the token kind
    pub fn with_token_kind(mut self, kind: TokenKind) -> Self {
        self.token_kind = kind;
        self
    }

    /// Impersonate another user on every request
    pub fn with_sudo(mut self, sudo: Option<CompactString>) -> Self {
        self.sudo = sudo;
        self
    }

    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Set debug configuration
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Enable dumping of response bodies
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<CompactString>,
    private_token: Option<CompactString>,
    token_kind: TokenKind,
    sudo: Option<CompactString>,
    request: Option<RequestConfig>,
    debug: Option<DebugConfig>,
}

impl ClientConfigBuilder {
    /// Set base URL
    pub fn base_url(mut self, url: impl Into<CompactString>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set private token
    pub fn private_token(mut self, token: impl Into<CompactString>) -> Self {
        self.private_token = Some(token.into());
        self
    }

    /// Present the token as an OAuth2 bearer token
    pub fn oauth_token(mut self, token: impl Into<CompactString>) -> Self {
        self.private_token = Some(token.into());
        self.token_kind = TokenKind::OAuth;
        self
    }

    pub fn sudo(mut self, sudo: impl Into<CompactString>) -> Self {
        self.sudo = Some(sudo.into());
        self
    }

    /// Set request configuration
    pub fn request(mut self, request: RequestConfig) -> Self {
        self.request = Some(request);
        self
    }

    /// Set debug configuration
    pub fn debug(mut self, debug: DebugConfig) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Enable dumping of response bodies
    pub fn debug_logging(mut self, enabled: bool) -> Self {
        let mut debug = self.debug.unwrap_or_default();
        debug.log_responses = enabled;
        self.debug = Some(debug);
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let mut request = self.request.unwrap_or_default();
        request.timeout = timeout;
        self.request = Some(request);
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<CompactString>) -> Self {
        let mut request = self.request.unwrap_or_default();
        request.user_agent = user_agent.into();
        self.request = Some(request);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::config("Base URL is required"))?;
        let private_token = self
            .private_token
            .ok_or_else(|| ClientError::config("Private token is required"))?;

        let config = ClientConfig::new(base_url, private_token)
            .with_token_kind(self.token_kind)
            .with_sudo(self.sudo)
            .with_request(self.request.unwrap_or_default())
            .with_debug(self.debug.unwrap_or_default());

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .base_url("https://gitlab.example.com/api/v4/")
            .private_token("test-token")
            .sudo("root")
            .timeout(Duration::from_secs(5))
            .debug_logging(true)
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://gitlab.example.com/api/v4");
        assert_eq!(config.private_token, "test-token");
        assert_eq!(config.token_kind, TokenKind::Private);
        assert_eq!(config.sudo, Some("root".into()));
        assert_eq!(config.request.timeout, Duration::from_secs(5));
        assert!(config.debug.log_responses);
    }

    #[test]
    fn test_oauth_token() {
        let config = ClientConfig::builder()
            .base_url("https://gitlab.com/api/v4")
            .oauth_token("oauth-token")
            .build()
            .unwrap();

        assert_eq!(config.token_kind, TokenKind::OAuth);
    }

    #[test]
    fn test_config_validation() {
        // Valid config
        let config = ClientConfig::new("https://gitlab.com/api/v4", "token");
        assert!(config.validate().is_ok());

        // Empty base URL
        let config = ClientConfig::new("", "token");
        assert!(config.validate().is_err());

        // Empty token
        let config = ClientConfig::new("https://gitlab.com/api/v4", "");
        assert!(matches!(
            config.validate(),
            Err(ClientError::ConfigValidation { field, .. }) if field == "private_token"
        ));

        // Invalid URL
        let config = ClientConfig::new("not-a-url", "token");
        assert!(config.validate().is_err());

        // Zero timeout
        let config = ClientConfig::new("https://gitlab.com/api/v4", "token").with_request(
            RequestConfig { timeout: Duration::ZERO, ..Default::default() },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_requires_token() {
        let result = ClientConfig::builder()
            .base_url("https://gitlab.com/api/v4")
            .build();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
