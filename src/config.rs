use std::path::{Path, PathBuf};

use directories::BaseDirs;
use gitlab_runners::client::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::result::{AppError, Result};

/// Contents of `glrunners.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// The GitLab API endpoint, e.g. `https://gitlab.example.com/api/v4`
    pub gitlab_url: String,
    /// The access token to authenticate with GitLab
    pub gitlab_token: String,
    /// Log level for the log file, e.g. `debug`
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Values from `GITLAB_API_ENDPOINT` and `GITLAB_API_PRIVATE_TOKEN` take precedence
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("GITLAB_API_ENDPOINT").ok(),
            std::env::var("GITLAB_API_PRIVATE_TOKEN").ok(),
        )
    }

    fn with_overrides(mut self, endpoint: Option<String>, token: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.gitlab_url = endpoint;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.gitlab_token = token;
        }
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.gitlab_url.trim().is_empty() {
            return Err("gitlab_url is required".to_string());
        }
        if self.gitlab_token.trim().is_empty() {
            return Err("gitlab_token is required".to_string());
        }
        Ok(())
    }

    pub fn client_config(&self, debug: bool) -> Result<ClientConfig> {
        self.validate().map_err(AppError::InvalidConfig)?;

        Ok(ClientConfig::new(self.gitlab_url.as_str(), self.gitlab_token.as_str())
            .with_debug_logging(debug))
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("glrunners.toml")
    } else {
        PathBuf::from("glrunners.toml")
    }
}

/// Load the config file if it exists, falling back to defaults
pub fn load_config(config_file: &Path) -> Result<AppConfig> {
    let config = if config_file.exists() {
        confy::load_path(config_file)?
    } else {
        AppConfig::default()
    };

    Ok(config.with_env_overrides())
}

pub fn save_config(config_file: &Path, config: &AppConfig) -> Result<()> {
    confy::store_path(config_file, config)?;

    Ok(())
}
