use confy::ConfyError;
use gitlab_runners::client::ClientError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failure reading configuration file.")]
    ConfigError(#[source] ConfyError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<ConfyError> for AppError {
    fn from(e: ConfyError) -> Self {
        AppError::ConfigError(e)
    }
}
