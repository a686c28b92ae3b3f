use crate::domain::audiobook::AudiobookError;
use crate::infrastructure::config::ConfigError;
use crate::infrastructure::google::CredentialsError;

/// Exit code for a missing credentials configuration
pub const EXIT_MISSING_CREDENTIALS: i32 = -1;
pub const EXIT_FAILURE: i32 = 1;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Audiobook(#[from] AudiobookError),
}

impl AppError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(ConfigError::MissingCredentials { .. }) => EXIT_MISSING_CREDENTIALS,
            _ => EXIT_FAILURE,
        }
    }

    /// Whether re-running with the same output name picks up cached segments
    pub fn is_resumable(&self) -> bool {
        matches!(self, Self::Audiobook(AudiobookError::Synthesis { .. }))
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
