use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("API credential is empty. Pass --api-key or set the OPENAI_API_KEY environment variable.")]
    MissingCredential,

    #[error("Credential rejected by the backend: {0}")]
    InvalidCredential(String),

    #[error("Rate limit exceeded{}", .retry_after.map(|s| format!(". Retry after {} seconds", s)).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TtsError>;
