use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("not initialized: run 'devcoach init'")]
    NotInitialized,

    #[error("invalid coaching level '{0}': expected 'peter' or 'ransom'")]
    InvalidLevel(String),

    #[error("invalid phase: {0}")]
    InvalidPhase(String),

    #[error("rate limit exceeded for '{key}': {limit} requests per {window_secs}s")]
    RateLimited {
        key: String,
        limit: usize,
        window_secs: u64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoachError>;
