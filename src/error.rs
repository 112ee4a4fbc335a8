use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Invalid period '{0}': expected YYYY-MM")]
    InvalidPeriod(String),

    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Unknown client id: {0}")]
    UnknownClient(Uuid),

    #[error("Client name must not be empty")]
    EmptyClientName,

    #[error("Payment matching failed: {0}")]
    MatchingFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
