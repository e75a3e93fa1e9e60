//! Error types shared across the crate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JobswpError>;

#[derive(Debug, Error)]
pub enum JobswpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Vacancy already exists: {0}")]
    DuplicateVacancy(String),

    #[error("Refresh error: {0}")]
    Refresh(String),
}
