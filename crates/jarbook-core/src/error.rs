//! Error types for Jarbook

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Jar percentages add up to {total}%, expected 100%")]
    AllocationMismatch { total: u32 },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any failure of an AI gateway call. The cause is logged, never exposed.
    #[error("AI coaching is unavailable right now, please try again")]
    CoachingUnavailable,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
