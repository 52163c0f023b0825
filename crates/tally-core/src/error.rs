//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    /// One of the concurrent dashboard fetches failed; the whole load is abandoned
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The remote analysis endpoint failed or timed out
    #[error("Remote analysis failed: {0}")]
    RemoteAnalysis(String),
}

impl Error {
    /// Whether the caller can reasonably retry or fall back to local analysis
    pub fn is_recoverable_analysis_failure(&self) -> bool {
        matches!(self, Self::RemoteAnalysis(_) | Self::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
