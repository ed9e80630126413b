//! Error types for parley-core

use thiserror::Error;

/// Result type alias using parley-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while contacting the agent endpoint.
///
/// These never reach the session layer: the dispatcher converts every
/// failure into a displayable assistant message.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
