//! Error types for the sinergia-cal service.

use thiserror::Error;

/// Errors that can occur while building the calendar feed.
#[derive(Error, Debug)]
pub enum SinergiaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream request failed with status {status}: {url}")]
    RequestFailed { url: String, status: u16 },

    #[error("Upstream request error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Result type alias for sinergia-cal operations.
pub type SinergiaResult<T> = Result<T, SinergiaError>;
