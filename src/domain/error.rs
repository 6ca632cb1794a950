//! Domain-level error types for subreddit-harvest.
//!
//! All errors are typed with `thiserror`. Remote failures and export failures
//! share one enum so the collector and exporter can report them uniformly.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// OAuth token request was rejected or returned no token.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Transport-level HTTP failure (connect, timeout, body decode).
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Remote API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response or record did not have the expected shape.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// JSON parsing or serialization failed.
    #[error("JSON error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// CSV writing failed.
    #[error("CSV error: {message}")]
    Csv {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Failed to open or write the database.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create an HTTP error from a reqwest error.
    pub fn http(err: reqwest::Error) -> Self {
        Self::Http {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a CSV error.
    pub fn csv(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Whether this error came from talking to the remote API.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::Http { .. } | Self::Api { .. })
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
