//! Error types for Performance Advisor runs.

use atlas_advisor_types::NamespaceError;
use thiserror::Error;

/// Errors that can occur while querying the Performance Advisor.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The request could not be built (malformed URI or header).
    #[error("unable to make request: {0}")]
    Request(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The digest challenge was missing or could not be answered.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API answered with a non-success status.
    #[error("API returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded as UTF-8.
        body: String,
    },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// No process in the project has a primary type label.
    #[error("No Primary Database found")]
    NoPrimary,

    /// A record carried a namespace that is not `database.collection`.
    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AtlasError {
    /// Whether this error ends a run.
    ///
    /// Transport failures, a missing primary and bad configuration are fatal.
    /// Unexpected statuses, undecodable bodies and malformed namespaces are
    /// reported and the run carries on.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AtlasError::Status { .. } | AtlasError::Parse(_) | AtlasError::Namespace(_)
        )
    }
}

impl From<reqwest::Error> for AtlasError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AtlasError::Timeout
        } else if err.is_connect() {
            AtlasError::Connection(err.to_string())
        } else if err.is_builder() {
            AtlasError::Request(err.to_string())
        } else {
            AtlasError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        AtlasError::Parse(err.to_string())
    }
}

impl From<config::ConfigError> for AtlasError {
    fn from(err: config::ConfigError) -> Self {
        AtlasError::Config(err.to_string())
    }
}
