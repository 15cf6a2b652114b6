//! Error types for Solr requests.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Network or HTTP-level failure. Never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, timeout or body read failure from the HTTP client.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Solr answered with a non-success status.
    #[error("Solr returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Base URL and handler path did not form a valid URL.
    #[error("Invalid request URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Malformed response body.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed XML response: {0}")]
    Xml(String),
}

/// Top-level error returned by the client.
#[derive(Debug, Error)]
pub enum SolrError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No handler registered under the requested name.
    #[error("No request handler named '{0}'")]
    UnknownHandler(String),
}

/// Result type for client operations.
pub type SolrResult<T> = Result<T, SolrError>;
