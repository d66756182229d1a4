//! Typed error hierarchy for the yno-client crate.
//!
//! `YnoError` has one variant per failure boundary a call can cross:
//! - Construction: the base URL or a header option could not be parsed.
//!   These surface from `YnoClient::new` / `ClientOption::header` and never
//!   involve the network.
//! - `Validation`: a request DTO rejected itself before any I/O. The inner
//!   [`ValidationError`] is passed through verbatim.
//! - `Serialize`: the request body could not be encoded as JSON.
//! - `Network`: the request did not produce an HTTP status (DNS, TCP, TLS,
//!   timeout, cancellation). Wraps `reqwest::Error`.
//! - `Api`: the server answered outside `[200, 299]`. The raw body is kept
//!   because the API embeds structured error detail there.
//! - `Decode`: the server answered 2xx but the body did not match the
//!   expected response type. Kept apart from `Api` so callers can tell
//!   "server said OK but the body was bad" from "server said not OK".

use reqwest::StatusCode;

use crate::validate::ValidationError;

/// Unified error type for all yno-client operations.
#[derive(Debug, thiserror::Error)]
pub enum YnoError {
    /// The base URL passed to the client constructor is not an absolute URL
    /// that relative paths can be resolved against.
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected input.
        url: String,
        /// Parse failure, absent when the URL parsed but cannot be a base
        /// (e.g. `mailto:` URLs).
        #[source]
        source: Option<url::ParseError>,
    },

    /// A request path could not be resolved against the base URL.
    #[error("invalid path: {path}")]
    InvalidPath {
        /// The rejected relative path.
        path: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// A header option carried a name or value that is not valid in HTTP.
    #[error("invalid header {name}")]
    InvalidHeader {
        /// The header name as supplied by the caller.
        name: String,
        /// `InvalidHeaderName` or `InvalidHeaderValue` from reqwest.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Client-side request validation failed. No request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body could not be serialized to JSON.
    #[error("failed to marshal request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A network-level failure occurred (connection refused, DNS, TLS,
    /// timeout). No HTTP status code is available.
    #[error("failed to execute request: {0}")]
    Network(#[from] reqwest::Error),

    /// The API returned a status code outside `[200, 299]`.
    #[error("API error: {message}: {body}")]
    Api {
        /// The HTTP status code returned by the API.
        status: StatusCode,
        /// Always `request failed with status code N`.
        message: String,
        /// The raw response body text, or an empty string if it could not
        /// be read.
        body: String,
    },

    /// A 2xx response body could not be decoded into the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl YnoError {
    /// Returns the HTTP status for `Api` errors and for network errors that
    /// carry one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            YnoError::Api { status, .. } => Some(*status),
            YnoError::Network(err) => err.status(),
            _ => None,
        }
    }

    /// Whether the request was aborted because its deadline elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, YnoError::Network(err) if err.is_timeout())
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, YnoError>;
