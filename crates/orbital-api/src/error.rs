//! Transport and decoding errors for API calls.

use thiserror::Error;

/// Result alias for API client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures that prevent a usable response from being obtained.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL cannot carry endpoint paths.
    #[error("base URL '{url}' cannot be used to build endpoint paths")]
    InvalidBaseUrl {
        /// Offending base URL.
        url: String,
    },
    /// Building the underlying HTTP client failed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// Sending the request or reading the response failed.
    #[error("request to {operation} failed: {source}")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The response body did not have the expected shape.
    #[error("unexpected response from {operation}: {source}")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}
