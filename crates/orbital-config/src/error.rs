//! Error types for configuration loading.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed.
    #[error("invalid base URL '{value}': {source}")]
    InvalidUrl {
        /// Raw value supplied by the caller.
        value: String,
        /// Parser failure.
        source: url::ParseError,
    },
    /// The base URL parsed but cannot carry endpoint paths.
    #[error("base URL '{value}' must use http or https")]
    UnsupportedUrl {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The HTTP timeout was not a positive integer.
    #[error("invalid value for {name}: expected a positive number of seconds, got '{value}'")]
    InvalidTimeout {
        /// Variable the value was read from.
        name: &'static str,
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The API key did not contain exactly one `:` separator.
    #[error("API key must be formatted as id:secret")]
    MalformedApiKey,
    /// One side of the API key was empty.
    #[error("API key components cannot be empty strings")]
    EmptyApiKeyComponent,
}
