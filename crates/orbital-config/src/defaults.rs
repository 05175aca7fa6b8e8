//! Environment variable names and fallback values.
//!
//! # Design
//! - Keep every variable the CLI reads in one place so `--help` text and the
//!   loader cannot drift apart.

/// Enables debug logging and request/response tracing.
pub const ENV_DEBUG: &str = "ORBITAL_DEBUG";
/// Credential pair formatted as `id:secret`.
pub const ENV_API_KEY: &str = "ORBITAL_API_KEY";
/// Pre-obtained session token; skips the login round trip when present.
pub const ENV_TOKEN: &str = "ORBITAL_TOKEN";
/// Base URL of the Orbital service.
pub const ENV_URL: &str = "ORBITAL_URL";
/// Disables TLS certificate verification.
pub const ENV_INSECURE: &str = "ORBITAL_INSECURE";
/// Log output format (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "ORBITAL_LOG_FORMAT";
/// Per-request HTTP timeout in seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "ORBITAL_HTTP_TIMEOUT_SECS";

/// Service URL used when `ORBITAL_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://localhost:1957";
/// HTTP timeout used when `ORBITAL_HTTP_TIMEOUT_SECS` is unset.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
