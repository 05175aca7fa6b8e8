//! Assembly of [`OrbitalConfig`] from environment variables.
//!
//! # Design
//! - Read every variable through a lookup closure so tests never touch the
//!   real process environment.
//! - Blank values are treated as unset.
//! - Credentials stay raw here; they are parsed only when a command needs to
//!   log in.

use std::time::Duration;

use url::Url;

use crate::defaults::{
    DEFAULT_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, ENV_API_KEY, ENV_DEBUG, ENV_HTTP_TIMEOUT_SECS,
    ENV_INSECURE, ENV_LOG_FORMAT, ENV_TOKEN, ENV_URL,
};
use crate::error::{ConfigError, ConfigResult};

/// Runtime configuration resolved for a single CLI invocation.
#[derive(Debug, Clone)]
pub struct OrbitalConfig {
    /// Base URL of the Orbital service.
    pub base_url: Url,
    /// Raw `id:secret` credential pair, if supplied.
    pub api_key: Option<String>,
    /// Pre-obtained session token, if supplied.
    pub token: Option<String>,
    /// Debug logging and request tracing.
    pub debug: bool,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Requested log format name.
    pub log_format: Option<String>,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}

impl OrbitalConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL or HTTP timeout cannot be parsed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL or HTTP timeout cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = parse_base_url(read(ENV_URL).as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let http_timeout = match read(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(ENV_HTTP_TIMEOUT_SECS, &raw)?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            base_url,
            api_key: read(ENV_API_KEY),
            token: read(ENV_TOKEN),
            debug: env_flag_value(read(ENV_DEBUG).as_deref()),
            insecure: env_flag_value(read(ENV_INSECURE).as_deref()),
            log_format: read(ENV_LOG_FORMAT),
            http_timeout,
        })
    }

    /// Replace the base URL with a caller-supplied override.
    ///
    /// # Errors
    ///
    /// Returns an error when the override is not a usable http(s) URL.
    pub fn override_base_url(&mut self, raw: &str) -> ConfigResult<()> {
        self.base_url = parse_base_url(raw)?;
        Ok(())
    }
}

/// Interpret an environment flag; `1`, `true`, `yes`, and `on` enable it.
#[must_use]
pub fn env_flag_value(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn parse_base_url(raw: &str) -> ConfigResult<Url> {
    let url = raw.trim().parse::<Url>().map_err(|source| ConfigError::InvalidUrl {
        value: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedUrl {
            value: raw.to_string(),
        });
    }
    Ok(url)
}

fn parse_timeout(name: &'static str, raw: &str) -> ConfigResult<Duration> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            name,
            value: raw.to_string(),
        }),
    }
}
