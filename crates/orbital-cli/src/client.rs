//! Application context and the CLI error type.

use std::fmt::{self, Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::anyhow;
use orbital_api::{ApiError, ApiOutcome, ApiResult, ClientOptions, OrbitalClient, ServiceFailure};
use orbital_api_models::ModelError;
use orbital_config::{ConfigError, OrbitalConfig};

/// CLI-level error type; every variant exits with status 1.
#[derive(Debug)]
pub(crate) enum CliError {
    /// Local input error, raised before any network call.
    Validation(String),
    /// The session token could not be obtained.
    Auth(String),
    /// The service answered with an error.
    Service(ServiceFailure),
    /// Network, decoding, or setup failure.
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Auth(_) | Self::Service(_) | Self::Failure(_) => 1,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Auth(message) => format!("authentication failed: {message}"),
            Self::Service(failure) => failure.to_string(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

impl From<ModelError> for CliError {
    fn from(err: ModelError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Failure(anyhow!(err))
    }
}

/// Unwrap an API call, turning transport errors and service failures into `CliError`.
pub(crate) fn service_result<T>(result: ApiResult<ApiOutcome<T>>) -> CliResult<T> {
    result?.into_result().map_err(CliError::Service)
}

/// Application context passed to command handlers.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) api: OrbitalClient,
    pub(crate) api_key: Option<String>,
    pub(crate) token: Option<String>,
}

impl AppContext {
    /// Build the HTTP client and capture credentials from the loaded configuration.
    pub(crate) fn from_config(config: &OrbitalConfig, trace_id: &str) -> CliResult<Self> {
        let api = OrbitalClient::new(&ClientOptions {
            base_url: config.base_url.clone(),
            insecure: config.insecure,
            timeout: config.http_timeout,
            request_id: Some(trace_id.to_string()),
        })?;
        Ok(Self {
            api,
            api_key: config.api_key.clone(),
            token: config.token.clone(),
        })
    }
}

pub(crate) fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use httpmock::MockServer;
    use orbital_api::{ClientOptions, OrbitalClient};

    use super::AppContext;

    /// Context pointed at a mock server, authenticated with a pre-supplied token.
    pub(crate) fn context_with(server: &MockServer) -> AppContext {
        context_with_credentials(server, None, Some("tok"))
    }

    pub(crate) fn context_with_credentials(
        server: &MockServer,
        api_key: Option<&str>,
        token: Option<&str>,
    ) -> AppContext {
        let api = OrbitalClient::new(&ClientOptions {
            base_url: server.base_url().parse().expect("valid URL"),
            insecure: false,
            timeout: Duration::from_secs(5),
            request_id: None,
        })
        .expect("client builds");
        AppContext {
            api,
            api_key: api_key.map(str::to_string),
            token: token.map(str::to_string),
        }
    }
}
