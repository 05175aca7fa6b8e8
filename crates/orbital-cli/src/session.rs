//! Session token acquisition.
//!
//! A token is obtained at most once per invocation: the pre-supplied
//! `ORBITAL_TOKEN` wins, otherwise the API key is exchanged at the login
//! endpoint. Any login failure is fatal and never retried.

use orbital_api::{ApiOutcome, OrbitalClient};
use orbital_config::ApiKey;
use tracing::debug;

use crate::client::{AppContext, CliError, CliResult};

/// Authenticated view of the API for the rest of the invocation.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    api: OrbitalClient,
}

impl Session {
    pub(crate) async fn establish(ctx: &AppContext) -> CliResult<Self> {
        let token = match &ctx.token {
            Some(token) => {
                debug!("using pre-supplied session token");
                token.clone()
            }
            None => login(ctx).await?,
        };
        Ok(Self {
            api: ctx.api.with_token(token),
        })
    }

    pub(crate) const fn api(&self) -> &OrbitalClient {
        &self.api
    }
}

/// Exchange the configured API key for a fresh token.
pub(crate) async fn login(ctx: &AppContext) -> CliResult<String> {
    let raw = ctx.api_key.as_deref().ok_or_else(|| {
        CliError::validation("API key is required (set ORBITAL_API_KEY or ORBITAL_TOKEN)")
    })?;
    let key = ApiKey::parse(raw)?;

    let outcome = ctx
        .api
        .login(&key)
        .await
        .map_err(|err| CliError::auth(err.to_string()))?;
    match outcome {
        ApiOutcome::Success(response) if !response.token.trim().is_empty() => {
            debug!(expiry = ?response.expiry, "session token issued");
            Ok(response.token)
        }
        ApiOutcome::Success(_) => Err(CliError::auth("login response did not include a token")),
        ApiOutcome::Failure(failure) => Err(CliError::auth(failure.to_string())),
    }
}
