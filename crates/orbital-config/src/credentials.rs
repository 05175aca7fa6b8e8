//! Credential pair parsing.

use std::fmt::{self, Debug, Formatter};

use crate::error::{ConfigError, ConfigResult};

/// Client id and secret parsed from a single `id:secret` string.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    client_id: String,
    secret: String,
}

impl ApiKey {
    /// Parse an `id:secret` credential pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedApiKey`] unless the input contains
    /// exactly one `:`, and [`ConfigError::EmptyApiKeyComponent`] when either
    /// side of the separator is blank.
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        let trimmed = raw.trim();
        if trimmed.matches(':').count() != 1 {
            return Err(ConfigError::MalformedApiKey);
        }
        let (client_id, secret) = trimmed
            .split_once(':')
            .ok_or(ConfigError::MalformedApiKey)?;
        if client_id.trim().is_empty() || secret.trim().is_empty() {
            return Err(ConfigError::EmptyApiKeyComponent);
        }
        Ok(Self {
            client_id: client_id.trim().to_string(),
            secret: secret.trim().to_string(),
        })
    }

    /// Client identifier half of the pair.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Secret half of the pair.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl Debug for ApiKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ApiKey")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}
