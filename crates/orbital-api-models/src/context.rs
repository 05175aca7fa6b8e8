//! Free-form context attached to scheduled queries.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Arbitrary key/value pairs returned alongside query results.
///
/// Parsed from `key=value` entries separated by any run of `,`, `|`, `;`, or
/// spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextMap(BTreeMap<String, String>);

impl ContextMap {
    /// Borrow the parsed entries.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl FromStr for ContextMap {
    type Err = ModelError;

    fn from_str(raw: &str) -> ModelResult<Self> {
        raw.split([',', '|', ';', ' '])
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                split_pair(entry).ok_or_else(|| ModelError::MalformedContextEntry {
                    entry: entry.to_string(),
                })
            })
            .collect::<ModelResult<BTreeMap<_, _>>>()
            .map(Self)
    }
}

/// Split `key=value`, requiring exactly one `=`.
pub(crate) fn split_pair(token: &str) -> Option<(String, String)> {
    if token.matches('=').count() != 1 {
        return None;
    }
    token
        .split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
}
