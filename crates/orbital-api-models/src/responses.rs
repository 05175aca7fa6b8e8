//! Typed views over the service responses the CLI branches on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body returned by `POST /v0/oauth2/token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for subsequent calls.
    pub token: String,
    /// Expiry timestamp as reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

/// One page of job results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsPage {
    /// Cursor for the following page; empty when no pages remain.
    #[serde(default)]
    pub next: String,
    /// Result records on this page.
    #[serde(default)]
    pub results: Vec<Value>,
}

impl ResultsPage {
    /// Whether another page can be requested.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.next.is_empty()
    }
}

/// Body returned by `POST /v0/query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCreated {
    /// Identifier of the scheduled query.
    #[serde(rename = "ID", alias = "id")]
    pub id: String,
    /// Remaining fields, kept for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn token_response_requires_token_field() {
        assert!(serde_json::from_value::<TokenResponse>(json!({"expiry": "soon"})).is_err());
        let token: TokenResponse =
            serde_json::from_value(json!({"token": "abc"})).expect("token present");
        assert_eq!(token.token, "abc");
        assert!(token.expiry.is_none());
    }

    #[test]
    fn results_page_defaults_missing_fields() {
        let page: ResultsPage = serde_json::from_value(json!({})).expect("empty page");
        assert!(!page.has_more());
        assert!(page.results.is_empty());
    }

    #[test]
    fn query_created_accepts_either_id_spelling() {
        let upper: QueryCreated =
            serde_json::from_value(json!({"ID": "q-1", "interval": 60})).expect("upper");
        assert_eq!(upper.id, "q-1");
        assert_eq!(upper.extra.get("interval"), Some(&json!(60)));
        let lower: QueryCreated = serde_json::from_value(json!({"id": "q-2"})).expect("lower");
        assert_eq!(lower.id, "q-2");
    }
}
