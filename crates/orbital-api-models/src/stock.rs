//! Stock (catalog) query invocations and catalog entries.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::split_pair;
use crate::error::{ModelError, ModelResult};

/// A named catalog query plus its parameters, parsed from
/// `"name key=value key2=value2"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockInvocation {
    /// Catalog identifier of the stock query.
    pub name: String,
    /// Parameter values keyed by parameter name.
    pub args: BTreeMap<String, String>,
}

impl FromStr for StockInvocation {
    type Err = ModelError;

    fn from_str(raw: &str) -> ModelResult<Self> {
        let mut tokens = raw.split_whitespace();
        let name = tokens.next().ok_or(ModelError::MissingStockName)?;
        let args = tokens
            .map(|token| {
                split_pair(token).ok_or_else(|| ModelError::MalformedStockArgument {
                    token: token.to_string(),
                })
            })
            .collect::<ModelResult<BTreeMap<_, _>>>()?;
        Ok(Self {
            name: name.to_string(),
            args,
        })
    }
}

/// Entry in the stock query catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQuery {
    /// Catalog identifier.
    #[serde(alias = "ID")]
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Operating systems the query supports.
    #[serde(default)]
    pub os: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_arguments() {
        let stock: StockInvocation = "osquery_file path=/etc/hosts depth=2"
            .parse()
            .expect("valid stock");
        assert_eq!(stock.name, "osquery_file");
        assert_eq!(stock.args.get("path").map(String::as_str), Some("/etc/hosts"));
        assert_eq!(stock.args.get("depth").map(String::as_str), Some("2"));
    }

    #[test]
    fn name_without_arguments_is_valid() {
        let stock: StockInvocation = "  listening_ports ".parse().expect("valid stock");
        assert_eq!(stock.name, "listening_ports");
        assert!(stock.args.is_empty());
    }

    #[test]
    fn rejects_tokens_without_exactly_one_equals() {
        assert_eq!(
            "q path".parse::<StockInvocation>(),
            Err(ModelError::MalformedStockArgument {
                token: "path".into()
            })
        );
        assert_eq!(
            "q a=b=c".parse::<StockInvocation>(),
            Err(ModelError::MalformedStockArgument {
                token: "a=b=c".into()
            })
        );
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(
            "   ".parse::<StockInvocation>(),
            Err(ModelError::MissingStockName)
        );
    }

    #[test]
    fn catalog_entry_tolerates_missing_optional_fields() {
        let entry: StockQuery =
            serde_json::from_str(r#"{"id": "ports"}"#).expect("deserialize catalog entry");
        assert_eq!(entry.id, "ports");
        assert!(entry.title.is_empty());
        assert!(entry.os.is_empty());
    }
}
