//! Query descriptors and the probe / scheduled-query request bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::ContextMap;
use crate::error::{ModelError, ModelResult};
use crate::postback::Postback;
use crate::stock::StockInvocation;

/// A single SQL statement with optional per-statement metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// osquery SQL statement.
    pub sql: String,
    /// Optional name reported with results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional label reported with results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Query {
    /// Pair statements with names and labels.
    ///
    /// Empty `names`/`labels` mean "not supplied"; otherwise their length must
    /// equal the number of statements.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::CountMismatch`] when a supplied list does not line
    /// up with the statements.
    pub fn batch(
        sql: Vec<String>,
        names: Vec<String>,
        labels: Vec<String>,
    ) -> ModelResult<Vec<Self>> {
        let expected = sql.len();
        let names = align("names", names, expected)?;
        let labels = align("labels", labels, expected)?;
        Ok(sql
            .into_iter()
            .zip(names)
            .zip(labels)
            .map(|((sql, name), label)| Self { sql, name, label })
            .collect())
    }
}

fn align(
    field: &'static str,
    values: Vec<String>,
    expected: usize,
) -> ModelResult<Vec<Option<String>>> {
    if values.is_empty() {
        return Ok(vec![None; expected]);
    }
    if values.len() != expected {
        return Err(ModelError::CountMismatch {
            field,
            expected,
            actual: values.len(),
        });
    }
    Ok(values.into_iter().map(Some).collect())
}

/// Operating system filter for node selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    /// Microsoft Windows.
    Windows,
    /// Linux distributions.
    Linux,
    /// macOS.
    Darwin,
}

/// Body of `POST /v0/probe`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProbeRequest {
    /// Absolute expiry as unix epoch seconds.
    pub expiry: u64,
    /// Node identifiers; empty selects every node.
    pub nodes: Vec<String>,
    /// Operating system filter; empty applies no filter.
    pub os: Vec<TargetOs>,
    /// Statements to run.
    #[serde(rename = "osQuery")]
    pub os_query: Vec<Query>,
    /// Stock query name, empty when unused.
    pub stock: String,
    /// Stock query parameters.
    pub stockargs: BTreeMap<String, String>,
}

impl ProbeRequest {
    /// Attach a stock invocation, replacing any previous one.
    #[must_use]
    pub fn with_stock(mut self, stock: StockInvocation) -> Self {
        self.stock = stock.name;
        self.stockargs = stock.args;
        self
    }
}

/// Body of `POST /v0/query`: a probe that recurs on an interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryCreateRequest {
    /// Shared probe fields.
    #[serde(flatten)]
    pub probe: ProbeRequest,
    /// Seconds between executions.
    pub interval: u64,
    /// Where results are delivered.
    pub postbacks: Vec<Postback>,
    /// Context returned alongside results.
    pub context: ContextMap,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn batch_without_metadata_attaches_nothing() {
        let queries = Query::batch(strings(&["select 1", "select 2"]), vec![], vec![])
            .expect("no metadata");
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q.name.is_none() && q.label.is_none()));
    }

    #[test]
    fn batch_pairs_names_and_labels_in_order() {
        let queries = Query::batch(
            strings(&["select 1", "select 2"]),
            strings(&["one", "two"]),
            strings(&["l1", "l2"]),
        )
        .expect("aligned metadata");
        assert_eq!(queries[1].name.as_deref(), Some("two"));
        assert_eq!(queries[0].label.as_deref(), Some("l1"));
    }

    #[test]
    fn batch_rejects_count_mismatch() {
        assert_eq!(
            Query::batch(strings(&["select 1", "select 2"]), strings(&["one"]), vec![]),
            Err(ModelError::CountMismatch {
                field: "names",
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            Query::batch(strings(&["select 1"]), vec![], strings(&["a", "b"])),
            Err(ModelError::CountMismatch {
                field: "labels",
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn query_request_flattens_probe_fields() {
        let request = QueryCreateRequest {
            probe: ProbeRequest {
                expiry: 1_700_000_060,
                nodes: strings(&["host-1"]),
                os: vec![TargetOs::Linux],
                os_query: vec![Query {
                    sql: "select * from users".into(),
                    name: None,
                    label: Some("users".into()),
                }],
                ..ProbeRequest::default()
            },
            interval: 3600,
            postbacks: vec![Postback::webhook("wh-1")],
            context: "case=7".parse().expect("valid context"),
        };
        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({
                "expiry": 1_700_000_060,
                "nodes": ["host-1"],
                "os": ["linux"],
                "osQuery": [{"sql": "select * from users", "label": "users"}],
                "stock": "",
                "stockargs": {},
                "interval": 3600,
                "postbacks": [{"webhookid": "wh-1"}],
                "context": {"case": "7"}
            })
        );
    }

    #[test]
    fn with_stock_copies_name_and_arguments() {
        let stock: StockInvocation = "ports proto=tcp".parse().expect("valid stock");
        let request = ProbeRequest::default().with_stock(stock);
        assert_eq!(request.stock, "ports");
        assert_eq!(request.stockargs.get("proto").map(String::as_str), Some("tcp"));
    }
}
