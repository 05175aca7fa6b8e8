//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use orbital_api_models::{ResultsPage, StockQuery};
use serde_json::Value;

use crate::client::{CliError, CliResult};

pub(crate) fn print_json(value: &Value) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_stock_catalog(catalog: &[StockQuery]) {
    print!("{}", stock_table(catalog));
}

pub(crate) fn render_results_page(page: &ResultsPage) -> CliResult<()> {
    for result in &page.results {
        print_json(result)?;
    }
    if page.has_more() {
        println!("next cursor: {}", page.next);
    }
    Ok(())
}

pub(crate) fn render_status(job_id: &str, page: &ResultsPage) {
    print!("{}", status_summary(job_id, page));
}

/// Prints webhooks as a table, or as JSON when the reply is not a list of objects.
pub(crate) fn render_webhook_list(body: &Value) -> CliResult<()> {
    match webhook_table(body) {
        Some(table) => {
            print!("{table}");
            Ok(())
        }
        None => print_json(body),
    }
}

pub(crate) fn render_feature_list(body: &Value) -> CliResult<()> {
    match feature_table(body) {
        Some(table) => {
            print!("{table}");
            Ok(())
        }
        None => print_json(body),
    }
}

fn stock_table(catalog: &[StockQuery]) -> String {
    let mut out = format!("{:<40} {:<22} TITLE\n", "ID", "OS");
    for entry in catalog {
        out.push_str(&format!(
            "{:<40} {:<22} {}\n",
            entry.id,
            entry.os.join(","),
            entry.title
        ));
    }
    out
}

fn status_summary(job_id: &str, page: &ResultsPage) -> String {
    let pending = if page.has_more() {
        format!("yes (cursor: {})", page.next)
    } else {
        "no".to_string()
    };
    format!(
        "job: {job_id}\nresults: {}\nmore pending: {pending}\n",
        page.results.len()
    )
}

fn webhook_table(body: &Value) -> Option<String> {
    let items = object_list(body, "webhooks")?;
    let mut out = format!("{:<36} {:<8} {:<7} {:<20} URL\n", "ID", "STATE", "FORMAT", "LABEL");
    for item in items {
        let config = item.get("config").unwrap_or(item);
        let state = if item.get("disabled").and_then(Value::as_bool).unwrap_or(false) {
            "disabled"
        } else {
            "enabled"
        };
        let format = match text(config, &["format"]) {
            "" => "default",
            other => other,
        };
        out.push_str(&format!(
            "{:<36} {:<8} {:<7} {:<20} {}\n",
            text(item, &["id", "ID"]),
            state,
            format,
            text(config, &["label"]),
            text(config, &["url"])
        ));
    }
    Some(out)
}

fn feature_table(body: &Value) -> Option<String> {
    let items = object_list(body, "features")?;
    let mut out = format!("{:<36} NAME\n", "ID");
    for item in items {
        out.push_str(&format!(
            "{:<36} {}\n",
            text(item, &["id", "ID"]),
            text(item, &["name", "title", "label"])
        ));
    }
    Some(out)
}

/// Accepts either a bare array of objects or an object wrapping one under `key`.
fn object_list<'a>(body: &'a Value, key: &str) -> Option<&'a [Value]> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) => map.get(key)?.as_array()?,
        _ => return None,
    };
    items
        .iter()
        .all(Value::is_object)
        .then_some(items.as_slice())
}

fn text<'a>(item: &'a Value, keys: &[&str]) -> &'a str {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(Value::as_str))
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn stock_table_lists_each_entry() {
        let catalog = vec![StockQuery {
            id: "osquery.users".into(),
            title: "Local users".into(),
            os: vec!["linux".into(), "darwin".into()],
        }];
        let table = stock_table(&catalog);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("osquery.users"));
        assert!(lines[1].contains("linux,darwin"));
        assert!(lines[1].ends_with("Local users"));
    }

    #[test]
    fn status_summary_reports_pending_pages() {
        let page = ResultsPage {
            next: "c2".into(),
            results: vec![json!({"host": "a"}), json!({"host": "b"})],
        };
        assert_eq!(
            status_summary("job-1", &page),
            "job: job-1\nresults: 2\nmore pending: yes (cursor: c2)\n"
        );
        assert!(status_summary("job-1", &ResultsPage::default()).contains("more pending: no"));
    }

    #[test]
    fn webhook_table_reads_nested_config() {
        let body = json!([{
            "id": "wh-1",
            "disabled": true,
            "config": {"url": "https://hook.example", "format": "splunk", "label": "soc"}
        }]);
        let table = webhook_table(&body).expect("table");
        let row = table.lines().nth(1).expect("row");
        assert!(row.starts_with("wh-1"));
        assert!(row.contains("disabled"));
        assert!(row.contains("splunk"));
        assert!(row.contains("soc"));
        assert!(row.ends_with("https://hook.example"));
    }

    #[test]
    fn unrecognised_list_shapes_fall_back_to_json() {
        assert!(webhook_table(&json!({"count": 0})).is_none());
        assert!(feature_table(&json!(["plain"])).is_none());
        assert!(feature_table(&json!({"features": [{"id": "f1", "name": "Live"}]})).is_some());
    }

    #[test]
    fn feature_table_writes_one_line_per_feature() {
        let body = json!({"features": [
            {"id": "f1", "name": "Live"},
            {"ID": "f2", "title": "Stock"}
        ]});
        let table = feature_table(&body).expect("table");
        assert!(table.ends_with('\n'));
        let rows: Vec<&str> = table.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("f1") && rows[0].ends_with("Live"));
        assert!(rows[1].starts_with("f2") && rows[1].ends_with("Stock"));
    }
}
