//! Result formatting: narrative summaries and markdown tables.
//!
//! Unit conversion happens only in [`summarize`]. [`tabulate`] always renders
//! the backend's raw value string so a tabulated value round-trips exactly.

use crate::query::client::{QueryResult, Sample, NAME_LABEL};
use crate::query::templates::MetricKey;
use std::collections::BTreeMap;

/// Returned by [`tabulate`] for an empty series list.
pub const NO_RESULTS: &str = "No results found for query.";

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Title line of a performance summary.
pub fn summary_header(time_window: &str) -> String {
    format!("## Model Performance (last {})", time_window)
}

/// One labeled line per metric, in declared metric order.
///
/// Failed metrics show their error text; metrics with no series are omitted.
pub fn summarize(results: &BTreeMap<MetricKey, QueryResult>, time_window: &str) -> String {
    let mut lines = vec![summary_header(time_window)];

    for (key, result) in results {
        match result {
            QueryResult::Failed(msg) => lines.push(error_line(key.label(), msg)),
            QueryResult::Series(series) => {
                if let Some(first) = series.first() {
                    lines.push(format!(
                        "- **{}**: {}",
                        key.label(),
                        convert_value(*key, first.raw_value())
                    ));
                }
            }
        }
    }

    lines.join("\n")
}

/// Summary line for a metric that produced no value.
pub fn error_line(label: &str, msg: &str) -> String {
    format!("- **{}**: Error - {}", label, msg)
}

/// Render a raw value with the per-metric unit rule.
fn convert_value(key: MetricKey, raw: &str) -> String {
    let Ok(value) = raw.parse::<f64>() else {
        return raw.to_string();
    };

    match key {
        MetricKey::Latency => format!("{:.2}ms", value * 1000.0),
        MetricKey::Throughput => format!("{:.2} req/s", value),
        MetricKey::Memory => format!("{:.2}MB", value / BYTES_PER_MB),
        MetricKey::Gpu => format!("{:.1}%", value),
        _ => raw.to_string(),
    }
}

/// Markdown table with one row per series: name, raw value, labels.
pub fn tabulate(series: &[Sample], query: &str) -> String {
    if series.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut lines = Vec::with_capacity(series.len() + 4);
    lines.push(format!("Query: `{}`", query));
    lines.push(String::new());
    lines.push("| Metric | Value | Labels |".to_string());
    lines.push("|--------|-------|--------|".to_string());

    for sample in series {
        lines.push(format!(
            "| {} | {} | {} |",
            sample.name().unwrap_or("value"),
            sample.raw_value(),
            render_labels(&sample.labels)
        ));
    }

    lines.join("\n")
}

fn render_labels(labels: &BTreeMap<String, String>) -> String {
    labels
        .iter()
        .filter(|(k, _)| k.as_str() != NAME_LABEL)
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}
