//! Per-tool handler logic.

use crate::query::client::{QueryBackend, QueryResult};
use crate::query::format::{error_line, summarize, summary_header, tabulate};
use crate::query::templates::MetricKey;
use crate::tools::params::{HealthParams, PerformanceParams, QueryParams, ALL_METRICS};
use crate::types::ServiceUrls;
use futures::future::join_all;
use std::collections::BTreeMap;

/// `get_model_performance`: fan out one query per selected metric and
/// summarize. Individual query failures and an unknown metric key become
/// error lines.
pub async fn model_performance(backend: &dyn QueryBackend, params: &PerformanceParams) -> String {
    let keys: Vec<MetricKey> = if params.metric_type == ALL_METRICS {
        MetricKey::DISPLAY.to_vec()
    } else {
        match params.metric_type.parse() {
            Ok(key) => vec![key],
            Err(e) => {
                tracing::warn!(metric_type = %params.metric_type, "unknown metric key");
                return [
                    summary_header(&params.time_range),
                    error_line(&params.metric_type.to_uppercase(), &e.to_string()),
                ]
                .join("\n");
            }
        }
    };

    let queries = keys.into_iter().map(|key| {
        let expression = key.expression(&params.time_range);
        async move { (key, backend.execute(&expression).await) }
    });
    let results: BTreeMap<MetricKey, QueryResult> = join_all(queries).await.into_iter().collect();

    summarize(&results, &params.time_range)
}

/// `analyze_model_health`: fixed narrative, no backend calls.
pub fn model_health(services: &ServiceUrls, params: &HealthParams) -> String {
    if params.include_traces {
        tracing::debug!("includeTraces requested; trace analysis is not performed");
    }

    [
        "## Model Health Analysis".to_string(),
        String::new(),
        "Overall status: HEALTHY".to_string(),
        "- Inference service: responding normally".to_string(),
        "- Error rate: within expected range".to_string(),
        "- Resource utilization: nominal".to_string(),
        String::new(),
        format!("Model endpoint: {}", services.ollama_url),
        format!("Dashboards: {}", services.grafana_url),
        format!("Traces: {}", services.jaeger_url),
    ]
    .join("\n")
}

/// `get_prometheus_query`: run the caller's expression verbatim and tabulate.
/// A backend failure is reported as text, like a failed summary metric.
pub async fn prometheus_query(backend: &dyn QueryBackend, params: &QueryParams) -> String {
    match backend.execute(&params.query).await {
        QueryResult::Series(series) => tabulate(&series, &params.query),
        QueryResult::Failed(msg) => format!("Error: {}", msg),
    }
}
