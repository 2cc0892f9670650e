//! Tool dispatcher: validates, routes and normalizes tool invocations.
//!
//! [`Dispatcher::dispatch`] keeps failures typed. [`Dispatcher::call`] is the
//! boundary adapter that renders any outcome into a [`ToolResponse`], so no
//! tool failure ever reaches the transport as a fault.

use crate::query::client::{PrometheusClient, QueryBackend};
use crate::tools::catalog::ToolCatalog;
use crate::tools::envelope::ToolResponse;
use crate::tools::handlers;
use crate::tools::params::ToolCall;
use crate::types::{Config, Result, ServiceUrls};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Successful handler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// Stateless router from tool name to handler.
///
/// Holds only immutable state and is shared across concurrent invocations.
pub struct Dispatcher {
    catalog: ToolCatalog,
    backend: Arc<dyn QueryBackend>,
    services: ServiceUrls,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("catalog", &self.catalog)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn QueryBackend>, services: ServiceUrls) -> Self {
        Self {
            catalog: ToolCatalog::builtin(),
            backend,
            services,
        }
    }

    /// Build a dispatcher backed by a real Prometheus client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = PrometheusClient::new(&config.services, &config.backend)?;
        tracing::info!(endpoint = client.endpoint(), "prometheus client ready");
        Ok(Self::new(Arc::new(client), config.services.clone()))
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Validate and run one tool invocation.
    pub async fn dispatch(&self, tool_name: &str, arguments: &Value) -> Result<ToolOutput> {
        let call = ToolCall::parse(&self.catalog, tool_name, arguments)?;
        Ok(self.run(call).await.into())
    }

    async fn run(&self, call: ToolCall) -> String {
        match call {
            ToolCall::ModelPerformance(params) => {
                handlers::model_performance(self.backend.as_ref(), &params).await
            }
            ToolCall::ModelHealth(params) => handlers::model_health(&self.services, &params),
            ToolCall::PrometheusQuery(params) => {
                handlers::prometheus_query(self.backend.as_ref(), &params).await
            }
        }
    }

    /// Run one invocation and render the outcome as a response envelope.
    pub async fn call(&self, tool_name: &str, arguments: &Value) -> ToolResponse {
        let started = Instant::now();
        tracing::debug!(tool = tool_name, "tool invocation");

        match self.dispatch(tool_name, arguments).await {
            Ok(output) => {
                tracing::debug!(
                    tool = tool_name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "tool succeeded"
                );
                ToolResponse::text(output.text)
            }
            Err(e) => {
                tracing::warn!(tool = tool_name, error = %e, "tool failed");
                ToolResponse::failure(tool_name, &e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::client::{MockQueryBackend, QueryResult, Sample};
    use crate::types::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn series(value: &str) -> QueryResult {
        QueryResult::Series(vec![Sample::new(BTreeMap::new(), 1_700_000_000.0, value)])
    }

    fn dispatcher(mock: MockQueryBackend) -> Dispatcher {
        Dispatcher::new(Arc::new(mock), ServiceUrls::default())
    }

    #[tokio::test]
    async fn test_unknown_tool_envelope() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute().never();

        let resp = dispatcher(mock).call("does_not_exist", &json!({})).await;
        assert_eq!(
            resp.first_text(),
            Some("Error executing does_not_exist: Unknown tool: does_not_exist")
        );
    }

    #[tokio::test]
    async fn test_missing_query_makes_no_backend_call() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute().never();
        let d = dispatcher(mock);

        let err = d.dispatch("get_prometheus_query", &json!({})).await.unwrap_err();
        assert!(matches!(err, Error::MissingRequiredParameter(ref p) if p == "query"));

        let resp = d.call("get_prometheus_query", &json!({"timeRange": "5m"})).await;
        assert_eq!(
            resp.first_text(),
            Some("Error executing get_prometheus_query: Missing required parameter: query")
        );
    }

    #[tokio::test]
    async fn test_all_fans_out_to_display_metrics() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute()
            .times(4)
            .returning(|expr| {
                if expr.contains("duration_seconds_bucket") {
                    series("0.25")
                } else if expr.contains("requests_total") {
                    QueryResult::failed("boom")
                } else if expr.contains("resident_memory") {
                    series("1048576")
                } else {
                    QueryResult::Series(vec![])
                }
            });

        let out = dispatcher(mock)
            .dispatch("get_model_performance", &json!({}))
            .await
            .unwrap();
        assert_eq!(
            out.text,
            "## Model Performance (last 5m)\n\
             - **LATENCY**: 250.00ms\n\
             - **THROUGHPUT**: Error - boom\n\
             - **MEMORY**: 1.00MB"
        );
    }

    #[tokio::test]
    async fn test_all_never_queries_errors_template() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute()
            .withf(|expr| expr.contains("5.."))
            .never();
        mock.expect_execute()
            .times(4)
            .returning(|_| QueryResult::Series(vec![]));

        let out = dispatcher(mock)
            .dispatch("get_model_performance", &json!({"metric_type": "all"}))
            .await
            .unwrap();
        assert_eq!(out.text, "## Model Performance (last 5m)");
    }

    #[tokio::test]
    async fn test_single_metric_uses_window() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute()
            .withf(|expr| expr.to_string() == "sum(rate(ollama_requests_total[1h]))")
            .times(1)
            .returning(|_| series("12.346"));

        let out = dispatcher(mock)
            .dispatch(
                "get_model_performance",
                &json!({"metric_type": "throughput", "timeRange": "1h"}),
            )
            .await
            .unwrap();
        assert_eq!(out.text, "## Model Performance (last 1h)\n- **THROUGHPUT**: 12.35 req/s");
    }

    #[tokio::test]
    async fn test_registry_key_outside_declared_choices_is_queried() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute()
            .withf(|expr| expr.contains("5.."))
            .times(1)
            .returning(|_| series("0.01"));

        let out = dispatcher(mock)
            .dispatch("get_model_performance", &json!({"metric_type": "errors"}))
            .await
            .unwrap();
        assert!(out.text.ends_with("- **ERRORS**: 0.01"));
    }

    #[tokio::test]
    async fn test_unknown_metric_type_becomes_error_line() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute().never();

        let resp = dispatcher(mock)
            .call(
                "get_model_performance",
                &json!({"metric_type": "disk", "timeRange": "15m"}),
            )
            .await;
        assert!(!resp.is_failure());
        assert_eq!(
            resp.first_text(),
            Some("## Model Performance (last 15m)\n- **DISK**: Error - Unknown metric key: disk")
        );
    }

    #[tokio::test]
    async fn test_health_is_fixed_and_backend_free() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute().never();
        let d = dispatcher(mock);

        let plain = d.dispatch("analyze_model_health", &json!({})).await.unwrap();
        let traced = d
            .dispatch("analyze_model_health", &json!({"includeTraces": true}))
            .await
            .unwrap();
        assert_eq!(plain, traced);
        assert!(plain.text.contains("HEALTHY"));
        assert!(plain.text.contains("Traces: http://localhost:16686"));
    }

    #[tokio::test]
    async fn test_prometheus_query_sends_expression_unmodified() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute()
            .withf(|expr| expr.to_string() == "rate(x[5m])")
            .times(1)
            .returning(|_| series("0.523"));

        let out = dispatcher(mock)
            .dispatch(
                "get_prometheus_query",
                &json!({"query": "rate(x[5m])", "timeRange": "24h"}),
            )
            .await
            .unwrap();
        assert!(out.text.contains("| value | 0.523 |  |"));
    }

    #[tokio::test]
    async fn test_prometheus_query_failure_is_data() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| QueryResult::failed("Prometheus unreachable: connection refused"));

        let resp = dispatcher(mock)
            .call("get_prometheus_query", &json!({"query": "up"}))
            .await;
        assert_eq!(
            resp.first_text(),
            Some("Error: Prometheus unreachable: connection refused")
        );
        assert!(!resp.is_failure());
    }

    #[tokio::test]
    async fn test_wrong_argument_type_rejected() {
        let mut mock = MockQueryBackend::new();
        mock.expect_execute().never();

        let resp = dispatcher(mock)
            .call("analyze_model_health", &json!({"includeTraces": "yes"}))
            .await;
        assert!(resp.is_failure());
        assert!(resp.first_text().unwrap().contains("includeTraces"));
    }
}
