//! Typed parameter records, one per tool.

use crate::tools::catalog::{
    ToolCatalog, ANALYZE_MODEL_HEALTH, GET_MODEL_PERFORMANCE, GET_PROMETHEUS_QUERY,
};
use crate::types::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Metric selector meaning "every display metric".
pub const ALL_METRICS: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PerformanceParams {
    #[serde(rename = "timeRange")]
    pub time_range: String,
    pub metric_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthParams {
    /// Accepted for schema compatibility; has no effect.
    #[serde(rename = "includeTraces")]
    pub include_traces: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryParams {
    pub query: String,
    /// Accepted for schema compatibility; the query is sent unmodified.
    #[serde(rename = "timeRange")]
    pub time_range: String,
}

/// A validated, fully-defaulted tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    ModelPerformance(PerformanceParams),
    ModelHealth(HealthParams),
    PrometheusQuery(QueryParams),
}

impl ToolCall {
    /// Validate `args` against the catalog entry for `name` and build the
    /// matching typed record.
    pub fn parse(catalog: &ToolCatalog, name: &str, args: &Value) -> Result<Self> {
        let resolved = Value::Object(catalog.resolve_params(name, args)?);

        match name {
            GET_MODEL_PERFORMANCE => Ok(Self::ModelPerformance(serde_json::from_value(resolved)?)),
            ANALYZE_MODEL_HEALTH => Ok(Self::ModelHealth(serde_json::from_value(resolved)?)),
            GET_PROMETHEUS_QUERY => Ok(Self::PrometheusQuery(serde_json::from_value(resolved)?)),
            _ => Err(Error::unknown_tool(name)),
        }
    }
}
