//! Prometheus instant-query client.
//!
//! `QueryBackend::execute` never fails: transport errors, bad bodies and
//! backend-reported query errors all come back as `QueryResult::Failed`, so a
//! caller fanning out over several metrics treats each one independently.

use crate::types::{BackendConfig, Error, Result, ServiceUrls};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label carrying the metric name.
pub const NAME_LABEL: &str = "__name__";

// =============================================================================
// Result types
// =============================================================================

/// One labeled instant sample returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Series labels keyed by name. Stored sorted, so renderings list labels
    /// alphabetically rather than in the backend's wire order.
    #[serde(rename = "metric", default)]
    pub labels: BTreeMap<String, String>,
    /// `(unix timestamp, stringified number)` as sent by Prometheus.
    pub value: (f64, String),
}

impl Sample {
    pub fn new(labels: BTreeMap<String, String>, timestamp: f64, value: impl Into<String>) -> Self {
        Self {
            labels,
            value: (timestamp, value.into()),
        }
    }

    /// Value exactly as the backend sent it.
    pub fn raw_value(&self) -> &str {
        &self.value.1
    }

    pub fn timestamp(&self) -> f64 {
        self.value.0
    }

    /// The series' `__name__` label, if any.
    pub fn name(&self) -> Option<&str> {
        self.labels.get(NAME_LABEL).map(String::as_str)
    }
}

/// Outcome of a single backend query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Zero or more series, in backend order.
    Series(Vec<Sample>),
    /// Error marker carrying a human-readable message.
    Failed(String),
}

impl QueryResult {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

impl From<Result<Vec<Sample>>> for QueryResult {
    fn from(result: Result<Vec<Sample>>) -> Self {
        match result {
            Ok(series) => QueryResult::Series(series),
            Err(e) => QueryResult::failed(e.to_string()),
        }
    }
}

// =============================================================================
// Backend seam
// =============================================================================

/// A time-series backend that can evaluate one expression.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn execute(&self, expression: &str) -> QueryResult;
}

// =============================================================================
// Prometheus implementation
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<ApiData>,
    #[serde(default)]
    error: Option<String>,
    #[serde(rename = "errorType", default)]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiData {
    result: Vec<Sample>,
}

/// HTTP client for `GET /api/v1/query`.
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PrometheusClient {
    pub fn new(urls: &ServiceUrls, backend: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(backend.query_timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: urls.prometheus_query_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one instant query. No retries.
    pub async fn query(&self, expression: &str) -> Result<Vec<Sample>> {
        tracing::debug!(expression, endpoint = %self.endpoint, "prometheus query");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", expression)])
            .send()
            .await
            .map_err(|e| Error::unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::unreachable(format!("failed to read body: {}", e)))?;

        parse_response(status, &body)
    }
}

#[async_trait]
impl QueryBackend for PrometheusClient {
    async fn execute(&self, expression: &str) -> QueryResult {
        let result = self.query(expression).await;
        if let Err(e) = &result {
            tracing::warn!(expression, error = %e, "prometheus query failed");
        }
        result.into()
    }
}

fn parse_response(status: StatusCode, body: &str) -> Result<Vec<Sample>> {
    let parsed = serde_json::from_str::<ApiResponse>(body);

    if !status.is_success() {
        // Prometheus returns a JSON error body on 400/422/503; prefer its message.
        return Err(match parsed {
            Ok(ApiResponse {
                error: Some(msg),
                error_type,
                ..
            }) => Error::query(describe_api_error(error_type.as_deref(), &msg)),
            _ => Error::query(format!("HTTP {}", status)),
        });
    }

    let api = parsed.map_err(|e| Error::malformed(e.to_string()))?;

    if api.status.as_deref() == Some("error") {
        let msg = api.error.unwrap_or_else(|| "unknown error".to_string());
        return Err(Error::query(describe_api_error(api.error_type.as_deref(), &msg)));
    }

    let data = api
        .data
        .ok_or_else(|| Error::malformed("missing 'data' field"))?;
    Ok(data.result)
}

fn describe_api_error(error_type: Option<&str>, msg: &str) -> String {
    match error_type {
        Some(kind) => format!("{}: {}", kind, msg),
        None => msg.to_string(),
    }
}
