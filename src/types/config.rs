//! Configuration structures.
//!
//! Configuration is resolved once at process start (CLI flags with environment
//! fallback in the binary) and handed to the dispatcher as an immutable value.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090";
pub const DEFAULT_GRAFANA_URL: &str = "http://localhost:3000";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_JAEGER_URL: &str = "http://localhost:16686";
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_LINE_BYTES: usize = 5 * 1024 * 1024;

/// Global server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// External service endpoints.
    #[serde(default)]
    pub services: ServiceUrls,

    /// Query backend client settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Stdio transport settings.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Base URLs of the services the tools talk about or talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUrls {
    /// Prometheus query API.
    pub prometheus_url: String,

    /// Grafana dashboards.
    pub grafana_url: String,

    /// Ollama model-execution service.
    pub ollama_url: String,

    /// Jaeger trace viewer.
    pub jaeger_url: String,
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self {
            prometheus_url: DEFAULT_PROMETHEUS_URL.to_string(),
            grafana_url: DEFAULT_GRAFANA_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            jaeger_url: DEFAULT_JAEGER_URL.to_string(),
        }
    }
}

impl ServiceUrls {
    /// Full URL of the Prometheus instant-query endpoint.
    pub fn prometheus_query_endpoint(&self) -> String {
        format!("{}/api/v1/query", self.prometheus_url.trim_end_matches('/'))
    }
}

/// Query backend client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Per-request timeout. No retries are performed.
    #[serde(with = "humantime_serde")]
    pub query_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }
}

/// Stdio transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Longest accepted request line, excluding the terminator. Longer lines
    /// are answered with an error and discarded without being buffered.
    pub max_line_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error), used when
    /// `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
