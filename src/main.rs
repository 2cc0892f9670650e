//! Modelwatch MCP server - stdio entry point.
//!
//! Reads newline-delimited JSON-RPC on stdin and writes responses on stdout.
//! Logs go to stderr.

use clap::Parser;
use modelwatch::mcp::McpServer;
use modelwatch::types::{
    BackendConfig, ObservabilityConfig, ServiceUrls, TransportConfig, DEFAULT_GRAFANA_URL,
    DEFAULT_JAEGER_URL, DEFAULT_MAX_LINE_BYTES, DEFAULT_OLLAMA_URL, DEFAULT_PROMETHEUS_URL,
    DEFAULT_QUERY_TIMEOUT_SECS,
};
use modelwatch::{Config, Dispatcher};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "modelwatch-mcp", version, about = "Model-serving telemetry tools over MCP stdio")]
struct Cli {
    /// Prometheus base URL.
    #[arg(long, env = "PROMETHEUS_URL", default_value = DEFAULT_PROMETHEUS_URL)]
    prometheus_url: String,

    /// Grafana base URL.
    #[arg(long, env = "GRAFANA_URL", default_value = DEFAULT_GRAFANA_URL)]
    grafana_url: String,

    /// Ollama base URL.
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Jaeger UI base URL.
    #[arg(long, env = "JAEGER_URL", default_value = DEFAULT_JAEGER_URL)]
    jaeger_url: String,

    /// Per-query timeout in seconds.
    #[arg(long, env = "QUERY_TIMEOUT_SECS", default_value_t = DEFAULT_QUERY_TIMEOUT_SECS)]
    query_timeout_secs: u64,

    /// Longest accepted request line in bytes.
    #[arg(long, env = "MODELWATCH_MAX_LINE_BYTES", default_value_t = DEFAULT_MAX_LINE_BYTES)]
    max_line_bytes: usize,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, env = "MODELWATCH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format.
    #[arg(long, env = "MODELWATCH_LOG_FORMAT", default_value = "text", value_parser = ["text", "json"])]
    log_format: String,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            services: ServiceUrls {
                prometheus_url: self.prometheus_url,
                grafana_url: self.grafana_url,
                ollama_url: self.ollama_url,
                jaeger_url: self.jaeger_url,
            },
            backend: BackendConfig {
                query_timeout: Duration::from_secs(self.query_timeout_secs),
            },
            transport: TransportConfig {
                max_line_bytes: self.max_line_bytes,
            },
            observability: ObservabilityConfig {
                log_level: self.log_level,
                json_logs: self.log_format == "json",
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config();

    modelwatch::observability::init_tracing(&config.observability);

    let dispatcher = Arc::new(Dispatcher::from_config(&config)?);
    let server = Arc::new(McpServer::with_transport(
        dispatcher,
        config.transport.clone(),
    ));

    tracing::info!(
        prometheus = %config.services.prometheus_url,
        timeout = ?config.backend.query_timeout,
        "modelwatch MCP server starting on stdio"
    );

    {
        let server = server.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                server.shutdown();
            }
        });
    }

    server.serve_stdio().await?;

    tracing::info!("modelwatch MCP server stopped");
    Ok(())
}
