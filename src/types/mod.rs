//! Core types for the tool server.
//!
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Service endpoints, backend client settings, transport limits, logging

mod config;
mod errors;

pub use config::{
    BackendConfig, Config, ObservabilityConfig, ServiceUrls, TransportConfig, DEFAULT_GRAFANA_URL,
    DEFAULT_JAEGER_URL, DEFAULT_MAX_LINE_BYTES, DEFAULT_OLLAMA_URL, DEFAULT_PROMETHEUS_URL,
    DEFAULT_QUERY_TIMEOUT_SECS,
};
pub use errors::{
    Error, Result, RPC_INTERNAL_ERROR, RPC_INVALID_PARAMS, RPC_INVALID_REQUEST,
    RPC_METHOD_NOT_FOUND, RPC_PARSE_ERROR,
};
