//! # Modelwatch - model-serving telemetry tools over MCP
//!
//! A small, fixed catalog of tools that answer questions about a model-serving
//! stack by querying Prometheus and rendering the results as text:
//! - `get_model_performance`: latency/throughput/memory/GPU narrative summary
//! - `analyze_model_health`: fixed health narrative with links to dashboards
//! - `get_prometheus_query`: raw PromQL instant query rendered as a table
//!
//! ## Architecture
//!
//! ```text
//!   JSON-RPC line  →  McpServer  →  Dispatcher  →  ToolCall (typed params)
//!                                       │
//!                          ┌────────────┴────────────┐
//!                          │ MetricKey::expression   │
//!                          │ QueryBackend::execute   │ (fan-out, per-metric
//!                          │ summarize / tabulate    │  failures become data)
//!                          └────────────┬────────────┘
//!   JSON-RPC line  ←  McpServer  ←  ToolResponse envelope
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod mcp;
pub mod query;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use tools::{Dispatcher, ToolResponse};
pub use types::{Config, Error, Result};
