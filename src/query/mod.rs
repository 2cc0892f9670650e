//! Query layer: template registry, backend client, result formatting.

pub mod client;
pub mod format;
pub mod templates;

pub use client::{PrometheusClient, QueryBackend, QueryResult, Sample};
pub use format::{error_line, summarize, summary_header, tabulate, NO_RESULTS};
pub use templates::{resolve, MetricKey};
