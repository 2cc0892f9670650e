//! Query template registry: semantic metric keys to PromQL expressions.
//!
//! Templates mark their time-window slot with `{w}`. The window token is
//! substituted verbatim; a malformed window surfaces later as a backend query
//! error, never as a local rejection.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Substitution point for the caller's time window.
pub const WINDOW_SLOT: &str = "{w}";

/// Semantic metric identifier.
///
/// Declaration order is significant: it is the order metrics appear in
/// narrative summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Latency,
    Throughput,
    Memory,
    Gpu,
    Errors,
    Uptime,
    ResponseTime,
}

impl MetricKey {
    /// Every key in the registry, in declared order.
    pub const ALL: [MetricKey; 7] = [
        MetricKey::Latency,
        MetricKey::Throughput,
        MetricKey::Memory,
        MetricKey::Gpu,
        MetricKey::Errors,
        MetricKey::Uptime,
        MetricKey::ResponseTime,
    ];

    /// Keys queried by `get_model_performance` when `metric_type` is `all`.
    ///
    /// `Errors` is registered but deliberately not part of this set.
    pub const DISPLAY: [MetricKey; 4] = [
        MetricKey::Latency,
        MetricKey::Throughput,
        MetricKey::Memory,
        MetricKey::Gpu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Latency => "latency",
            MetricKey::Throughput => "throughput",
            MetricKey::Memory => "memory",
            MetricKey::Gpu => "gpu",
            MetricKey::Errors => "errors",
            MetricKey::Uptime => "uptime",
            MetricKey::ResponseTime => "responseTime",
        }
    }

    /// Upper-case label used in narrative output.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::Latency => "LATENCY",
            MetricKey::Throughput => "THROUGHPUT",
            MetricKey::Memory => "MEMORY",
            MetricKey::Gpu => "GPU",
            MetricKey::Errors => "ERRORS",
            MetricKey::Uptime => "UPTIME",
            MetricKey::ResponseTime => "RESPONSE_TIME",
        }
    }

    /// Raw template with the `{w}` slot still in place.
    pub fn template(&self) -> &'static str {
        match self {
            MetricKey::Latency => {
                "histogram_quantile(0.95, sum(rate(ollama_request_duration_seconds_bucket[{w}])) by (le))"
            }
            MetricKey::Throughput => "sum(rate(ollama_requests_total[{w}]))",
            MetricKey::Memory => "process_resident_memory_bytes{job=\"ollama\"}",
            MetricKey::Gpu => "gpu_utilization_percent",
            MetricKey::Errors => "sum(rate(ollama_requests_total{status=~\"5..\"}[{w}]))",
            MetricKey::Uptime => "up{job=\"ollama\"}",
            MetricKey::ResponseTime => {
                "histogram_quantile(0.95, sum(rate(ollama_request_duration_seconds_bucket[5m])) by (le))"
            }
        }
    }

    /// Whether the template has a window slot.
    pub fn is_windowed(&self) -> bool {
        self.template().contains(WINDOW_SLOT)
    }

    /// Concrete expression for `time_window`.
    pub fn expression(&self, time_window: &str) -> String {
        self.template().replace(WINDOW_SLOT, time_window)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MetricKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::unknown_metric(s))
    }
}

/// Resolve a metric key name and time window to a PromQL expression.
pub fn resolve(metric_key: &str, time_window: &str) -> Result<String> {
    let key: MetricKey = metric_key.parse()?;
    Ok(key.expression(time_window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_windowed_template() {
        let expr = resolve("throughput", "15m").unwrap();
        assert_eq!(expr, "sum(rate(ollama_requests_total[15m]))");
    }

    #[test]
    fn test_resolve_unknown_key() {
        let err = resolve("disk", "5m").unwrap_err();
        assert!(matches!(err, Error::UnknownMetricKey(ref k) if k == "disk"));
    }

    #[test]
    fn test_key_names_are_case_sensitive() {
        assert!(resolve("Latency", "5m").is_err());
        assert!(resolve("responseTime", "5m").is_ok());
    }

    #[test]
    fn test_response_time_uses_fixed_window() {
        assert!(!MetricKey::ResponseTime.is_windowed());
        assert!(MetricKey::ResponseTime.expression("1h").contains("[5m]"));
    }

    #[test]
    fn test_display_set_excludes_errors() {
        assert!(!MetricKey::DISPLAY.contains(&MetricKey::Errors));
        assert!(MetricKey::ALL.contains(&MetricKey::Errors));
    }

    #[test]
    fn test_declared_order() {
        let mut sorted = MetricKey::ALL;
        sorted.sort();
        assert_eq!(sorted, MetricKey::ALL);
    }

    proptest! {
        #[test]
        fn proptest_window_lands_in_slot(window in "[1-9][0-9]{0,2}[smhdw]") {
            for key in MetricKey::ALL {
                let expr = resolve(key.as_str(), &window).unwrap();
                prop_assert!(!expr.is_empty());
                prop_assert!(!expr.contains(WINDOW_SLOT));
                if key.is_windowed() {
                    let bracketed = format!("[{}]", window);
                    prop_assert!(expr.contains(&bracketed), "{} missing window in {}", key, expr);
                } else {
                    prop_assert_eq!(&expr, key.template());
                }
            }
        }

        #[test]
        fn proptest_unknown_keys_rejected(key in "[a-zA-Z]{1,12}") {
            let known = MetricKey::ALL.iter().any(|k| k.as_str() == key);
            prop_assert_eq!(resolve(&key, "5m").is_ok(), known);
        }
    }
}
