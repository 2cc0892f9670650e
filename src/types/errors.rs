//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Display
//! strings of the tool-facing variants are part of the wire contract: they end
//! up verbatim inside `Error executing <tool>: <message>` envelopes.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// JSON-RPC: invalid JSON was received.
pub const RPC_PARSE_ERROR: i64 = -32700;
/// JSON-RPC: the JSON sent is not a valid request object.
pub const RPC_INVALID_REQUEST: i64 = -32600;
/// JSON-RPC: the method does not exist.
pub const RPC_METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC: invalid method parameters.
pub const RPC_INVALID_PARAMS: i64 = -32602;
/// JSON-RPC: internal error.
pub const RPC_INTERNAL_ERROR: i64 = -32603;

/// Main error enum for the tool server.
#[derive(Error, Debug)]
pub enum Error {
    /// Tool name not present in the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Required parameter absent and no default declared.
    #[error("Missing required parameter: {0}")]
    MissingRequiredParameter(String),

    /// Parameter present but of the wrong JSON type.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Metric key outside the template registry.
    #[error("Unknown metric key: {0}")]
    UnknownMetricKey(String),

    /// Transport-level failure talking to the query backend.
    #[error("Prometheus unreachable: {0}")]
    BackendUnreachable(String),

    /// Backend answered with a body that does not match the query API shape.
    #[error("Malformed Prometheus response: {0}")]
    BackendMalformedResponse(String),

    /// Backend reported a query error (bad expression, non-2xx status).
    #[error("Prometheus query failed: {0}")]
    BackendQuery(String),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// JSON-RPC error code used when this error has to be reported as a
    /// protocol-level failure rather than inside a tool envelope.
    pub fn to_rpc_code(&self) -> i64 {
        match self {
            Error::UnknownTool(_) => RPC_METHOD_NOT_FOUND,
            Error::MissingRequiredParameter(_)
            | Error::InvalidParameter { .. }
            | Error::UnknownMetricKey(_) => RPC_INVALID_PARAMS,
            Error::Serialization(_) => RPC_PARSE_ERROR,
            Error::BackendUnreachable(_)
            | Error::BackendMalformedResponse(_)
            | Error::BackendQuery(_)
            | Error::Internal(_) => RPC_INTERNAL_ERROR,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingRequiredParameter(name.into())
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_metric(key: impl Into<String>) -> Self {
        Self::UnknownMetricKey(key.into())
    }

    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::BackendUnreachable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::BackendMalformedResponse(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::BackendQuery(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_visible_messages() {
        assert_eq!(Error::unknown_tool("nope").to_string(), "Unknown tool: nope");
        assert_eq!(
            Error::missing_parameter("query").to_string(),
            "Missing required parameter: query"
        );
        assert_eq!(
            Error::unknown_metric("disk").to_string(),
            "Unknown metric key: disk"
        );
    }

    #[test]
    fn test_rpc_codes() {
        assert_eq!(Error::unknown_tool("x").to_rpc_code(), RPC_METHOD_NOT_FOUND);
        assert_eq!(Error::missing_parameter("q").to_rpc_code(), RPC_INVALID_PARAMS);
        assert_eq!(Error::unreachable("down").to_rpc_code(), RPC_INTERNAL_ERROR);
    }
}
