//! MCP transport adapter.
//!
//! Newline-delimited JSON-RPC 2.0 (the MCP stdio framing). The dispatcher is
//! transport-agnostic; this module only decodes frames, routes protocol
//! methods and encodes responses.

pub mod framing;
pub mod protocol;
pub mod server;

pub use server::McpServer;
