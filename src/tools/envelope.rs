//! Tool response envelope: the single wire shape for success and failure.
//!
//! Failures are not transport faults: they render as ordinary text content
//! prefixed with [`ERROR_PREFIX`].

use crate::types::Error;
use serde::{Deserialize, Serialize};

/// Prefix of every failure envelope's text.
pub const ERROR_PREFIX: &str = "Error executing";

/// One content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// `{ content: [ {type: "text", text} ] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<Content>,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
        }
    }

    /// `Error executing <tool>: <message>`
    pub fn failure(tool_name: &str, err: &Error) -> Self {
        Self::text(format!("{} {}: {}", ERROR_PREFIX, tool_name, err))
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            Content::Text { text } => text.as_str(),
        })
    }

    /// Whether this envelope encodes a failure.
    pub fn is_failure(&self) -> bool {
        self.first_text()
            .is_some_and(|t| t.starts_with(ERROR_PREFIX))
    }
}
