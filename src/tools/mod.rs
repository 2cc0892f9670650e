//! Tool infrastructure: catalog, typed parameters, handlers, dispatch.
//!
//! The catalog owns metadata and argument resolution; handlers own behavior;
//! the dispatcher pairs them and renders every outcome into one envelope.

pub mod catalog;
pub mod dispatcher;
pub mod envelope;
pub mod handlers;
pub mod params;

pub use catalog::{ParamDef, ParamType, ToolCatalog, ToolEntry};
pub use dispatcher::{Dispatcher, ToolOutput};
pub use envelope::{Content, ToolResponse, ERROR_PREFIX};
pub use params::ToolCall;
