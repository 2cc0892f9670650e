//! Tool catalog: typed metadata, parameter resolution, JSON input schemas.
//!
//! Owns tool *metadata* only. Handlers live in [`crate::tools::handlers`]; the
//! dispatcher pairs the two.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

pub const GET_MODEL_PERFORMANCE: &str = "get_model_performance";
pub const ANALYZE_MODEL_HEALTH: &str = "analyze_model_health";
pub const GET_PROMETHEUS_QUERY: &str = "get_prometheus_query";

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Bool,
    Number,
    /// A string with documented choices. Membership is not enforced.
    Enum(Vec<String>),
}

impl ParamType {
    /// Check the JSON type of a value against this parameter type.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        let ok = match self {
            ParamType::String | ParamType::Enum(_) => value.is_string(),
            ParamType::Bool => value.is_boolean(),
            ParamType::Number => value.is_number(),
        };
        if ok {
            Ok(())
        } else {
            Err(format!(
                "expected {}, got {}",
                self.json_type(),
                value_type_name(value)
            ))
        }
    }

    /// Whether `value` is one of the declared choices. Non-enum types accept all.
    pub fn is_declared_choice(&self, value: &Value) -> bool {
        match (self, value.as_str()) {
            (ParamType::Enum(choices), Some(s)) => choices.iter().any(|c| c == s),
            (ParamType::Enum(_), None) => false,
            _ => true,
        }
    }

    /// JSON Schema `type` keyword.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String | ParamType::Enum(_) => "string",
            ParamType::Bool => "boolean",
            ParamType::Number => "number",
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDef {
    /// Required parameter (no default).
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            default: None,
        }
    }

    /// Optional parameter with a default.
    pub fn optional(name: &str, param_type: ParamType, description: &str, default: Value) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: description.to_string(),
            default: Some(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    fn schema_property(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.param_type.json_type()));
        prop.insert("description".into(), json!(self.description));
        if let ParamType::Enum(choices) = &self.param_type {
            prop.insert("enum".into(), json!(choices));
        }
        if let Some(default) = &self.default {
            prop.insert("default".into(), default.clone());
        }
        Value::Object(prop)
    }
}

// =============================================================================
// Tool entry
// =============================================================================

/// Complete tool metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamDef>,
}

impl ToolEntry {
    /// JSON Schema object describing this tool's arguments.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.schema_property()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name.as_str())
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    /// `{name, description, inputSchema}` as listed to RPC clients.
    pub fn to_definition(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }

    /// Type-check provided arguments and fill defaults for omitted ones.
    ///
    /// `null` arguments count as omitted. Values outside an enum's declared
    /// choices are logged and passed through. Undeclared arguments are dropped.
    pub fn resolve_params(&self, args: &Value) -> Result<Map<String, Value>> {
        let provided = match args {
            Value::Null => None,
            Value::Object(map) => Some(map),
            other => {
                return Err(Error::invalid_parameter(
                    "arguments",
                    format!("expected object, got {}", value_type_name(other)),
                ))
            }
        };

        let mut resolved = Map::new();
        for param in &self.parameters {
            let value = provided
                .and_then(|m| m.get(&param.name))
                .filter(|v| !v.is_null());

            match (value, &param.default) {
                (Some(value), _) => {
                    param
                        .param_type
                        .validate(value)
                        .map_err(|reason| Error::invalid_parameter(&param.name, reason))?;
                    if !param.param_type.is_declared_choice(value) {
                        tracing::warn!(
                            tool = %self.name,
                            param = %param.name,
                            value = %value,
                            "value outside declared choices"
                        );
                    }
                    resolved.insert(param.name.clone(), value.clone());
                }
                (None, Some(default)) => {
                    resolved.insert(param.name.clone(), default.clone());
                }
                (None, None) => return Err(Error::missing_parameter(&param.name)),
            }
        }

        if let Some(map) = provided {
            for key in map.keys() {
                if !self.parameters.iter().any(|p| &p.name == key) {
                    tracing::debug!(tool = %self.name, param = %key, "ignoring undeclared argument");
                }
            }
        }

        Ok(resolved)
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// In-memory tool catalog. Owns metadata, not implementations.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    entries: HashMap<String, ToolEntry>,
}

impl ToolCatalog {
    /// The fixed catalog served by this process.
    pub fn builtin() -> Self {
        let entries = builtin_entries()
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        Self { entries }
    }

    /// Get a tool entry by name.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.get(name)
    }

    /// List all tool entries, sorted by name.
    pub fn list_entries(&self) -> Vec<&ToolEntry> {
        let mut entries: Vec<&ToolEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Resolve arguments for `name`: unknown tool, missing or mistyped
    /// parameters are rejected; defaults are applied.
    pub fn resolve_params(&self, name: &str, args: &Value) -> Result<Map<String, Value>> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::unknown_tool(name))?
            .resolve_params(args)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn choices(values: &[&str]) -> ParamType {
    ParamType::Enum(values.iter().map(|s| s.to_string()).collect())
}

fn builtin_entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry {
            name: GET_MODEL_PERFORMANCE.to_string(),
            description: "Get performance metrics (latency, throughput, memory, GPU) for the model-serving stack".to_string(),
            parameters: vec![
                ParamDef::optional(
                    "timeRange",
                    choices(&["5m", "15m", "1h", "24h"]),
                    "Time window for rate and percentile metrics",
                    json!("5m"),
                ),
                ParamDef::optional(
                    "metric_type",
                    choices(&["all", "latency", "throughput", "memory", "gpu"]),
                    "Which metric to report",
                    json!("all"),
                ),
            ],
        },
        ToolEntry {
            name: ANALYZE_MODEL_HEALTH.to_string(),
            description: "Summarize the overall health of the model-serving stack".to_string(),
            parameters: vec![ParamDef::optional(
                "includeTraces",
                ParamType::Bool,
                "Include distributed trace analysis",
                json!(false),
            )],
        },
        ToolEntry {
            name: GET_PROMETHEUS_QUERY.to_string(),
            description: "Run a raw PromQL instant query and return the results as a table".to_string(),
            parameters: vec![
                ParamDef::required("query", ParamType::String, "PromQL expression"),
                ParamDef::optional(
                    "timeRange",
                    ParamType::String,
                    "Time range for the query",
                    json!("1h"),
                ),
            ],
        },
    ]
}

// =============================================================================
// Tests
// =============================================================================
