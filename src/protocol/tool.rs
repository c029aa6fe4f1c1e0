//! Tool descriptions and the tool trait

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::McpResult;

/// Entry in the `tools/list` response
#[derive(Serialize, Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Name and version reported during `initialize`
#[derive(Clone, Debug)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// A callable tool exposed through `tools/call`
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with the call's `arguments` object
    fn call(&self, arguments: Value) -> McpResult<Value>;

    fn name(&self) -> String {
        self.definition().name
    }
}

/// Wrap a serializable value as a text content block
pub fn json_content<T: Serialize>(value: &T) -> McpResult<Value> {
    Ok(json!({
        "content": [{
            "type": "text",
            "text": serde_json::to_string_pretty(value)?
        }]
    }))
}

/// Content block flagged as a tool-level error
pub fn error_content(message: impl std::fmt::Display) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": format!("Error: {}", message)
        }],
        "isError": true
    })
}
