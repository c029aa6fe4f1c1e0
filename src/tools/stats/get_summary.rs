//! Get summary tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::tools::{optional_days, ToolContext};
use crate::types::McpResult;

/// Tool for overall totals of the history
pub struct GetSummaryTool {
    ctx: Arc<ToolContext>,
}

impl GetSummaryTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetSummaryTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_summary",
            "Total battles, kills, deaths, K/D and wins (a win is more kills than deaths)",
            json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "integer",
                        "description": "Lookback in days; the whole history when omitted"
                    }
                }
            }),
        )
    }

    fn call(&self, arguments: Value) -> McpResult<Value> {
        let days = optional_days(&arguments)?;
        json_content(&self.ctx.store.summary(days))
    }
}
