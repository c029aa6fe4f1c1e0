//! Get attendance tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::query::attendance;
use crate::tools::ToolContext;
use crate::types::McpResult;

/// Tool for home guild player attendance
pub struct GetAttendanceTool {
    ctx: Arc<ToolContext>,
}

impl GetAttendanceTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetAttendanceTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_attendance",
            "Battles attended and attendance rate per home guild player, highest rate first",
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
        let records = self.ctx.records(&arguments)?;
        let entries = attendance(&records, &self.ctx.roster);

        json_content(&json!({
            "total_battles": records.len(),
            "players": entries,
        }))
    }
}
