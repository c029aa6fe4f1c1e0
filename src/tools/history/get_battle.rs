//! Get battle tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{error_content, json_content, Tool, ToolDefinition};
use crate::query::battle_breakdown;
use crate::tools::ToolContext;
use crate::types::McpResult;

/// Tool for one battle with its home / allied / enemy breakdown
pub struct GetBattleTool {
    ctx: Arc<ToolContext>,
}

impl GetBattleTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetBattleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_battle",
            "Get one battle by id, with per-side totals",
            json!({
                "type": "object",
                "properties": {
                    "battle_id": {
                        "type": "string",
                        "description": "Battle id"
                    }
                },
                "required": ["battle_id"]
            }),
        )
    }

    fn call(&self, arguments: Value) -> McpResult<Value> {
        let battle_id = match arguments.get("battle_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err("Missing 'battle_id'".into()),
        };

        match self.ctx.store.battle_by_id(&battle_id) {
            Some(record) => {
                let breakdown = battle_breakdown(&record, &self.ctx.roster);
                json_content(&json!({ "battle": record, "breakdown": breakdown }))
            }
            None => Ok(error_content(format!("battle '{}' not found", battle_id))),
        }
    }
}
