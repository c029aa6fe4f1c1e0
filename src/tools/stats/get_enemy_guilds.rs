//! Get enemy guilds tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::query::enemy_guilds;
use crate::tools::ToolContext;
use crate::types::McpResult;

/// Tool for totals of every opposing guild
pub struct GetEnemyGuildsTool {
    ctx: Arc<ToolContext>,
}

impl GetEnemyGuildsTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetEnemyGuildsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_enemy_guilds",
            "Kills, deaths, fame, battles and K/D of guilds that were neither home nor allied",
            json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "integer",
                        "description": "Lookback in days; the whole history when omitted"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of guilds (optional)"
                    }
                }
            }),
        )
    }

    fn call(&self, arguments: Value) -> McpResult<Value> {
        let records = self.ctx.records(&arguments)?;
        let mut enemies = enemy_guilds(&records, &self.ctx.roster);
        if let Some(limit) = arguments.get("limit").and_then(Value::as_u64) {
            enemies.truncate(limit as usize);
        }
        json_content(&enemies)
    }
}
