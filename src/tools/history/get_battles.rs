//! Get battles tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::query::DEFAULT_WINDOW_DAYS;
use crate::tools::{days_or, ToolContext};
use crate::types::McpResult;

/// Tool for listing recent battles, newest first
pub struct GetBattlesTool {
    ctx: Arc<ToolContext>,
}

impl GetBattlesTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetBattlesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_battles",
            "List battles from the last N days, newest first",
            json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "integer",
                        "default": DEFAULT_WINDOW_DAYS,
                        "description": "Lookback in days"
                    },
                    "min_members": {
                        "type": "integer",
                        "description": "Only battles where the home guild fielded at least this many players (optional)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of battles to return (optional)"
                    }
                }
            }),
        )
    }

    fn call(&self, arguments: Value) -> McpResult<Value> {
        let days = days_or(&arguments, DEFAULT_WINDOW_DAYS)?;
        let mut battles = match arguments.get("min_members").and_then(Value::as_u64) {
            Some(min) => self.ctx.store.battles_with_min_members(&self.ctx.roster, min, days),
            None => self.ctx.store.battles_by_timeframe(days),
        };
        if let Some(limit) = arguments.get("limit").and_then(Value::as_u64) {
            battles.truncate(limit as usize);
        }

        json_content(&battles)
    }
}
