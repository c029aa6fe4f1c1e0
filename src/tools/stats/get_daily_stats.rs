//! Get daily stats tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::query::DEFAULT_DAILY_DAYS;
use crate::tools::{days_or, ToolContext};
use crate::types::McpResult;

/// Tool for per-day battle aggregates
pub struct GetDailyStatsTool {
    ctx: Arc<ToolContext>,
}

impl GetDailyStatsTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetDailyStatsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_daily_stats",
            "Per-day battles, kills, deaths, fame, K/D and wins (a win is kills >= 1.6 x deaths), oldest day first",
            json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "integer",
                        "default": DEFAULT_DAILY_DAYS,
                        "description": "Lookback in days"
                    }
                }
            }),
        )
    }

    fn call(&self, arguments: Value) -> McpResult<Value> {
        let days = days_or(&arguments, DEFAULT_DAILY_DAYS)?;
        json_content(&self.ctx.store.daily_stats(days))
    }
}
