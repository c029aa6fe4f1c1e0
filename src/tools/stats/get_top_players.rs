//! Get top players tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::query::{top_players, PlayerMetric};
use crate::tools::{limit_or, ToolContext};
use crate::types::McpResult;

const DEFAULT_TOP_PLAYERS: usize = 3;

/// Tool for ranking home guild players
pub struct GetTopPlayersTool {
    ctx: Arc<ToolContext>,
}

impl GetTopPlayersTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetTopPlayersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_top_players",
            "Rank home guild players by kills, deaths, fame, battles or K/D",
            json!({
                "type": "object",
                "properties": {
                    "metric": {
                        "type": "string",
                        "enum": ["kills", "deaths", "fame", "battles", "kd_ratio"],
                        "default": "kills"
                    },
                    "limit": {
                        "type": "integer",
                        "default": DEFAULT_TOP_PLAYERS
                    },
                    "days": {
                        "type": "integer",
                        "description": "Lookback in days; the whole history when omitted"
                    }
                }
            }),
        )
    }

    fn call(&self, arguments: Value) -> McpResult<Value> {
        let metric = match arguments.get("metric").and_then(Value::as_str) {
            Some(name) => name.parse::<PlayerMetric>()?,
            None => PlayerMetric::default(),
        };
        let limit = limit_or(&arguments, DEFAULT_TOP_PLAYERS);
        let records = self.ctx.records(&arguments)?;

        json_content(&json!({
            "metric": metric,
            "players": top_players(&records, &self.ctx.roster, metric, limit),
        }))
    }
}
