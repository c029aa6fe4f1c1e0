//! Get guild stats tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::query::guild_stats;
use crate::tools::ToolContext;
use crate::types::McpResult;

/// Tool for the home guild's record and per-player totals
pub struct GetGuildStatsTool {
    ctx: Arc<ToolContext>,
}

impl GetGuildStatsTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetGuildStatsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_guild_stats",
            "Home guild totals, battles won and per-player totals",
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
        json_content(&guild_stats(&records, &self.ctx.roster))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ingest;
    use crate::tools::test_support::{content_json, context, raw_battle};
    use tempfile::TempDir;

    #[test]
    fn test_guild_stats_tool() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir);
        ingest(&ctx.store, &[raw_battle(1, 1, 8, 5), raw_battle(2, 2, 2, 2)], &ctx.roster);

        let stats = content_json(&GetGuildStatsTool::new(ctx).call(json!({})).unwrap());

        assert_eq!(stats["name"], "We Profit");
        assert_eq!(stats["total_battles"], 2);
        assert_eq!(stats["total_kills"], 10);
        assert_eq!(stats["battles_won"], 1);
        assert_eq!(stats["players"]["Aria"]["battles"], 2);
    }
}
