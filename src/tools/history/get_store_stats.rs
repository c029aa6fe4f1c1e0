//! Get store stats tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::store::StoreStats;
use crate::tools::ToolContext;
use crate::types::McpResult;

/// Tool for history file and backup statistics
pub struct GetStoreStatsTool {
    ctx: Arc<ToolContext>,
}

impl GetStoreStatsTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for GetStoreStatsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_store_stats",
            "Battle count, covered period and disk usage of the history and its backups",
            json!({
                "type": "object",
                "properties": {}
            }),
        )
    }

    fn call(&self, _arguments: Value) -> McpResult<Value> {
        let stats = self.ctx.store.stats()?;
        let config = self.ctx.store.config();

        json_content(&json!({
            "stats": stats,
            "history_path": config.history_path,
            "backup_dir": config.backup_dir,
            "max_history_days": config.max_history_days,
            "max_backups": config.max_backups,
            "history_size": StoreStats::format_size(stats.history_size),
            "backup_size": StoreStats::format_size(stats.backup_size),
        }))
    }
}
