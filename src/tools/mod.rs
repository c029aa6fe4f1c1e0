//! Tools exposed by the JSON-RPC server
//!
//! - Ingest tools (2): raw payload ingestion, canonical record merge
//! - History tools (3): battle lists, single battle, store statistics
//! - Stats tools (6): daily, summary, guild, players, enemies, attendance

pub mod history;
pub mod ingest;
pub mod stats;

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::query::battles_within;
use crate::server::ToolServer;
use crate::store::HistoryStore;
use crate::types::{BattleRecord, GuildRoster, McpResult};

pub use history::{GetBattleTool, GetBattlesTool, GetStoreStatsTool};
pub use ingest::{IngestBattlesTool, MergeRecordsTool};
pub use stats::{
    GetAttendanceTool, GetDailyStatsTool, GetEnemyGuildsTool, GetGuildStatsTool, GetSummaryTool,
    GetTopPlayersTool,
};

/// Shared state handed to every tool
pub struct ToolContext {
    pub store: Arc<HistoryStore>,
    pub roster: GuildRoster,
}

impl ToolContext {
    pub fn new(store: Arc<HistoryStore>, roster: GuildRoster) -> Self {
        Self { store, roster }
    }

    /// History limited to the optional `days` argument
    pub(crate) fn records(&self, arguments: &Value) -> McpResult<Vec<BattleRecord>> {
        let history = self.store.history();
        match optional_days(arguments)? {
            Some(days) => Ok(battles_within(&history, days, Utc::now())),
            None => Ok(history),
        }
    }
}

/// Register all tools with the server
pub fn register_all_tools(server: &mut ToolServer, ctx: Arc<ToolContext>) {
    // Ingest tools (2)
    server.register_tool(Box::new(IngestBattlesTool::new(ctx.clone())));
    server.register_tool(Box::new(MergeRecordsTool::new(ctx.clone())));

    // History tools (3)
    server.register_tool(Box::new(GetBattlesTool::new(ctx.clone())));
    server.register_tool(Box::new(GetBattleTool::new(ctx.clone())));
    server.register_tool(Box::new(GetStoreStatsTool::new(ctx.clone())));

    // Stats tools (6)
    server.register_tool(Box::new(GetDailyStatsTool::new(ctx.clone())));
    server.register_tool(Box::new(GetSummaryTool::new(ctx.clone())));
    server.register_tool(Box::new(GetGuildStatsTool::new(ctx.clone())));
    server.register_tool(Box::new(GetTopPlayersTool::new(ctx.clone())));
    server.register_tool(Box::new(GetEnemyGuildsTool::new(ctx.clone())));
    server.register_tool(Box::new(GetAttendanceTool::new(ctx)));
}

/// `days` argument, which must be a positive integer when given
pub(crate) fn optional_days(arguments: &Value) -> McpResult<Option<i64>> {
    match arguments.get("days") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match value.as_i64() {
            Some(days) if days > 0 => Ok(Some(days)),
            _ => Err(format!("days must be a positive integer, got {}", value).into()),
        },
    }
}

pub(crate) fn days_or(arguments: &Value, default: i64) -> McpResult<i64> {
    Ok(optional_days(arguments)?.unwrap_or(default))
}

pub(crate) fn limit_or(arguments: &Value, default: usize) -> usize {
    arguments
        .get("limit")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(default)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::ToolContext;
    use crate::store::{HistoryStore, StoreConfig};
    use crate::types::GuildRoster;

    pub fn context(temp_dir: &TempDir) -> Arc<ToolContext> {
        let store = Arc::new(HistoryStore::new(StoreConfig::new(temp_dir.path())));
        let roster = GuildRoster::new("home-id", "We Profit").with_alliance("PROFIT");
        Arc::new(ToolContext::new(store, roster))
    }

    /// Raw upstream payload `hours_ago` before now
    pub fn raw_battle(id: u64, hours_ago: i64, home_kills: u64, home_deaths: u64) -> Value {
        let start = (Utc::now() - Duration::hours(hours_ago)).to_rfc3339();
        json!({
            "id": id,
            "startTime": start,
            "totalFame": 10000,
            "players": {
                "a": {"name": "Aria", "guildId": "home-id", "guildName": "We Profit",
                      "allianceName": "PROFIT", "kills": home_kills, "deaths": home_deaths, "killFame": 700},
                "f": {"name": "Fin", "guildId": "ally-id", "guildName": "Friends",
                      "allianceName": "PROFIT", "kills": 1, "deaths": 0, "killFame": 100},
                "z": {"name": "Zed", "guildId": "enemy-id", "guildName": "Raiders",
                      "allianceName": "RAID", "kills": home_deaths, "deaths": home_kills, "killFame": 300}
            }
        })
    }

    /// Parse the JSON text inside a content response
    pub fn content_json(result: &Value) -> Value {
        let text = result["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }
}
