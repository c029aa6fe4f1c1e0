//! Ingest battles tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ingest::{ingest, refresh, FileSource};
use crate::protocol::{json_content, Tool, ToolDefinition};
use crate::query::DEFAULT_WINDOW_DAYS;
use crate::types::McpResult;

use crate::tools::{days_or, ToolContext};

/// Tool for normalizing raw upstream battles into the history
pub struct IngestBattlesTool {
    ctx: Arc<ToolContext>,
}

impl IngestBattlesTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for IngestBattlesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "ingest_battles",
            "Normalize raw upstream battle payloads for the home guild and merge them into the history",
            json!({
                "type": "object",
                "properties": {
                    "battles": {
                        "type": "array",
                        "items": { "type": "object" },
                        "description": "Raw battle payloads ({id, startTime, totalFame, players})"
                    },
                    "file": {
                        "type": "string",
                        "description": "Path of a JSON file holding raw payloads, used when 'battles' is absent"
                    },
                    "days": {
                        "type": "integer",
                        "description": "Lookback passed to the file source (default 7)"
                    }
                }
            }),
        )
    }

    fn call(&self, arguments: Value) -> McpResult<Value> {
        let outcome = match (arguments.get("battles"), arguments.get("file")) {
            (Some(Value::Array(payloads)), _) => ingest(&self.ctx.store, payloads, &self.ctx.roster),
            (Some(_), _) => return Err("battles must be an array".into()),
            (None, Some(Value::String(path))) => {
                let days = days_or(&arguments, DEFAULT_WINDOW_DAYS)?;
                refresh(&self.ctx.store, &FileSource::new(path), &self.ctx.roster, days)
            }
            (None, _) => return Err("either 'battles' or 'file' is required".into()),
        };

        json_content(&outcome)
    }
}
