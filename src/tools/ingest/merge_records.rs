//! Merge records tool

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{error_content, json_content, Tool, ToolDefinition};
use crate::store::REQUIRED_FIELDS;
use crate::types::McpResult;

use crate::tools::ToolContext;

/// Tool for merging already-normalized battle records
pub struct MergeRecordsTool {
    ctx: Arc<ToolContext>,
}

impl MergeRecordsTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

impl Tool for MergeRecordsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "merge_records",
            "Merge canonical battle records into the history. Existing battle ids are kept as they are",
            json!({
                "type": "object",
                "properties": {
                    "records": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": REQUIRED_FIELDS
                        },
                        "description": "Battle records in the persisted history shape"
                    }
                },
                "required": ["records"]
            }),
        )
    }

    fn call(&self, arguments: Value) -> McpResult<Value> {
        let records = arguments
            .get("records")
            .and_then(Value::as_array)
            .ok_or("Missing 'records' array")?;

        match self.ctx.store.merge_json(records) {
            Ok(outcome) => json_content(&outcome),
            Err(e) => Ok(error_content(e)),
        }
    }
}
