//! JSON-RPC tool server
//!
//! Reads one request per line and writes one response per line. Only the
//! response stream goes to the writer; logs go to stderr.

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::protocol::{
    RpcError, RpcRequest, RpcResponse, ServerInfo, Tool, ToolDefinition, INTERNAL_ERROR,
    INVALID_PARAMS,
};
use crate::types::McpResult;

const PROTOCOL_VERSION: &str = "2024-11-05";

/// Tool server speaking line-delimited JSON-RPC 2.0
pub struct ToolServer {
    server_info: ServerInfo,
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolServer {
    pub fn new() -> Self {
        Self::with_info(ServerInfo::default())
    }

    pub fn with_info(server_info: ServerInfo) -> Self {
        Self {
            server_info,
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name(), tool);
        self
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Serve stdin/stdout until stdin closes
    pub fn run_stdio(&self) -> McpResult<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve requests from `reader` until EOF
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> McpResult<()> {
        log::info!("SERVER_STARTED tools={}", self.tools.len());

        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                if let Some(response) = self.handle_line(trimmed) {
                    writeln!(writer, "{}", serde_json::to_string(&response)?)?;
                    writer.flush()?;
                }
            }
            line.clear();
        }

        log::info!("SERVER_STOPPED reason=eof");
        Ok(())
    }

    /// Handle one raw request line; `None` for notifications
    pub fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("REQUEST_UNPARSABLE error={}", e);
                return Some(RpcResponse::failure(Value::Null, RpcError::parse_error(e)));
            }
        };

        if !request.is_valid() {
            return Some(RpcResponse::failure(
                request.id.unwrap_or(Value::Null),
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        if request.is_notification() {
            log::debug!("NOTIFICATION method={}", request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => RpcResponse::success(id, self.initialize_result()),
            "tools/list" => RpcResponse::success(id, self.tools_list_result()),
            "tools/call" => self.call_tool(id, request.params),
            "ping" => RpcResponse::success(id, json!({})),
            other => RpcResponse::failure(id, RpcError::method_not_found(other)),
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": self.server_info.name,
                "version": self.server_info.version
            }
        })
    }

    fn tools_list_result(&self) -> Value {
        let tools: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        json!({ "tools": tools })
    }

    fn call_tool(&self, id: Value, params: Option<Value>) -> RpcResponse {
        let Some(params) = params else {
            return RpcResponse::failure(id, RpcError::invalid_params("missing params"));
        };
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return RpcResponse::failure(id, RpcError::invalid_params("missing tool name"));
        };
        let Some(tool) = self.tools.get(name) else {
            return RpcResponse::failure(
                id,
                RpcError::new(INVALID_PARAMS, "Unknown tool", Some(json!({"tool": name}))),
            );
        };

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        match tool.call(arguments) {
            Ok(result) => RpcResponse::success(id, result),
            Err(e) => {
                log::error!("TOOL_FAILED tool={} error={}", name, e);
                RpcResponse::failure(
                    id,
                    RpcError::new(
                        INTERNAL_ERROR,
                        "Tool execution error",
                        Some(json!({"details": e.to_string()})),
                    ),
                )
            }
        }
    }
}

impl Default for ToolServer {
    fn default() -> Self {
        Self::new()
    }
}
