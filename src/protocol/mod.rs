//! Wire types for the JSON-RPC tool server

mod jsonrpc;
mod tool;

pub use jsonrpc::{
    RpcError, RpcRequest, RpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use tool::{error_content, json_content, ServerInfo, Tool, ToolDefinition};
