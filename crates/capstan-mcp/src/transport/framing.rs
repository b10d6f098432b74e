//! Newline-delimited JSON framing.

use serde::Serialize;
use serde_json::Value;

use crate::types::{JsonRpcMessage, McpError, McpResult};

/// Parse one line of input as a JSON-RPC message.
///
/// Text that is not JSON is a parse error. Well-formed JSON that is not a
/// JSON-RPC message (for example a request with an object `id`) is an
/// invalid request, so the peer still gets an answer.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))?;
    serde_json::from_value(value)
        .map_err(|e| McpError::InvalidRequest(format!("Not a JSON-RPC 2.0 message: {e}")))
}

/// Serialize a message as a single line, trailing newline included.
pub fn frame_message(value: &impl Serialize) -> McpResult<String> {
    let mut json = serde_json::to_string(value).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}
