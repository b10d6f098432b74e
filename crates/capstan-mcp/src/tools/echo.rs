//! Tool `echo`: return the given text unchanged.

use serde_json::json;

use crate::types::{McpError, McpResult, ToolCallParams, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "echo".to_string(),
        description: Some("Echo the given text back to the caller".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" }
            },
            "required": ["text"]
        }),
    }
}

pub async fn execute(params: ToolCallParams) -> McpResult<ToolCallResult> {
    let text = params
        .arguments
        .as_ref()
        .and_then(|args| args.get("text"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::InvalidParams("'text' argument is required".to_string()))?;

    Ok(ToolCallResult::text(text))
}
