//! Tool `add`: sum a list of numbers.

use serde_json::{json, Value};

use crate::types::{McpError, McpResult, ToolCallParams, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "add".to_string(),
        description: Some("Add numbers together and return the sum".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "numbers": {
                    "type": "array",
                    "items": { "type": "number" },
                    "minItems": 1
                }
            },
            "required": ["numbers"]
        }),
    }
}

pub async fn execute(params: ToolCallParams) -> McpResult<ToolCallResult> {
    let numbers = params
        .arguments
        .as_ref()
        .and_then(|args| args.get("numbers"))
        .and_then(Value::as_array)
        .ok_or_else(|| McpError::InvalidParams("'numbers' must be an array".to_string()))?;

    if numbers.is_empty() {
        return Ok(ToolCallResult::error("'numbers' must not be empty"));
    }

    let mut sum = 0.0;
    for n in numbers {
        sum += n
            .as_f64()
            .ok_or_else(|| McpError::InvalidParams(format!("not a number: {n}")))?;
    }

    Ok(ToolCallResult::json(&json!({ "sum": sum, "count": numbers.len() })))
}
