//! Prompt `greet`: ask the model to greet someone by name.

use crate::types::{
    McpError, McpResult, PromptArgument, PromptDefinition, PromptGetParams, PromptGetResult,
    PromptMessage, ToolContent,
};

pub fn definition() -> PromptDefinition {
    PromptDefinition {
        name: "greet".to_string(),
        description: Some("Compose a short greeting for someone".to_string()),
        arguments: Some(vec![
            PromptArgument {
                name: "name".to_string(),
                description: Some("Who to greet".to_string()),
                required: true,
            },
            PromptArgument {
                name: "tone".to_string(),
                description: Some("Optional tone, e.g. formal or cheerful".to_string()),
                required: false,
            },
        ]),
    }
}

pub async fn expand(params: PromptGetParams) -> McpResult<PromptGetResult> {
    let args = params.arguments.unwrap_or_default();
    let name = args
        .get("name")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| McpError::InvalidParams("'name' argument is required".to_string()))?;

    let text = match args.get("tone") {
        Some(tone) if !tone.is_empty() => {
            format!("Write a {tone} greeting addressed to {name}. Keep it to one sentence.")
        }
        _ => format!("Write a greeting addressed to {name}. Keep it to one sentence."),
    };

    Ok(PromptGetResult {
        description: Some(format!("Greeting for {name}")),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: ToolContent::Text { text },
        }],
    })
}
