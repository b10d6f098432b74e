//! Resource: memo://readme and memo://notes/{id}

use crate::types::{
    McpResult, ReadResourceResult, ResourceContent, ResourceDefinition, ResourceReadParams,
    ResourceTemplateDefinition,
};

pub const README_URI: &str = "memo://readme";
pub const NOTES_TEMPLATE: &str = "memo://notes/{id}";

/// Notes readable through the template, as (id, body).
pub const NOTES: &[(&str, &str)] = &[
    ("welcome", "Welcome! Subscribe to memo://readme to hear about updates."),
    ("handshake", "Send initialize, then notifications/initialized, before anything else."),
];

pub fn readme_definition() -> ResourceDefinition {
    ResourceDefinition {
        uri: README_URI.to_string(),
        name: "Readme".to_string(),
        description: Some("What this server offers".to_string()),
        mime_type: Some("text/markdown".to_string()),
    }
}

pub fn notes_template() -> ResourceTemplateDefinition {
    ResourceTemplateDefinition {
        uri_template: NOTES_TEMPLATE.to_string(),
        name: "Note".to_string(),
        description: Some("A short note by id".to_string()),
        mime_type: Some("text/plain".to_string()),
    }
}

pub fn note_uri(id: &str) -> String {
    format!("memo://notes/{id}")
}

pub async fn read_readme(params: ResourceReadParams) -> McpResult<ReadResourceResult> {
    let text = "# capstan-mcp\n\n\
                Tools: `echo`, `add`.\n\
                Prompts: `greet`.\n\
                Resources: `memo://readme`, `memo://notes/{id}`.\n";

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::text(params.uri, "text/markdown", text)],
    })
}

pub async fn read_note(params: ResourceReadParams) -> McpResult<ReadResourceResult> {
    let body = params
        .uri
        .strip_prefix("memo://notes/")
        .and_then(|id| NOTES.iter().find(|(note_id, _)| *note_id == id))
        .map(|(_, body)| *body)
        .unwrap_or_default();

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::text(params.uri, "text/plain", body)],
    })
}
