//! Completions for the `memo://notes/{id}` template.

use crate::resources::memo::NOTES;
use crate::types::{CompleteParams, CompleteResult, McpResult};

use super::greet::matching;

pub async fn complete_note_id(params: CompleteParams) -> McpResult<CompleteResult> {
    let ids: Vec<&str> = NOTES.iter().map(|(id, _)| *id).collect();
    Ok(matching(&ids, &params.argument.value))
}
