//! Completions for the `greet` prompt.

use crate::types::{CompleteParams, CompleteResult, Completion, McpResult};

const KNOWN_NAMES: &[&str] = &["Ada", "Alan", "Barbara", "Grace", "Ken", "Linus"];
const TONES: &[&str] = &["casual", "cheerful", "formal"];

/// Case-insensitive prefix filter over `candidates`.
pub(crate) fn matching(candidates: &[&str], prefix: &str) -> CompleteResult {
    let prefix = prefix.to_lowercase();
    let values: Vec<String> = candidates
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&prefix))
        .map(|c| c.to_string())
        .collect();

    CompleteResult {
        completion: Completion {
            total: Some(values.len() as u32),
            has_more: Some(false),
            values,
        },
    }
}

pub async fn complete_greet(params: CompleteParams) -> McpResult<CompleteResult> {
    let candidates: &[&str] = match params.argument.name.as_str() {
        "name" => KNOWN_NAMES,
        "tone" => TONES,
        _ => &[],
    };
    Ok(matching(candidates, &params.argument.value))
}
