//! Decoding raw parameter payloads into typed requests.

use serde::de::DeserializeOwned;

use crate::types::{McpError, McpResult};

/// Decode `raw` as the params of `method`. An empty or `null` payload is
/// treated as `{}`, so methods whose params are all optional accept it.
/// Params are named: any other non-object payload is rejected.
pub fn decode<T: DeserializeOwned>(method: &str, raw: &[u8]) -> McpResult<T> {
    let trimmed = raw.trim_ascii();
    let payload: &[u8] = if trimmed.is_empty() || trimmed == b"null" {
        b"{}"
    } else {
        trimmed
    };

    if payload.first() != Some(&b'{') {
        return Err(McpError::MalformedParams {
            method: method.to_string(),
            reason: "params must be a JSON object".to_string(),
        });
    }

    serde_json::from_slice(payload).map_err(|e| McpError::MalformedParams {
        method: method.to_string(),
        reason: e.to_string(),
    })
}
