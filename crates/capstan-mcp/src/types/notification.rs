//! MCP notification types.

use serde::{Deserialize, Serialize};

use super::message::JsonRpcNotification;

pub const RESOURCE_UPDATED_METHOD: &str = "notifications/resources/updated";

/// Syslog-style severity, as carried by `logging/setLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUpdatedParams {
    pub uri: String,
}

impl ResourceUpdatedParams {
    pub fn into_notification(self) -> JsonRpcNotification {
        JsonRpcNotification::new(
            RESOURCE_UPDATED_METHOD,
            Some(serde_json::json!({ "uri": self.uri })),
        )
    }
}
