//! The closed set of method names the dispatcher understands.

use std::str::FromStr;

use crate::types::McpError;

/// Request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Initialize,
    Ping,
    ListPrompts,
    GetPrompt,
    ListResources,
    ReadResource,
    ListResourceTemplates,
    Subscribe,
    Unsubscribe,
    ListTools,
    CallTool,
    Complete,
    SetLogLevel,
}

impl Method {
    pub const ALL: [Method; 13] = [
        Method::Initialize,
        Method::Ping,
        Method::ListPrompts,
        Method::GetPrompt,
        Method::ListResources,
        Method::ReadResource,
        Method::ListResourceTemplates,
        Method::Subscribe,
        Method::Unsubscribe,
        Method::ListTools,
        Method::CallTool,
        Method::Complete,
        Method::SetLogLevel,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::Ping => "ping",
            Method::ListPrompts => "prompts/list",
            Method::GetPrompt => "prompts/get",
            Method::ListResources => "resources/list",
            Method::ReadResource => "resources/read",
            Method::ListResourceTemplates => "resources/templates/list",
            Method::Subscribe => "resources/subscribe",
            Method::Unsubscribe => "resources/unsubscribe",
            Method::ListTools => "tools/list",
            Method::CallTool => "tools/call",
            Method::Complete => "completion/complete",
            Method::SetLogLevel => "logging/setLevel",
        }
    }

    /// Methods a strict readiness policy admits before the handshake completes.
    pub const fn allowed_before_ready(self) -> bool {
        matches!(self, Method::Initialize | Method::Ping)
    }
}

impl FromStr for Method {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| McpError::MethodNotFound(s.to_string()))
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Notification methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationMethod {
    Initialized,
    Cancelled,
}

impl NotificationMethod {
    pub const fn name(self) -> &'static str {
        match self {
            NotificationMethod::Initialized => "notifications/initialized",
            NotificationMethod::Cancelled => "notifications/cancelled",
        }
    }
}

impl FromStr for NotificationMethod {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // Bare "initialized" is what pre-release clients sent.
            "notifications/initialized" | "initialized" => Ok(NotificationMethod::Initialized),
            "notifications/cancelled" | "$/cancelRequest" => Ok(NotificationMethod::Cancelled),
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }
}
