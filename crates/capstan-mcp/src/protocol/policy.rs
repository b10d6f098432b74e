//! Optional readiness gate applied before a request reaches its handler.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::types::{McpError, McpResult};

use super::method::Method;

/// Whether requests are admitted before the handshake has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessPolicy {
    /// Admit every request from a known session, ready or not.
    #[default]
    Relaxed,
    /// Only `initialize` and `ping` are admitted until the session is ready.
    Strict,
}

impl ReadinessPolicy {
    pub fn admit(self, session: &Session, method: Method) -> McpResult<()> {
        match self {
            ReadinessPolicy::Relaxed => Ok(()),
            ReadinessPolicy::Strict if method.allowed_before_ready() || session.is_ready() => Ok(()),
            ReadinessPolicy::Strict => Err(McpError::SessionNotReady(session.id().to_string())),
        }
    }
}

impl FromStr for ReadinessPolicy {
    type Err = McpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relaxed" => Ok(ReadinessPolicy::Relaxed),
            "strict" => Ok(ReadinessPolicy::Strict),
            other => Err(McpError::InvalidParams(format!(
                "unknown readiness policy {other:?} (expected relaxed or strict)"
            ))),
        }
    }
}

impl std::fmt::Display for ReadinessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadinessPolicy::Relaxed => f.write_str("relaxed"),
            ReadinessPolicy::Strict => f.write_str("strict"),
        }
    }
}
