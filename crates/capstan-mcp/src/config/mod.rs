//! Server configuration and its resolution from flags and environment.

use crate::protocol::ReadinessPolicy;
use crate::types::{
    Implementation, McpResult, ServerCapabilities, MCP_VERSION, SERVER_NAME, SERVER_VERSION,
};

pub const READINESS_ENV: &str = "CAPSTAN_READINESS";
pub const SERVER_NAME_ENV: &str = "CAPSTAN_SERVER_NAME";

/// Process-wide constants returned from `initialize`, plus dispatch policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub protocol_version: String,
    pub server_info: Implementation,
    pub capabilities: ServerCapabilities,
    pub instructions: Option<String>,
    pub readiness: ReadinessPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            protocol_version: MCP_VERSION.to_string(),
            server_info: Implementation::new(SERVER_NAME, SERVER_VERSION),
            capabilities: ServerCapabilities::default_capabilities(),
            instructions: None,
            readiness: ReadinessPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Build a config from optional CLI values, falling back to the
    /// environment and then to defaults.
    pub fn resolve(name: Option<&str>, readiness: Option<&str>) -> McpResult<Self> {
        let mut config = Self::default();
        config.server_info.name = resolve_server_name(name);
        config.readiness = resolve_readiness(readiness)?;
        Ok(config)
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_readiness(mut self, readiness: ReadinessPolicy) -> Self {
        self.readiness = readiness;
        self
    }
}

/// Resolve the advertised server name.
pub fn resolve_server_name(explicit: Option<&str>) -> String {
    if let Some(name) = explicit {
        return name.to_string();
    }

    match std::env::var(SERVER_NAME_ENV) {
        Ok(name) if !name.trim().is_empty() => name,
        _ => SERVER_NAME.to_string(),
    }
}

/// Resolve the readiness policy.
pub fn resolve_readiness(explicit: Option<&str>) -> McpResult<ReadinessPolicy> {
    if let Some(value) = explicit {
        return value.parse();
    }

    match std::env::var(READINESS_ENV) {
        Ok(value) if !value.trim().is_empty() => value.parse(),
        _ => Ok(ReadinessPolicy::default()),
    }
}
