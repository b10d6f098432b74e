//! Tool catalog and name-keyed call dispatch.

use std::future::Future;

use crate::registry::CapabilityRegistry;
use crate::types::{CapabilityKind, McpResult, ToolCallParams, ToolCallResult, ToolDefinition};

#[derive(Debug)]
pub struct ToolRegistry {
    catalog: Vec<ToolDefinition>,
    handlers: CapabilityRegistry<ToolCallParams, ToolCallResult>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            handlers: CapabilityRegistry::new(CapabilityKind::Tool),
        }
    }

    /// Advertise `definition` in `tools/list` and route calls for its name to `handler`.
    pub fn register<F, Fut>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(ToolCallParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<ToolCallResult>> + Send + 'static,
    {
        self.handlers.register(definition.name.clone(), handler);
        self.catalog.retain(|t| t.name != definition.name);
        self.catalog.push(definition);
    }

    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.catalog.clone()
    }

    pub async fn call(&self, params: ToolCallParams) -> McpResult<ToolCallResult> {
        let name = params.name.clone();
        self.handlers.call(&name, params).await
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains(name)
    }
}
