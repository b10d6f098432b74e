//! Prompt catalog and name-keyed expansion dispatch.

use std::future::Future;

use crate::registry::CapabilityRegistry;
use crate::types::{CapabilityKind, McpResult, PromptDefinition, PromptGetParams, PromptGetResult};

#[derive(Debug)]
pub struct PromptRegistry {
    catalog: Vec<PromptDefinition>,
    handlers: CapabilityRegistry<PromptGetParams, PromptGetResult>,
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            handlers: CapabilityRegistry::new(CapabilityKind::Prompt),
        }
    }

    pub fn register<F, Fut>(&mut self, definition: PromptDefinition, handler: F)
    where
        F: Fn(PromptGetParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<PromptGetResult>> + Send + 'static,
    {
        self.handlers.register(definition.name.clone(), handler);
        self.catalog.retain(|p| p.name != definition.name);
        self.catalog.push(definition);
    }

    pub fn list_prompts(&self) -> Vec<PromptDefinition> {
        self.catalog.clone()
    }

    pub async fn get(&self, params: PromptGetParams) -> McpResult<PromptGetResult> {
        let name = params.name.clone();
        self.handlers.call(&name, params).await
    }
}
