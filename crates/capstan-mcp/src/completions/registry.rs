//! Completion dispatch keyed by `<reference type>/<name or uri>`.

use std::future::Future;

use crate::registry::CapabilityRegistry;
use crate::types::{
    CapabilityKind, CompleteParams, CompleteResult, CompletionReference, McpError, McpResult,
};

#[derive(Debug)]
pub struct CompletionRegistry {
    handlers: CapabilityRegistry<CompleteParams, CompleteResult>,
}

impl Default for CompletionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionRegistry {
    pub fn new() -> Self {
        Self {
            handlers: CapabilityRegistry::new(CapabilityKind::Completion),
        }
    }

    /// Complete arguments of the prompt named `name`.
    pub fn register_prompt<F, Fut>(&mut self, name: &str, handler: F)
    where
        F: Fn(CompleteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<CompleteResult>> + Send + 'static,
    {
        self.register_reference(CompletionReference::prompt(name), handler);
    }

    /// Complete arguments of the resource (or resource template) at `uri`.
    pub fn register_resource<F, Fut>(&mut self, uri: &str, handler: F)
    where
        F: Fn(CompleteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<CompleteResult>> + Send + 'static,
    {
        self.register_reference(CompletionReference::resource(uri), handler);
    }

    fn register_reference<F, Fut>(&mut self, reference: CompletionReference, handler: F)
    where
        F: Fn(CompleteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<CompleteResult>> + Send + 'static,
    {
        if let Some(key) = reference.key() {
            self.handlers.register(key, handler);
        }
    }

    /// Route to the handler for the request's reference. An unrecognized
    /// reference type fails before any lookup.
    pub async fn complete(&self, params: CompleteParams) -> McpResult<CompleteResult> {
        let key = params
            .reference
            .key()
            .ok_or(McpError::InvalidCompletionReference)?;
        self.handlers.call(&key, params).await
    }

    pub fn keys(&self) -> Vec<&str> {
        self.handlers.keys()
    }
}
