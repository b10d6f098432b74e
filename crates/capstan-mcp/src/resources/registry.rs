//! Resource catalogs and URI-keyed read dispatch.
//!
//! Reads resolve by exact URI match. Templates are advertised only; a URI
//! built from a template is readable once a reader is registered for it.

use std::future::Future;

use crate::registry::CapabilityRegistry;
use crate::types::{
    CapabilityKind, McpResult, ReadResourceResult, ResourceDefinition, ResourceReadParams,
    ResourceTemplateDefinition,
};

#[derive(Debug)]
pub struct ResourceRegistry {
    resources: Vec<ResourceDefinition>,
    templates: Vec<ResourceTemplateDefinition>,
    readers: CapabilityRegistry<ResourceReadParams, ReadResourceResult>,
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            templates: Vec::new(),
            readers: CapabilityRegistry::new(CapabilityKind::Resource),
        }
    }

    /// Advertise `definition` in `resources/list` and serve reads of its URI.
    pub fn register<F, Fut>(&mut self, definition: ResourceDefinition, reader: F)
    where
        F: Fn(ResourceReadParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<ReadResourceResult>> + Send + 'static,
    {
        self.readers.register(definition.uri.clone(), reader);
        self.resources.retain(|r| r.uri != definition.uri);
        self.resources.push(definition);
    }

    /// Serve reads of `uri` without listing it.
    pub fn register_reader<F, Fut>(&mut self, uri: impl Into<String>, reader: F)
    where
        F: Fn(ResourceReadParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<ReadResourceResult>> + Send + 'static,
    {
        self.readers.register(uri, reader);
    }

    pub fn add_template(&mut self, template: ResourceTemplateDefinition) {
        self.templates.retain(|t| t.uri_template != template.uri_template);
        self.templates.push(template);
    }

    pub fn list_resources(&self) -> Vec<ResourceDefinition> {
        self.resources.clone()
    }

    pub fn list_templates(&self) -> Vec<ResourceTemplateDefinition> {
        self.templates.clone()
    }

    pub async fn read(&self, params: ResourceReadParams) -> McpResult<ReadResourceResult> {
        let uri = params.uri.clone();
        self.readers.call(&uri, params).await
    }
}
