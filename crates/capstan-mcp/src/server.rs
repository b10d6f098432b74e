//! The immutable capability set a dispatcher serves, and its builder.

use std::future::Future;
use std::sync::Arc;

use crate::completions::{self, CompletionRegistry};
use crate::config::ServerConfig;
use crate::prompts::{self, PromptRegistry};
use crate::resources::{self, ResourceRegistry};
use crate::tools::{self, ToolRegistry};
use crate::types::{
    CompleteParams, CompleteResult, McpResult, PromptDefinition, PromptGetParams,
    PromptGetResult, ReadResourceResult, ResourceDefinition, ResourceReadParams,
    ResourceTemplateDefinition, ToolCallParams, ToolCallResult, ToolDefinition,
};

/// Static configuration plus the four capability registries.
///
/// Built once; shared across every request through an `Arc` and never
/// modified afterwards.
#[derive(Debug)]
pub struct McpServer {
    config: ServerConfig,
    prompts: PromptRegistry,
    resources: ResourceRegistry,
    tools: ToolRegistry,
    completions: CompletionRegistry,
}

impl McpServer {
    pub fn builder(config: ServerConfig) -> McpServerBuilder {
        McpServerBuilder::new(config)
    }

    /// A server carrying only the built-in capabilities.
    pub fn builtin(config: ServerConfig) -> Arc<Self> {
        Self::builder(config).with_builtin_capabilities().build()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn prompts(&self) -> &PromptRegistry {
        &self.prompts
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn completions(&self) -> &CompletionRegistry {
        &self.completions
    }
}

pub struct McpServerBuilder {
    config: ServerConfig,
    prompts: PromptRegistry,
    resources: ResourceRegistry,
    tools: ToolRegistry,
    completions: CompletionRegistry,
}

impl McpServerBuilder {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            prompts: PromptRegistry::new(),
            resources: ResourceRegistry::new(),
            tools: ToolRegistry::new(),
            completions: CompletionRegistry::new(),
        }
    }

    pub fn with_builtin_capabilities(mut self) -> Self {
        prompts::register_builtin(&mut self.prompts);
        resources::register_builtin(&mut self.resources);
        tools::register_builtin(&mut self.tools);
        completions::register_builtin(&mut self.completions);
        self
    }

    pub fn tool<F, Fut>(mut self, definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(ToolCallParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<ToolCallResult>> + Send + 'static,
    {
        self.tools.register(definition, handler);
        self
    }

    pub fn prompt<F, Fut>(mut self, definition: PromptDefinition, handler: F) -> Self
    where
        F: Fn(PromptGetParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<PromptGetResult>> + Send + 'static,
    {
        self.prompts.register(definition, handler);
        self
    }

    pub fn resource<F, Fut>(mut self, definition: ResourceDefinition, reader: F) -> Self
    where
        F: Fn(ResourceReadParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<ReadResourceResult>> + Send + 'static,
    {
        self.resources.register(definition, reader);
        self
    }

    pub fn resource_reader<F, Fut>(mut self, uri: impl Into<String>, reader: F) -> Self
    where
        F: Fn(ResourceReadParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<ReadResourceResult>> + Send + 'static,
    {
        self.resources.register_reader(uri, reader);
        self
    }

    pub fn resource_template(mut self, template: ResourceTemplateDefinition) -> Self {
        self.resources.add_template(template);
        self
    }

    pub fn prompt_completion<F, Fut>(mut self, prompt: &str, handler: F) -> Self
    where
        F: Fn(CompleteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<CompleteResult>> + Send + 'static,
    {
        self.completions.register_prompt(prompt, handler);
        self
    }

    pub fn resource_completion<F, Fut>(mut self, uri: &str, handler: F) -> Self
    where
        F: Fn(CompleteParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = McpResult<CompleteResult>> + Send + 'static,
    {
        self.completions.register_resource(uri, handler);
        self
    }

    pub fn build(self) -> Arc<McpServer> {
        tracing::debug!(
            tools = self.tools.list_tools().len(),
            prompts = self.prompts.list_prompts().len(),
            resources = self.resources.list_resources().len(),
            completions = self.completions.keys().len(),
            "capability registries built"
        );
        Arc::new(McpServer {
            config: self.config,
            prompts: self.prompts,
            resources: self.resources,
            tools: self.tools,
            completions: self.completions,
        })
    }
}
