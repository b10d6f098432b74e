//! Prompt registry and the built-in prompts.

pub mod greet;
pub mod registry;

pub use registry::PromptRegistry;

/// Register every built-in prompt.
pub fn register_builtin(registry: &mut PromptRegistry) {
    registry.register(greet::definition(), greet::expand);
}
