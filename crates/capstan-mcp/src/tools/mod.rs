//! Tool registry and the built-in tools.

pub mod add;
pub mod echo;
pub mod registry;

pub use registry::ToolRegistry;

/// Register every built-in tool.
pub fn register_builtin(registry: &mut ToolRegistry) {
    registry.register(echo::definition(), echo::execute);
    registry.register(add::definition(), add::execute);
}
