//! Completion registry and the built-in completers.

pub mod greet;
pub mod memo;
pub mod registry;

pub use registry::CompletionRegistry;

use crate::resources;

/// Register every built-in completer.
pub fn register_builtin(registry: &mut CompletionRegistry) {
    registry.register_prompt("greet", greet::complete_greet);
    registry.register_resource(resources::memo::NOTES_TEMPLATE, memo::complete_note_id);
}
