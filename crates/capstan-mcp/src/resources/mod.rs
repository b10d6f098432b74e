//! Resource registry and the built-in resources.

pub mod memo;
pub mod registry;

pub use registry::ResourceRegistry;

/// Register every built-in resource, template and note reader.
pub fn register_builtin(registry: &mut ResourceRegistry) {
    registry.register(memo::readme_definition(), memo::read_readme);
    registry.add_template(memo::notes_template());
    for (id, _) in memo::NOTES {
        registry.register_reader(memo::note_uri(id), memo::read_note);
    }
}
