/// Run settings: defaults, JSON loading, validation.
pub mod settings;
