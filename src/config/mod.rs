//! Configuration: `credvault.toml` settings with built-in defaults.

pub mod settings;

pub use settings::Settings;
