//! Configuration
//!
//! User settings (language preference, enabled families, cache location)
//! and the figment-based loader that merges defaults, config files, and
//! environment variables.

pub mod loader;
pub mod types;

pub use loader::SettingsLoader;
pub use types::Settings;
