//! Settings Loader (Figment-based)
//!
//! Loads and merges settings from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (`~/.config/wikilens/config.toml`)
//! 3. Project config (`./wikilens.toml`)
//! 4. Environment variables (`WIKILENS_*` prefix)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use tracing::debug;

use super::types::Settings;
use crate::constants::cache;
use crate::types::{Result, WikiLensError};

/// Settings loader
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings with the full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Settings> {
        let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global settings from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project settings from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        figment = figment.merge(Env::prefixed("WIKILENS_"));

        let settings: Settings = figment
            .extract()
            .map_err(|e| WikiLensError::Config(format!("settings error: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a specific file only (plus defaults).
    pub fn load_from_file(path: &Path) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| WikiLensError::Config(format!("settings error: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Platform config/cache roots for this application.
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "wikilens")
    }

    /// Path to the global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Path to the per-directory project config file.
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("wikilens.toml")
    }

    /// Effective content-cache directory: the settings override, the
    /// platform cache root, or the system temp dir as a last resort.
    pub fn cache_dir(settings: &Settings) -> PathBuf {
        if let Some(dir) = &settings.cache_dir {
            return dir.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.cache_dir().join(cache::DIR_NAME))
            .unwrap_or_else(|| std::env::temp_dir().join("wikilens").join(cache::DIR_NAME))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file_merges_over_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                language = "de"
                family_priority = ["beta"]
            "#,
        )
        .unwrap();

        let settings = SettingsLoader::load_from_file(&path).unwrap();
        assert_eq!(settings.language, "de");
        assert_eq!(settings.variant, "auto");
        assert_eq!(settings.family_priority, vec!["beta"]);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "language = \"\"\n").unwrap();
        assert!(SettingsLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_cache_dir_override_wins() {
        let settings = Settings {
            cache_dir: Some(PathBuf::from("/tmp/custom-cache")),
            ..Settings::default()
        };
        assert_eq!(
            SettingsLoader::cache_dir(&settings),
            PathBuf::from("/tmp/custom-cache")
        );
    }
}
