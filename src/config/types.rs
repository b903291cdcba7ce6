//! Settings Types
//!
//! User-facing settings with sensible defaults. The registry itself is data
//! (see `registry`); settings describe how this user wants it applied:
//! which families are on, which win namespace overlaps, and what language
//! to read in.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::language::AUTO;
use crate::types::{Result, WikiLensError};

/// Root settings structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preferred wiki language tag, or `auto` to follow the system language
    pub language: String,

    /// Preferred variant for languages with regional scripts (a full tag
    /// such as `zh-cn`), or `auto` to let the registry's defaults decide
    pub variant: String,

    /// Family ids to enable. Empty means every family is enabled.
    pub enabled_families: Vec<String>,

    /// Family ids that win namespace overlaps, most preferred first.
    /// Families not listed fall back to registry declaration order.
    pub family_priority: Vec<String>,

    /// Override for the content cache directory
    pub cache_dir: Option<PathBuf>,

    /// Override for the wiki registry file (default: the built-in registry)
    pub registry_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: AUTO.to_string(),
            variant: AUTO.to_string(),
            enabled_families: Vec::new(),
            family_priority: Vec::new(),
            cache_dir: None,
            registry_path: None,
        }
    }
}

impl Settings {
    /// Validate settings values after loading.
    /// Returns `WikiLensError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(WikiLensError::config("language must not be empty"));
        }
        if self.variant.trim().is_empty() {
            return Err(WikiLensError::config("variant must not be empty"));
        }
        for id in self.enabled_families.iter().chain(&self.family_priority) {
            if id.trim().is_empty() {
                return Err(WikiLensError::config("family ids must not be empty"));
            }
        }
        Ok(())
    }

    /// Whether a family is enabled. An empty enabled set enables everything.
    pub fn is_family_enabled(&self, id: &str) -> bool {
        self.enabled_families.is_empty() || self.enabled_families.iter().any(|f| f == id)
    }
}

// =============================================================================
// Tests
// =============================================================================
