//! Wiki Family Registry
//!
//! Loads and holds every known wiki family and its language editions.
//! Pure data plus lookup: the registry does no I/O after the initial load
//! and is never mutated afterwards (load-once, read-many). Callers hold it
//! by reference; no ambient global state.
//!
//! ## Load validation
//!
//! Malformed registry data is fatal (`WikiLensError::Config`):
//! - duplicate family id
//! - family with zero editions
//! - duplicate language tag within one family
//! - family without exactly one default edition
//! - more than one variant-default edition for the same base language
//!
//! ## Ordering
//!
//! Families and namespaces keep their declaration order from the source
//! file. That order carries curation intent and is the tie-break for
//! overlapping namespaces and language listings; nothing here sorts.

pub mod family;
pub mod language;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::types::{Result, WikiLensError};

pub use family::{LanguageDescriptor, TitleCase, TitleFormat, WikiFamily, WikiIndividual};
pub use language::{LanguageRequest, best_match};

/// Registry data bundled with the crate. Exercises every matcher rule.
const BUILTIN_REGISTRY: &str = include_str!("../../data/wikis.toml");

/// On-disk registry shape: a sequence of `[[family]]` tables.
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    family: Vec<WikiFamily>,
}

/// All known wiki families, with a namespace index for claim lookups.
#[derive(Debug)]
pub struct Registry {
    /// Families in declaration order
    families: Vec<WikiFamily>,
    /// Namespace → indices into `families`, in declaration order
    by_namespace: HashMap<String, Vec<usize>>,
}

impl Registry {
    /// Parse and validate a registry from TOML text.
    pub fn load_from_str(source: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(source)
            .map_err(|e| WikiLensError::Config(format!("malformed registry: {e}")))?;
        Self::from_families(file.family)
    }

    /// Parse and validate a registry file from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        debug!("Loading wiki registry from: {}", path.display());
        Self::load_from_str(&source)
    }

    /// The registry bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::load_from_str(BUILTIN_REGISTRY)
    }

    fn from_families(families: Vec<WikiFamily>) -> Result<Self> {
        validate(&families)?;

        let mut by_namespace: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, family) in families.iter().enumerate() {
            if family.namespaces.is_empty() {
                warn!(family = %family.id, "family declares no namespaces; it can never claim a target");
            }
            for namespace in family.namespaces.keys() {
                by_namespace.entry(namespace.clone()).or_default().push(index);
            }
        }

        debug!(
            families = families.len(),
            namespaces = by_namespace.len(),
            "wiki registry loaded"
        );
        Ok(Self {
            families,
            by_namespace,
        })
    }

    /// All families in declaration order.
    pub fn families(&self) -> &[WikiFamily] {
        &self.families
    }

    /// Look up a family by id.
    pub fn family(&self, id: &str) -> Option<&WikiFamily> {
        self.families.iter().find(|family| family.id == id)
    }

    /// Families enabled by the current settings, in declaration order.
    ///
    /// An empty enabled set means "everything enabled". Families with an
    /// empty namespace map are excluded: they cannot claim any target.
    pub fn active_families<'a>(&'a self, settings: &Settings) -> Vec<&'a WikiFamily> {
        self.families
            .iter()
            .filter(|family| settings.is_family_enabled(&family.id))
            .filter(|family| !family.namespaces.is_empty())
            .collect()
    }

    /// Every distinct language tag across active families' editions.
    ///
    /// Declaration order, not sorted: the source file's ordering is curated
    /// for presentation (e.g. a settings dropdown).
    pub fn all_available_languages(&self, settings: &Settings) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for family in self.active_families(settings) {
            for wiki in &family.wikis {
                if seen.insert(wiki.language.tag.clone()) {
                    tags.push(wiki.language.tag.clone());
                }
            }
        }
        tags
    }

    /// Families claiming a namespace, in declaration order. The resolver
    /// layers user priority and the enabled set on top of this.
    pub fn families_claiming<'a>(
        &'a self,
        namespace: &str,
    ) -> impl Iterator<Item = &'a WikiFamily> {
        self.by_namespace
            .get(namespace)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&index| &self.families[index])
    }
}

fn validate(families: &[WikiFamily]) -> Result<()> {
    let mut ids = HashSet::new();
    for family in families {
        if !ids.insert(family.id.as_str()) {
            return Err(WikiLensError::Config(format!(
                "duplicate family id '{}'",
                family.id
            )));
        }

        if family.wikis.is_empty() {
            return Err(WikiLensError::Config(format!(
                "family '{}' has no language editions",
                family.id
            )));
        }

        let mut tags = HashSet::new();
        for wiki in &family.wikis {
            if !tags.insert(wiki.language.tag.as_str()) {
                return Err(WikiLensError::Config(format!(
                    "family '{}' declares language tag '{}' twice",
                    family.id, wiki.language.tag
                )));
            }
        }

        let defaults = family.wikis.iter().filter(|w| w.language.default).count();
        if defaults != 1 {
            return Err(WikiLensError::Config(format!(
                "family '{}' must declare exactly one default edition, found {defaults}",
                family.id
            )));
        }

        let mut variant_default_bases = HashSet::new();
        for wiki in &family.wikis {
            if wiki.language.variant_default
                && !variant_default_bases.insert(wiki.language.base().to_string())
            {
                return Err(WikiLensError::Config(format!(
                    "family '{}' declares multiple variant-default editions for base language '{}'",
                    family.id,
                    wiki.language.base()
                )));
            }
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
