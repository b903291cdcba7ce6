//! Target Resolution
//!
//! Maps a `(namespace, identifier)` target to the single correct wiki
//! individual and builds the final article URL. Pure and synchronous: all
//! I/O happens later, when a caller asks for an excerpt or thumbnail.
//!
//! ## Claiming rule
//!
//! Namespaces may overlap across families. The claiming family is picked by
//! explicit user priority first, then registry declaration order; the first
//! claimant wins. A namespace nobody claims resolves to `None` — a valid
//! "no wiki available" outcome, never an error.

use tracing::{debug, trace};
use url::form_urlencoded;

use crate::config::Settings;
use crate::constants::language::FALLBACK_SYSTEM;
use crate::registry::{LanguageRequest, Registry, WikiFamily, best_match};
use crate::types::Target;

// =============================================================================
// WikiPage
// =============================================================================

/// A fully resolved wiki page. Immutable; created per resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPage {
    /// Id of the family that claimed the target
    pub family_id: String,
    /// Article title after the namespace transform (human-readable form)
    pub title: String,
    /// Final article URL, percent-encoded
    pub url: String,
    /// API base URL of the chosen edition
    pub api_url: String,
    /// Random-article URL for the chosen edition
    pub random_url: String,
    /// Language tag of the chosen edition
    pub language_tag: String,
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves targets against a loaded registry and the user's settings.
pub struct TargetResolver<'a> {
    registry: &'a Registry,
    settings: &'a Settings,
    system_language: String,
}

impl<'a> TargetResolver<'a> {
    /// `system_language` is the caller's display-language tag, consumed by
    /// the `auto` language setting. The locale supplier is an external
    /// collaborator; pass [`detect_system_language`] for a best-effort
    /// environment probe.
    pub fn new(registry: &'a Registry, settings: &'a Settings, system_language: String) -> Self {
        Self {
            registry,
            settings,
            system_language,
        }
    }

    /// Resolve a target to a wiki page. `None` when no active family claims
    /// the target's namespace.
    pub fn resolve(&self, target: &Target) -> Option<WikiPage> {
        let family = self.claiming_family(&target.namespace)?;
        let format = family.namespaces.get(&target.namespace)?;
        let title = format.apply(&target.identifier);

        let wiki = best_match(family, self.language_request(), &self.system_language);
        let url = wiki.article_url_for(&encode_title(&title));
        debug!(target = %target, family = %family.id, lang = %wiki.language.tag, %url, "resolved wiki page");

        Some(WikiPage {
            family_id: family.id.clone(),
            title,
            url,
            api_url: wiki.api_url.clone(),
            random_url: wiki.random_article_url.clone(),
            language_tag: wiki.language.tag.clone(),
        })
    }

    /// Resolve a random page for a namespace — the "feeling lucky" pathway.
    /// Uses the same claiming rule; needs no concrete identifier.
    pub fn random_page(&self, namespace: &str) -> Option<WikiPage> {
        let family = self.claiming_family(namespace)?;
        let wiki = best_match(family, self.language_request(), &self.system_language);
        debug!(%namespace, family = %family.id, "resolved random page");

        Some(WikiPage {
            family_id: family.id.clone(),
            title: String::new(),
            url: wiki.random_article_url.clone(),
            api_url: wiki.api_url.clone(),
            random_url: wiki.random_article_url.clone(),
            language_tag: wiki.language.tag.clone(),
        })
    }

    fn language_request(&self) -> LanguageRequest<'_> {
        LanguageRequest::new(
            &self.settings.language,
            Some(self.settings.variant.as_str()),
        )
    }

    /// First active family claiming the namespace: user-prioritized families
    /// first, then declaration order.
    fn claiming_family(&self, namespace: &str) -> Option<&'a WikiFamily> {
        let claimants: Vec<&WikiFamily> = self
            .registry
            .families_claiming(namespace)
            .filter(|family| self.settings.is_family_enabled(&family.id))
            .collect();

        for id in &self.settings.family_priority {
            if let Some(family) = claimants.iter().find(|family| &family.id == id).copied() {
                trace!(%namespace, family = %family.id, "claimed via priority list");
                return Some(family);
            }
        }
        claimants.first().copied()
    }
}

/// Percent-encode an article title for URL substitution.
///
/// Form-encodes the title, then rewrites `+` to `%20`: wiki servers expect
/// literal percent-escapes for spaces in path segments.
pub fn encode_title(title: &str) -> String {
    form_urlencoded::byte_serialize(title.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Best-effort system display-language probe from the process environment
/// (`LC_ALL`/`LANG`, e.g. `zh_TW.UTF-8` → `zh-tw`).
pub fn detect_system_language() -> String {
    std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LANG"))
        .ok()
        .and_then(|raw| {
            let tag = raw.split('.').next()?.replace('_', "-").to_lowercase();
            (!tag.is_empty() && tag != "c" && tag != "posix").then_some(tag)
        })
        .unwrap_or_else(|| FALLBACK_SYSTEM.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::load_from_str(
            r#"
            [[family]]
            id = "alpha"
            display_name = "Alpha Wiki"

            [family.namespaces]
            item = {}
            block = {}
            entity = { prefix = "Entity:" }

            [[family.wikis]]
            article_url = "https://alpha.example/w/{title}"
            api_url = "https://alpha.example/api.php"
            random_article_url = "https://alpha.example/wiki/Special:Random"
            language = { tag = "en", label = "English", default = true }

            [[family.wikis]]
            article_url = "https://zh.alpha.example/w/{title}"
            api_url = "https://zh.alpha.example/api.php"
            random_article_url = "https://zh.alpha.example/wiki/Special:Random"
            language = { tag = "zh-cn", label = "大陆简体", variant_default = true }

            [[family]]
            id = "beta"
            display_name = "Beta Wiki"

            [family.namespaces]
            item = {}

            [[family.wikis]]
            article_url = "https://beta.example/w/{title}"
            api_url = "https://beta.example/api.php"
            random_article_url = "https://beta.example/wiki/Special:Random"
            language = { tag = "en", label = "English", default = true }
        "#,
        )
        .unwrap()
    }

    fn resolver<'a>(registry: &'a Registry, settings: &'a Settings) -> TargetResolver<'a> {
        TargetResolver::new(registry, settings, "en".to_string())
    }

    #[test]
    fn test_resolve_builds_encoded_article_url() {
        let registry = registry();
        let settings = Settings::default();
        let page = resolver(&registry, &settings)
            .resolve(&Target::new("item", "oak_log"))
            .unwrap();
        assert_eq!(page.family_id, "alpha");
        assert_eq!(page.title, "Oak Log");
        assert_eq!(page.url, "https://alpha.example/w/Oak%20Log");
        assert_eq!(page.language_tag, "en");
    }

    #[test]
    fn test_resolve_applies_namespace_prefix() {
        let registry = registry();
        let settings = Settings::default();
        let page = resolver(&registry, &settings)
            .resolve(&Target::new("entity", "ender_dragon"))
            .unwrap();
        assert_eq!(page.title, "Entity:Ender Dragon");
        assert_eq!(page.url, "https://alpha.example/w/Entity%3AEnder%20Dragon");
    }

    #[test]
    fn test_unclaimed_namespace_resolves_to_none() {
        let registry = registry();
        let settings = Settings::default();
        assert!(
            resolver(&registry, &settings)
                .resolve(&Target::new("biome", "plains"))
                .is_none()
        );
    }

    #[test]
    fn test_overlap_defaults_to_declaration_order() {
        let registry = registry();
        let settings = Settings::default();
        let page = resolver(&registry, &settings)
            .resolve(&Target::new("item", "stone"))
            .unwrap();
        assert_eq!(page.family_id, "alpha");
    }

    #[test]
    fn test_overlap_honors_user_priority() {
        let registry = registry();
        let settings = Settings {
            family_priority: vec!["beta".to_string()],
            ..Settings::default()
        };
        let page = resolver(&registry, &settings)
            .resolve(&Target::new("item", "stone"))
            .unwrap();
        assert_eq!(page.family_id, "beta");
    }

    #[test]
    fn test_disabled_family_passed_over() {
        let registry = registry();
        let settings = Settings {
            enabled_families: vec!["beta".to_string()],
            ..Settings::default()
        };
        let page = resolver(&registry, &settings)
            .resolve(&Target::new("item", "stone"))
            .unwrap();
        assert_eq!(page.family_id, "beta");

        // beta does not claim "block"; alpha is disabled
        assert!(resolver(&registry, &settings).random_page("block").is_none());
    }

    #[test]
    fn test_language_preference_flows_into_resolution() {
        let registry = registry();
        let settings = Settings {
            language: "zh".to_string(),
            ..Settings::default()
        };
        let page = resolver(&registry, &settings)
            .resolve(&Target::new("block", "stone"))
            .unwrap();
        assert_eq!(page.language_tag, "zh-cn");
        assert_eq!(page.url, "https://zh.alpha.example/w/Stone");
    }

    #[test]
    fn test_random_page_needs_no_identifier() {
        let registry = registry();
        let settings = Settings::default();
        let page = resolver(&registry, &settings).random_page("item").unwrap();
        assert_eq!(page.url, "https://alpha.example/wiki/Special:Random");
        assert!(page.title.is_empty());
    }

    #[test]
    fn test_random_page_unclaimed_is_none() {
        let registry = registry();
        let settings = Settings::default();
        assert!(resolver(&registry, &settings).random_page("biome").is_none());
    }

    #[test]
    fn test_encode_title_space_and_reserved() {
        assert_eq!(encode_title("Oak Log"), "Oak%20Log");
        assert_eq!(encode_title("AT&T"), "AT%26T");
        assert_eq!(encode_title("C+Plus"), "C%2BPlus");
    }
}
