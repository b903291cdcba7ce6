//! Wiki Family Data Model
//!
//! A *family* is a wiki site grouping (e.g. one game's official wiki) that
//! may offer several language editions. An *individual* is one such edition
//! with its own article/API/random-article URLs. Both are plain data: there
//! is exactly one behavioral shape per family, differentiated only by what
//! the registry file declares. Immutable after load.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder substituted with the (percent-encoded) article title in URL
/// templates.
pub const TITLE_PLACEHOLDER: &str = "{title}";

// =============================================================================
// Family
// =============================================================================

/// A wiki site grouping with one or more language editions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiFamily {
    /// Stable identifier, unique across the registry
    pub id: String,

    /// Human-readable name for presentation
    pub display_name: String,

    /// Game namespaces this family claims, each with its article-title
    /// transform. Insertion order is preserved; it carries curation intent.
    #[serde(default)]
    pub namespaces: IndexMap<String, TitleFormat>,

    /// Language editions. At least one; exactly one flagged `default`.
    pub wikis: Vec<WikiIndividual>,
}

impl WikiFamily {
    /// The family's declared default edition.
    ///
    /// Registry validation guarantees exactly one edition carries the flag,
    /// so the fallback to the first edition is never taken on loaded data.
    pub fn default_wiki(&self) -> &WikiIndividual {
        self.wikis
            .iter()
            .find(|wiki| wiki.language.default)
            .unwrap_or(&self.wikis[0])
    }

    /// Whether this family claims the given namespace.
    pub fn claims(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }
}

// =============================================================================
// Individual (language edition)
// =============================================================================

/// One language edition of a family. Owned exclusively by its family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiIndividual {
    /// Article URL template containing `{title}`
    pub article_url: String,

    /// Base URL of the wiki's API endpoint
    pub api_url: String,

    /// Random-article URL (no title needed)
    pub random_article_url: String,

    /// Declared language capability of this edition
    pub language: LanguageDescriptor,
}

impl WikiIndividual {
    /// Substitute an already-encoded title into the article URL template.
    pub fn article_url_for(&self, encoded_title: &str) -> String {
        self.article_url.replace(TITLE_PLACEHOLDER, encoded_title)
    }
}

// =============================================================================
// Language descriptor
// =============================================================================

/// A language tag plus matching hints, declared per edition.
///
/// Tags follow the `base` or `base-variant` shape (`en`, `zh-cn`). The two
/// flags drive the matcher's tie-breaks: `default` marks the family's
/// fallback edition, `variant_default` marks the preferred variant among
/// several editions sharing one base language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    /// Language tag, e.g. `en` or `zh-cn`
    pub tag: String,

    /// Human-readable label, e.g. `English` or `大陆简体`
    pub label: String,

    /// This edition is the family's default (exactly one per family)
    #[serde(default)]
    pub default: bool,

    /// Preferred edition among several sharing the same base language
    #[serde(default)]
    pub variant_default: bool,
}

impl LanguageDescriptor {
    /// Base language component of the tag (`zh-cn` → `zh`).
    pub fn base(&self) -> &str {
        base_of(&self.tag)
    }

    /// Variant component, if any (`zh-cn` → `cn`).
    pub fn variant(&self) -> Option<&str> {
        self.tag.split_once('-').map(|(_, variant)| variant)
    }
}

/// Base language component of any tag.
pub fn base_of(tag: &str) -> &str {
    tag.split_once('-').map_or(tag, |(base, _)| base)
}

// =============================================================================
// Title transform
// =============================================================================

/// Data-driven transform from a game identifier to an article title.
///
/// Differences between namespaces are pure data: how word case is mapped,
/// whether underscores become spaces, and an optional title prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleFormat {
    /// Word-case mapping applied to the identifier
    pub case: TitleCase,

    /// Replace `_` with ` ` before casing (most wikis title "Oak Log",
    /// not "oak_log")
    pub spaces: bool,

    /// Optional prefix prepended to the finished title, e.g. `Entity:`
    pub prefix: Option<String>,
}

impl Default for TitleFormat {
    fn default() -> Self {
        Self {
            case: TitleCase::Title,
            spaces: true,
            prefix: None,
        }
    }
}

impl TitleFormat {
    /// Apply the transform to a raw identifier.
    pub fn apply(&self, identifier: &str) -> String {
        let spaced = if self.spaces {
            identifier.replace('_', " ")
        } else {
            identifier.to_string()
        };

        let cased = match self.case {
            TitleCase::Preserve => spaced,
            TitleCase::Lower => spaced.to_lowercase(),
            TitleCase::Title => spaced
                .split(' ')
                .map(capitalize_word)
                .collect::<Vec<_>>()
                .join(" "),
        };

        match &self.prefix {
            Some(prefix) => format!("{prefix}{cased}"),
            None => cased,
        }
    }
}

/// Word-case mapping for article titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleCase {
    /// Leave the identifier's casing untouched
    Preserve,
    /// Uppercase the first letter of every word
    Title,
    /// Lowercase everything
    Lower,
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn edition(tag: &str, default: bool, variant_default: bool) -> WikiIndividual {
        WikiIndividual {
            article_url: format!("https://{tag}.example.wiki/w/{TITLE_PLACEHOLDER}"),
            api_url: format!("https://{tag}.example.wiki/api.php"),
            random_article_url: format!("https://{tag}.example.wiki/wiki/Special:Random"),
            language: LanguageDescriptor {
                tag: tag.to_string(),
                label: tag.to_string(),
                default,
                variant_default,
            },
        }
    }

    #[test]
    fn test_language_descriptor_base_and_variant() {
        let lang = LanguageDescriptor {
            tag: "zh-cn".to_string(),
            label: "大陆简体".to_string(),
            default: false,
            variant_default: true,
        };
        assert_eq!(lang.base(), "zh");
        assert_eq!(lang.variant(), Some("cn"));

        let bare = LanguageDescriptor {
            tag: "en".to_string(),
            label: "English".to_string(),
            default: true,
            variant_default: false,
        };
        assert_eq!(bare.base(), "en");
        assert_eq!(bare.variant(), None);
    }

    #[test]
    fn test_default_wiki_finds_flagged_edition() {
        let family = WikiFamily {
            id: "example".to_string(),
            display_name: "Example Wiki".to_string(),
            namespaces: IndexMap::new(),
            wikis: vec![edition("zh-cn", false, true), edition("en", true, false)],
        };
        assert_eq!(family.default_wiki().language.tag, "en");
    }

    #[test]
    fn test_article_url_substitution() {
        let wiki = edition("en", true, false);
        assert_eq!(
            wiki.article_url_for("Oak%20Log"),
            "https://en.example.wiki/w/Oak%20Log"
        );
    }

    #[test]
    fn test_title_format_default_title_case() {
        let format = TitleFormat::default();
        assert_eq!(format.apply("oak_log"), "Oak Log");
    }

    #[test]
    fn test_title_format_preserve_with_prefix() {
        let format = TitleFormat {
            case: TitleCase::Preserve,
            spaces: false,
            prefix: Some("Entity:".to_string()),
        };
        assert_eq!(format.apply("ender_dragon"), "Entity:ender_dragon");
    }

    #[test]
    fn test_title_format_lower() {
        let format = TitleFormat {
            case: TitleCase::Lower,
            spaces: true,
            prefix: None,
        };
        assert_eq!(format.apply("Oak_Log"), "oak log");
    }
}
