//! Language Edition Matching
//!
//! Picks the best language edition of a family for a requested language and
//! variant. Pure and deterministic: identical inputs always select the same
//! edition, with ties broken by the family's declaration order.
//!
//! ## Resolution order (first rule with a hit wins)
//!
//! 1. Requested language `auto`: substitute the caller's system display
//!    language and retry rules 2–3; if nothing matches, rule 4.
//! 2. Exact tag match. A pinned variant (set and not `auto`) overrides the
//!    requested tag for its base language.
//! 3. Base-language match, only when no variant is pinned. Several editions
//!    sharing the base prefer the one flagged `variant_default`.
//! 4. The family's default edition. Guaranteed to exist by registry
//!    validation, so matching never fails.

use crate::constants::language::AUTO;

use super::family::{WikiFamily, WikiIndividual, base_of};

/// A resolution request: language tag plus optional variant pin.
///
/// Either field may be the literal `auto`. The variant, when pinned, is a
/// full tag such as `zh-cn`, mirroring how regional-script preferences are
/// expressed in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageRequest<'a> {
    pub language: &'a str,
    pub variant: Option<&'a str>,
}

impl<'a> LanguageRequest<'a> {
    pub fn new(language: &'a str, variant: Option<&'a str>) -> Self {
        Self { language, variant }
    }
}

/// Select the edition of `family` best matching `request`.
///
/// `system_tag` is the caller's display-language tag (e.g. `zh-TW`),
/// consulted only when the requested language is `auto`.
pub fn best_match<'a>(
    family: &'a WikiFamily,
    request: LanguageRequest<'_>,
    system_tag: &str,
) -> &'a WikiIndividual {
    let requested = if request.language.eq_ignore_ascii_case(AUTO) {
        system_tag
    } else {
        request.language
    };
    let requested = requested.to_ascii_lowercase();

    let pinned = request
        .variant
        .filter(|variant| !variant.eq_ignore_ascii_case(AUTO))
        .map(str::to_ascii_lowercase);

    match_editions(family, &requested, pinned.as_deref()).unwrap_or_else(|| family.default_wiki())
}

fn match_editions<'a>(
    family: &'a WikiFamily,
    requested: &str,
    pinned: Option<&str>,
) -> Option<&'a WikiIndividual> {
    let base = base_of(requested);

    // Rule 2: exact tag. A pin for this base language takes precedence over
    // any variant embedded in the requested tag itself.
    if let Some(pin) = pinned {
        if base_of(pin) == base {
            if let Some(hit) = find_tag(family, pin) {
                return Some(hit);
            }
            // Pinned variant is absent from this family; the base-language
            // rule does not apply to pinned requests.
            return None;
        }
    }
    if let Some(hit) = find_tag(family, requested) {
        return Some(hit);
    }

    // Rule 3: base language, variant unpinned. Several registered variants
    // resolve to the flagged default for that base.
    let mut base_hits = family
        .wikis
        .iter()
        .filter(|wiki| wiki.language.base() == base);
    let first = base_hits.next()?;
    if base_hits.clone().next().is_none() {
        return Some(first);
    }
    Some(
        std::iter::once(first)
            .chain(base_hits)
            .find(|wiki| wiki.language.variant_default)
            .unwrap_or(first),
    )
}

fn find_tag<'a>(family: &'a WikiFamily, tag: &str) -> Option<&'a WikiIndividual> {
    family
        .wikis
        .iter()
        .find(|wiki| wiki.language.tag.eq_ignore_ascii_case(tag))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::registry::family::LanguageDescriptor;

    fn edition(tag: &str, default: bool, variant_default: bool) -> WikiIndividual {
        WikiIndividual {
            article_url: format!("https://{tag}.example/w/{{title}}"),
            api_url: format!("https://{tag}.example/api.php"),
            random_article_url: format!("https://{tag}.example/wiki/Special:Random"),
            language: LanguageDescriptor {
                tag: tag.to_string(),
                label: tag.to_string(),
                default,
                variant_default,
            },
        }
    }

    fn family(editions: Vec<WikiIndividual>) -> WikiFamily {
        WikiFamily {
            id: "test".to_string(),
            display_name: "Test Wiki".to_string(),
            namespaces: IndexMap::new(),
            wikis: editions,
        }
    }

    #[test]
    fn test_exact_tag_match() {
        let family = family(vec![
            edition("en", true, false),
            edition("de", false, false),
        ]);
        let hit = best_match(&family, LanguageRequest::new("de", None), "en");
        assert_eq!(hit.language.tag, "de");
    }

    #[test]
    fn test_auto_substitutes_system_language() {
        let family = family(vec![
            edition("en", true, false),
            edition("fr", false, false),
        ]);
        let hit = best_match(&family, LanguageRequest::new("auto", Some("auto")), "fr");
        assert_eq!(hit.language.tag, "fr");
    }

    #[test]
    fn test_auto_system_variant_falls_back_to_variant_default() {
        // System zh-TW, no zh-tw edition: the variant-default edition for
        // base language zh wins over the family default.
        let family = family(vec![
            edition("en", true, false),
            edition("zh-cn", false, true),
        ]);
        let hit = best_match(&family, LanguageRequest::new("auto", Some("auto")), "zh-TW");
        assert_eq!(hit.language.tag, "zh-cn");
    }

    #[test]
    fn test_base_match_prefers_variant_default_among_several() {
        let family = family(vec![
            edition("en", true, false),
            edition("zh-tw", false, false),
            edition("zh-cn", false, true),
            edition("zh-hk", false, false),
        ]);
        let hit = best_match(&family, LanguageRequest::new("zh", None), "en");
        assert_eq!(hit.language.tag, "zh-cn");
    }

    #[test]
    fn test_base_match_single_candidate_wins_without_flag() {
        let family = family(vec![
            edition("en", true, false),
            edition("pt-br", false, false),
        ]);
        let hit = best_match(&family, LanguageRequest::new("pt", None), "en");
        assert_eq!(hit.language.tag, "pt-br");
    }

    #[test]
    fn test_unmatched_language_falls_back_to_family_default() {
        let family = family(vec![
            edition("en", true, false),
            edition("de", false, false),
        ]);
        let hit = best_match(&family, LanguageRequest::new("fr", Some("auto")), "fr");
        assert_eq!(hit.language.tag, "en");
    }

    #[test]
    fn test_pinned_variant_overrides_system_tag() {
        let family = family(vec![
            edition("en", true, false),
            edition("zh-cn", false, true),
            edition("zh-tw", false, false),
        ]);
        let hit = best_match(
            &family,
            LanguageRequest::new("auto", Some("zh-tw")),
            "zh-CN",
        );
        assert_eq!(hit.language.tag, "zh-tw");
    }

    #[test]
    fn test_pinned_variant_missing_falls_to_default() {
        // zh-hk pinned but not registered: pinned requests skip the
        // base-language rule and land on the family default.
        let family = family(vec![
            edition("en", true, false),
            edition("zh-cn", false, true),
        ]);
        let hit = best_match(&family, LanguageRequest::new("zh", Some("zh-hk")), "en");
        assert_eq!(hit.language.tag, "en");
    }

    #[test]
    fn test_pin_for_other_base_language_is_ignored() {
        let family = family(vec![
            edition("en", true, false),
            edition("de", false, false),
        ]);
        let hit = best_match(&family, LanguageRequest::new("de", Some("zh-cn")), "en");
        assert_eq!(hit.language.tag, "de");
    }

    #[test]
    fn test_tag_matching_is_case_insensitive() {
        let family = family(vec![
            edition("en", true, false),
            edition("zh-cn", false, true),
        ]);
        let hit = best_match(&family, LanguageRequest::new("ZH-CN", None), "en");
        assert_eq!(hit.language.tag, "zh-cn");
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let family = family(vec![
            edition("en", true, false),
            edition("zh-cn", false, true),
            edition("zh-tw", false, false),
        ]);
        let request = LanguageRequest::new("zh", None);
        let first = best_match(&family, request, "en").language.tag.clone();
        for _ in 0..16 {
            assert_eq!(best_match(&family, request, "en").language.tag, first);
        }
    }

    #[test]
    fn test_ties_broken_by_declaration_order() {
        // Two zh editions, neither flagged: the first declared wins.
        let family = family(vec![
            edition("en", true, false),
            edition("zh-tw", false, false),
            edition("zh-cn", false, false),
        ]);
        let hit = best_match(&family, LanguageRequest::new("zh", None), "en");
        assert_eq!(hit.language.tag, "zh-tw");
    }
}
