//! Page Excerpt Fetching
//!
//! Asks a wiki's API for an article summary (TextExtracts + PageImages)
//! through the content cache and parses the response defensively into a
//! [`PageExcerpt`]. Excerpts are best-effort enrichment: a parse failure
//! means "no excerpt available", never a blocked page open.
//!
//! Thumbnail *bytes* are not fetched here. The excerpt only carries the
//! image URL and declared dimensions; a caller that actually renders the
//! thumbnail fetches it lazily through [`ContentCache::fetch`], so pages
//! the user never previews cost no image download.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::cache::{ContentCache, ResultHandle, result_channel};
use crate::constants::excerpt::{MAX_CHARS, THUMBNAIL_SIZE};
use crate::resolver::WikiPage;
use crate::types::{ExcerptError, FetchError};

/// Outcome of an excerpt fetch, cloneable for fan-out.
pub type ExcerptOutcome = Result<PageExcerpt, ExcerptError>;

// =============================================================================
// Data model
// =============================================================================

/// Image descriptor attached to an excerpt: URL plus declared pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Short preview of a wiki article. Immutable; not cached itself — only the
/// underlying byte payloads are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExcerpt {
    pub title: String,
    pub excerpt: String,
    pub image: Option<PageImage>,
}

// =============================================================================
// Fetcher
// =============================================================================

/// Orchestrates summary lookups over the content cache.
pub struct ExcerptFetcher {
    cache: Arc<ContentCache>,
}

impl ExcerptFetcher {
    pub fn new(cache: Arc<ContentCache>) -> Self {
        Self { cache }
    }

    /// The API query URL an excerpt fetch for `page` would hit.
    pub fn query_url(page: &WikiPage) -> Result<String, ExcerptError> {
        let mut url = Url::parse(&page.api_url)
            .map_err(|e| ExcerptError::Parse(format!("bad API URL {}: {e}", page.api_url)))?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("formatversion", "2")
            .append_pair("redirects", "1")
            .append_pair("prop", "extracts|pageimages")
            .append_pair("exintro", "1")
            .append_pair("explaintext", "1")
            .append_pair("exchars", &MAX_CHARS.to_string())
            .append_pair("piprop", "thumbnail")
            .append_pair("pithumbsize", &THUMBNAIL_SIZE.to_string())
            .append_pair("titles", &page.title);
        Ok(url.into())
    }

    /// Fetch and parse the excerpt for a resolved page. Never blocks; the
    /// handle completes on the fetch worker's context.
    pub fn fetch_excerpt(&self, page: &WikiPage) -> ResultHandle<ExcerptOutcome> {
        let (slot, handle) = result_channel();

        let query = match Self::query_url(page) {
            Ok(query) => query,
            Err(e) => {
                slot.complete(Err(e));
                return handle;
            }
        };

        trace!(page = %page.title, %query, "requesting excerpt");
        let bytes = self.cache.fetch(&query);
        let title = page.title.clone();
        tokio::spawn(async move {
            let outcome = match bytes.wait().await {
                Some(Ok(body)) => parse_excerpt(&body),
                Some(Err(e)) => Err(ExcerptError::Fetch(e)),
                None => Err(ExcerptError::Fetch(FetchError::Abandoned)),
            };
            if let Err(error) = &outcome {
                debug!(page = %title, %error, "no excerpt available");
            }
            slot.complete(outcome);
        });

        handle
    }
}

// =============================================================================
// Response parsing
// =============================================================================

/// Parse a TextExtracts+PageImages response body.
///
/// Defensive throughout: any missing or oddly shaped field is a `Parse`
/// error (or, for the optional image, simply `None`), never a panic.
pub fn parse_excerpt(body: &[u8]) -> ExcerptOutcome {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ExcerptError::Parse(format!("invalid JSON: {e}")))?;

    let page = first_page(&value)
        .ok_or_else(|| ExcerptError::Parse("no pages in response".to_string()))?;

    // formatversion=2 uses `"missing": true`; the legacy shape uses `""`.
    if page.get("missing").is_some_and(|m| m.as_bool().unwrap_or(true)) {
        return Err(ExcerptError::Parse("page is missing".to_string()));
    }

    let title = json_string(page, "title")
        .ok_or_else(|| ExcerptError::Parse("page has no title".to_string()))?;
    let extract = json_string(page, "extract")
        .ok_or_else(|| ExcerptError::Parse("page has no extract".to_string()))?;

    let image = page.get("thumbnail").and_then(|thumb| {
        Some(PageImage {
            url: json_string(thumb, "source")?,
            width: json_u32(thumb, "width")?,
            height: json_u32(thumb, "height")?,
        })
    });

    Ok(PageExcerpt {
        title,
        excerpt: clean_text(&extract),
        image,
    })
}

/// The first entry of `query.pages`, accepting both the formatversion=2
/// array shape and the legacy keyed-object shape.
fn first_page(value: &Value) -> Option<&Value> {
    let pages = value.get("query")?.get("pages")?;
    match pages {
        Value::Array(entries) => entries.first(),
        Value::Object(entries) => entries.values().next(),
        _ => None,
    }
}

/// Strip zero-width markers and control characters (newlines survive).
fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{200E}' | '\u{200F}' | '\u{FEFF}'))
        .filter(|c| !c.is_control() || *c == '\n')
        .collect()
}

fn json_string(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(String::from)
}

fn json_u32(value: &Value, key: &str) -> Option<u32> {
    value.get(key)?.as_u64().and_then(|n| u32::try_from(n).ok())
}

// =============================================================================
// Tests
// =============================================================================
