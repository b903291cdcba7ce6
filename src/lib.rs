//! wikilens — resolve in-game objects to the right wiki page
//!
//! Given a `(namespace, identifier)` target, wikilens picks the single
//! correct wiki individual (site + language edition) out of a registry of
//! families, builds the article URL, and can fetch a preview excerpt and
//! thumbnail through a disk-backed, single-flight content cache.
//!
//! ## Core Pieces
//!
//! - **Registry**: every known wiki family and its language editions;
//!   loaded once, read many, never mutated
//! - **LanguageMatcher**: pure best-edition selection for a requested
//!   language/variant, with `auto` following the system language
//! - **TargetResolver**: namespace claiming (user priority first, then
//!   declaration order) and article-URL construction
//! - **ContentCache**: content-addressable byte cache keyed by URL digest,
//!   with in-flight request deduplication and atomic disk persistence
//! - **ExcerptFetcher**: cache-backed article summaries; parse failures
//!   downgrade to "no excerpt", never block opening the page
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use wikilens::{ContentCache, Registry, Settings, Target, TargetResolver};
//!
//! let registry = Registry::builtin()?;
//! let settings = Settings::default();
//! let resolver = TargetResolver::new(&registry, &settings, "en".to_string());
//!
//! if let Some(page) = resolver.resolve(&Target::new("item", "oak_log")) {
//!     let cache = Arc::new(ContentCache::new("/tmp/wikilens")?);
//!     let excerpt = wikilens::ExcerptFetcher::new(cache).fetch_excerpt(&page);
//!     // open page.url; await excerpt for the preview
//! }
//! ```

pub mod cache;
pub mod config;
pub mod constants;
pub mod excerpt;
pub mod registry;
pub mod resolver;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Settings, SettingsLoader};

// Error Types
pub use types::error::{ExcerptError, FetchError, Result, WikiLensError};

// Registry
pub use registry::{
    LanguageDescriptor, LanguageRequest, Registry, TitleFormat, WikiFamily, WikiIndividual,
    best_match,
};

// Resolution
pub use resolver::{TargetResolver, WikiPage, detect_system_language};
pub use types::Target;

// Fetching
pub use cache::{ContentCache, FetchOutcome, ResultHandle, ResultSlot, result_channel};
pub use excerpt::{ExcerptFetcher, ExcerptOutcome, PageExcerpt, PageImage};
