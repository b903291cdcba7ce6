//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Taxonomy
//!
//! - **Config**: malformed or contradictory registry/settings data.
//!   Fatal at load time, surfaced to the operator, never recoverable at
//!   runtime.
//! - **Fetch**: network or disk failure while filling the content cache.
//!   Recoverable; delivered to every waiter for the failed digest, and the
//!   cache is left empty so a later call retries.
//! - **Excerpt parse**: the wiki API answered with an unexpected shape.
//!   Downgraded to "no excerpt available" by callers; the resolved page URL
//!   stays usable.
//!
//! A resolution miss (no family claims a namespace) is *not* an error; it is
//! expressed as `Option::None` at the resolver layer.

use thiserror::Error;

// =============================================================================
// Fetch Error
// =============================================================================

/// Failure while filling a cache entry.
///
/// `Clone` on purpose: a single failed fetch is fanned out to every handle
/// waiting on the same digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Connection, DNS, timeout, or body-read failure.
    #[error("network error: {0}")]
    Network(String),

    /// Reading or persisting the on-disk cache entry failed.
    #[error("disk error: {0}")]
    Disk(String),

    /// The fetch task was dropped before producing a result.
    #[error("fetch abandoned before completion")]
    Abandoned,
}

// =============================================================================
// Excerpt Error
// =============================================================================

/// Failure while producing a page excerpt.
///
/// Callers treat `Parse` as "no excerpt available" rather than fatal: the
/// article URL that produced the request remains perfectly usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExcerptError {
    /// The underlying byte fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The API response did not match the expected shape.
    #[error("unexpected API response: {0}")]
    Parse(String),
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum WikiLensError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// Malformed registry or settings data. Fatal at load.
    #[error("Config error: {0}")]
    Config(String),

    /// Recoverable cache-fill failure.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Recoverable excerpt failure.
    #[error("Excerpt error: {0}")]
    Excerpt(#[from] ExcerptError),
}

impl WikiLensError {
    /// Create a config error from any displayable cause
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error is recoverable (a repeated call may succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Excerpt(_))
    }
}

pub type Result<T> = std::result::Result<T, WikiLensError>;

// =============================================================================
// Tests
// =============================================================================
