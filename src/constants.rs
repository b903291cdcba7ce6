//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// HTTP client constants
pub mod http {
    /// Fixed identifying User-Agent sent with every request
    pub const USER_AGENT: &str = "wikilens (+https://github.com/wikilens/wikilens)";

    /// Per-request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 30;
}

/// Content cache constants
pub mod cache {
    /// Directory name under the platform cache root
    pub const DIR_NAME: &str = "content";
}

/// Excerpt fetching constants
pub mod excerpt {
    /// Maximum characters requested from the TextExtracts API
    pub const MAX_CHARS: u32 = 525;

    /// Requested thumbnail width (pixels)
    pub const THUMBNAIL_SIZE: u32 = 640;
}

/// Language resolution constants
pub mod language {
    /// Sentinel tag meaning "follow the system display language"
    pub const AUTO: &str = "auto";

    /// Fallback system language when none can be detected
    pub const FALLBACK_SYSTEM: &str = "en";
}
