//! Shared Types
//!
//! Error taxonomy and the value types that cross module boundaries.

pub mod error;
pub mod target;

pub use error::{ExcerptError, FetchError, Result, WikiLensError};
pub use target::Target;
