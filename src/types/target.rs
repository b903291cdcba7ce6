//! Lookup Target
//!
//! The `(namespace, identifier)` pair handed to us by an external
//! collaborator (in-game raycasting, a command argument, a REPL). This core
//! never inspects game state itself; the pair is all that crosses the
//! boundary.

use serde::{Deserialize, Serialize};

/// An object to look up: a namespace (e.g. `item`, `block`) plus an
/// identifier within that namespace (e.g. `oak_log`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub namespace: String,
    pub identifier: String,
}

impl Target {
    pub fn new(namespace: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.identifier)
    }
}
