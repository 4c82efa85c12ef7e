//! Resource identifiers (`namespace:path`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully-qualified resource identifier.
///
/// User input may omit the namespace (`oak_log` instead of
/// `minecraft:oak_log`); parsing fills in a configured default. Splitting is
/// on the first `:` only, so a path may itself contain colons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    namespace: String,
    path: String,
}

impl ResourceId {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Parse raw user text, defaulting the namespace when omitted.
    pub fn parse(raw: &str, default_namespace: &str) -> Self {
        match raw.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(default_namespace, raw),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}
