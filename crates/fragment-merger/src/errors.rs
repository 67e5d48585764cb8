use std::fmt;

use thiserror::Error;

/// Which fragment a write was aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    Bidder(String),
    Impression(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Bidder(name) => write!(f, "bidder:{name}"),
            Scope::Impression(slot) => write!(f, "imp:{slot}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("malformed {scope} fragment: expected object at `{path}`, found {found}")]
    MalformedTarget {
        scope: Scope,
        path: String,
        found: &'static str,
    },
    #[error("failed to encode stretch payload: {0}")]
    Encode(#[from] serde_json::Error),
}
