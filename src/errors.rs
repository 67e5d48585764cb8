use fragment_merger::MergeError;
use thiserror::Error;

/// Errors surfaced by the module facade and the page host.
#[derive(Debug, Error)]
pub enum RtdError {
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("invalid page fixture: {0}")]
    Fixture(String),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
