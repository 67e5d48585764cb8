use stretch_core_types::ElementRef;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutReadError {
    #[error("element {0} is not known to the layout")]
    UnknownElement(ElementRef),
    #[error("malformed layout data: {0}")]
    Malformed(String),
    #[error("host layout error: {0}")]
    Host(String),
}

impl LayoutReadError {
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
