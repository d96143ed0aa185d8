use thiserror::Error;

/// Failures surfaced by a model backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend rejected request: {0}")]
    Rejected(String),

    #[error("malformed stream payload: {0}")]
    MalformedStream(String),
}
