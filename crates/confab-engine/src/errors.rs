use confab_backend::BackendError;
use thiserror::Error;

/// Top-level error type for the confab-engine crate.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a turn is already in flight for this session")]
    TurnInFlight,

    #[error("turn has no text or attachments")]
    EmptyTurn,

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
