use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value persistence capability.
///
/// Synchronous by contract: the engine treats persistence as a local,
/// best-effort concern and never awaits it. Implementations may throw
/// on quota or corruption; `SessionStore` catches and degrades.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    fn remove(&self, key: &str) -> StoreResult<()>;
}
