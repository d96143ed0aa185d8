//! Session records and local persistence for the confab engine.
//!
//! The underlying storage is a plain key-value capability (the kind a
//! browser or desktop shell provides); everything above it degrades
//! gracefully when that store is corrupt or unwritable.

pub mod fs;
pub mod kv;
pub mod memory;
pub mod sessions;
pub mod types;

pub use fs::FileKeyValueStore;
pub use kv::{KeyValueStore, StoreError, StoreResult};
pub use memory::MemoryKeyValueStore;
pub use sessions::SessionStore;
pub use types::{Attachment, ChatMode, ChatSession, Message, Role, Variant};
