//! Model-backend capability consumed by the confab engine.
//!
//! The real transport (HTTP client, SSE decoding) lives outside this
//! workspace; this crate defines the contract the engine programs
//! against plus the wire-neutral turn and part types.

pub mod backend;
pub mod errors;
pub mod types;

pub use backend::{BackendSession, Fragment, FragmentStream, ModelBackend};
pub use errors::BackendError;
pub use types::{HistoryTurn, Part, SessionSpec, ToolSpec, TurnRole};
