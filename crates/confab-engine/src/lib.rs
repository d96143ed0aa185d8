//! Conversational session engine for a streaming chat client.
//!
//! Owns the stateful dialogue with a remote model backend: resolves
//! which backend configuration applies to each turn, reconciles
//! history when configuration changes mid-conversation, aggregates
//! incremental output for the caller's sink, and persists session
//! records through `confab-store`.

pub mod aggregator;
pub mod attachments;
pub mod codec;
pub mod engine;
pub mod errors;
pub mod multiplexer;
pub mod profiles;
pub mod summarizer;

pub use aggregator::send_turn;
pub use attachments::{AttachmentPayload, encode_attachments};
pub use codec::encode_history;
pub use engine::ChatEngine;
pub use errors::EngineError;
pub use multiplexer::SessionMultiplexer;
pub use profiles::{InvocationProfile, default_mode, normalize_mode, resolve};
pub use summarizer::generate_title;
