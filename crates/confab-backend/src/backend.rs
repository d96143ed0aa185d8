//! Backend capability contract.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::BackendError;
use crate::types::{HistoryTurn, Part, SessionSpec};

/// One increment of a streamed response.
///
/// A fragment may carry no text at all (the backend batches metadata
/// into the same stream); consumers skip those.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub text: Option<String>,
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

pub type FragmentStream = BoxStream<'static, Result<Fragment, BackendError>>;

/// A live, stateful conversation held open by the backend.
///
/// Handles are created per configuration and are not reusable across
/// configurations; the engine discards and recreates them instead.
#[async_trait]
pub trait BackendSession: Send + Sync {
    /// Returns the turn history the backend has confirmed so far.
    async fn history(&self) -> Result<Vec<HistoryTurn>, BackendError>;

    /// Sends one user turn and returns the incremental response stream.
    async fn send_stream(&mut self, parts: Vec<Part>) -> Result<FragmentStream, BackendError>;
}

/// The remote model service.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn create_session(
        &self,
        spec: SessionSpec,
    ) -> Result<Box<dyn BackendSession>, BackendError>;

    /// One-shot generation with no session involvement.
    async fn generate_once(&self, model: &str, prompt: &str) -> Result<String, BackendError>;
}
