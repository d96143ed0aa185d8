//! Ownership of the single live backend session.
//!
//! The multiplexer is the only component that holds or touches a
//! `BackendSession` handle. It keeps at most one alive, tagged with
//! the profile that produced it, and replaces it when a request
//! resolves to a different profile.

use std::sync::Arc;

use confab_backend::{BackendSession, HistoryTurn, ModelBackend};
use confab_store::{ChatMode, Message, Variant};
use tracing::warn;

use crate::codec::encode_history;
use crate::errors::EngineError;
use crate::profiles::{InvocationProfile, resolve};

struct LiveSession {
    handle: Box<dyn BackendSession>,
    profile: InvocationProfile,
}

pub struct SessionMultiplexer {
    backend: Arc<dyn ModelBackend>,
    live: Option<LiveSession>,
}

impl SessionMultiplexer {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            backend,
            live: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Discards the live handle, if any. New chat, session switch, and
    /// deletion of the current session all come through here.
    pub fn reset(&mut self) {
        self.live = None;
    }

    /// Creates a fresh handle seeded with a stored session's history,
    /// replacing whatever was live.
    pub async fn resume(
        &mut self,
        messages: &[Message],
        variant: Variant,
        mode: ChatMode,
    ) -> Result<(), EngineError> {
        let profile = resolve(variant, mode);
        self.create(profile, encode_history(messages)).await
    }

    /// Returns a handle matching the requested configuration.
    ///
    /// Reuses the live handle when its profile already matches (the
    /// common case: consecutive turns in the same mode). Otherwise the
    /// live handle's confirmed history is carried into a replacement
    /// handle; if the backend cannot produce that history the new
    /// handle starts empty rather than failing the turn.
    pub async fn session_for(
        &mut self,
        variant: Variant,
        mode: ChatMode,
    ) -> Result<&mut dyn BackendSession, EngineError> {
        let profile = resolve(variant, mode);
        let reusable = self
            .live
            .as_ref()
            .is_some_and(|live| live.profile == profile);

        if !reusable {
            let history = match &self.live {
                Some(live) => match live.handle.history().await {
                    Ok(history) => history,
                    Err(err) => {
                        warn!(error = %err, "history fetch failed during reconfiguration, continuing with empty history");
                        Vec::new()
                    }
                },
                None => Vec::new(),
            };
            self.create(profile, history).await?;
        }

        let live = self
            .live
            .as_mut()
            .expect("live session present after creation");
        Ok(live.handle.as_mut())
    }

    async fn create(
        &mut self,
        profile: InvocationProfile,
        history: Vec<HistoryTurn>,
    ) -> Result<(), EngineError> {
        // Drop the old handle before creating its replacement so a
        // creation failure leaves the multiplexer empty, not stale.
        self.live = None;
        let spec = profile.to_session_spec(history);
        let handle = self.backend.create_session(spec).await?;
        self.live = Some(LiveSession { handle, profile });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use confab_backend::{BackendError, Fragment, FragmentStream, Part, SessionSpec, TurnRole};
    use confab_store::Role;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingBackend {
        created: AtomicUsize,
        specs: Mutex<Vec<SessionSpec>>,
        fail_history: bool,
    }

    impl CountingBackend {
        fn new(fail_history: bool) -> Arc<Self> {
            Arc::new(Self {
                created: AtomicUsize::new(0),
                specs: Mutex::new(Vec::new()),
                fail_history,
            })
        }

        fn created(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }

        fn last_spec(&self) -> SessionSpec {
            self.specs
                .lock()
                .expect("specs mutex")
                .last()
                .cloned()
                .expect("at least one session created")
        }
    }

    #[async_trait]
    impl ModelBackend for CountingBackend {
        async fn create_session(
            &self,
            spec: SessionSpec,
        ) -> Result<Box<dyn BackendSession>, BackendError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            let history = spec.history.clone();
            self.specs.lock().expect("specs mutex").push(spec);
            Ok(Box::new(FixedSession {
                history,
                fail_history: self.fail_history,
            }))
        }

        async fn generate_once(&self, _model: &str, _prompt: &str) -> Result<String, BackendError> {
            Ok(String::new())
        }
    }

    struct FixedSession {
        history: Vec<HistoryTurn>,
        fail_history: bool,
    }

    #[async_trait]
    impl BackendSession for FixedSession {
        async fn history(&self) -> Result<Vec<HistoryTurn>, BackendError> {
            if self.fail_history {
                return Err(BackendError::Transport("history unavailable".to_string()));
            }
            Ok(self.history.clone())
        }

        async fn send_stream(&mut self, _parts: Vec<Part>) -> Result<FragmentStream, BackendError> {
            Ok(Box::pin(futures::stream::iter(vec![Ok(Fragment::text(
                "ok",
            ))])))
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn matching_profile_reuses_the_live_handle() {
        let backend = CountingBackend::new(false);
        let mut mux = SessionMultiplexer::new(backend.clone());

        mux.session_for(Variant::Primary, ChatMode::Standard)
            .await
            .expect("first request should create a session");
        mux.session_for(Variant::Primary, ChatMode::Standard)
            .await
            .expect("second request should reuse");

        assert_eq!(backend.created(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn profile_change_creates_exactly_one_replacement_seeded_with_history() {
        let backend = CountingBackend::new(false);
        let mut mux = SessionMultiplexer::new(backend.clone());

        let seed = vec![Message::new("m1", Role::User, "hello", 1)];
        mux.resume(&seed, Variant::Primary, ChatMode::Standard)
            .await
            .expect("resume should create a session");

        mux.session_for(Variant::Primary, ChatMode::Search)
            .await
            .expect("reconfiguration should succeed");

        assert_eq!(backend.created(), 2);
        let spec = backend.last_spec();
        assert_eq!(spec.history.len(), 1);
        assert_eq!(spec.history[0].role, TurnRole::User);
        assert_eq!(spec.history[0].parts, vec![Part::text("hello")]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn history_fetch_failure_degrades_to_empty_history() {
        let backend = CountingBackend::new(true);
        let mut mux = SessionMultiplexer::new(backend.clone());

        let seed = vec![Message::new("m1", Role::User, "hello", 1)];
        mux.resume(&seed, Variant::Primary, ChatMode::Standard)
            .await
            .expect("resume should create a session");

        mux.session_for(Variant::Unified, ChatMode::Standard)
            .await
            .expect("reconfiguration should still succeed");

        assert_eq!(backend.created(), 2);
        assert!(backend.last_spec().history.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reset_discards_the_handle_and_next_request_recreates() {
        let backend = CountingBackend::new(false);
        let mut mux = SessionMultiplexer::new(backend.clone());

        mux.session_for(Variant::Primary, ChatMode::Standard)
            .await
            .expect("first request should create a session");
        assert!(mux.is_live());

        mux.reset();
        assert!(!mux.is_live());

        mux.session_for(Variant::Primary, ChatMode::Standard)
            .await
            .expect("request after reset should recreate");
        assert_eq!(backend.created(), 2);
    }
}
