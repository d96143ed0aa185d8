//! Caller-facing engine surface.
//!
//! One `ChatEngine` instance owns the active session, the multiplexer,
//! and the persistence adapter. There is no ambient global state: the
//! UI layer constructs an engine and passes it by reference.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use confab_backend::ModelBackend;
use confab_store::{ChatMode, ChatSession, Message, Role, SessionStore, Variant};
use uuid::Uuid;

use crate::aggregator;
use crate::attachments::{AttachmentPayload, encode_attachments};
use crate::errors::EngineError;
use crate::multiplexer::SessionMultiplexer;
use crate::profiles::{default_mode, greeting, normalize_mode};
use crate::summarizer::generate_title;

const DEFAULT_TITLE: &str = "New Session";
const ERROR_MARKER: &str = "\n\n*[System Error: Failed to complete response]*";

struct ActiveSession {
    id: String,
    title: String,
    messages: Vec<Message>,
    created_at: u64,
    mode: ChatMode,
    variant: Variant,
}

impl ActiveSession {
    fn fresh(variant: Variant) -> Self {
        let now = now_millis();
        let (greeting_id, greeting_content) = greeting(variant);
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: vec![Message::new(greeting_id, Role::Model, greeting_content, now)],
            created_at: now,
            mode: default_mode(variant),
            variant,
        }
    }

    fn has_user_turn(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::User)
    }
}

pub struct ChatEngine {
    backend: Arc<dyn ModelBackend>,
    store: SessionStore,
    multiplexer: SessionMultiplexer,
    active: ActiveSession,
    in_flight: Arc<AtomicBool>,
}

/// Clears the in-flight flag when the turn future completes or is
/// dropped mid-stream.
struct TurnGuard(Arc<AtomicBool>);

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ChatEngine {
    pub fn new(backend: Arc<dyn ModelBackend>, store: SessionStore) -> Self {
        Self {
            multiplexer: SessionMultiplexer::new(backend.clone()),
            backend,
            store,
            active: ActiveSession::fresh(Variant::default()),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.active.id
    }

    pub fn title(&self) -> &str {
        &self.active.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.active.messages
    }

    pub fn mode(&self) -> ChatMode {
        self.active.mode
    }

    pub fn variant(&self) -> Variant {
        self.active.variant
    }

    pub fn list_sessions(&self) -> Vec<ChatSession> {
        self.store.list_all()
    }

    /// Submits one user turn and streams the response into `on_chunk`
    /// as growing full text.
    ///
    /// Preconditions checked here so they never reach the aggregator:
    /// the turn must carry text or at least one attachment, and no
    /// other turn may currently hold this engine (`TurnInFlight`). The
    /// in-flight flag is released when a turn future completes or is
    /// dropped, so any message still marked streaming at entry was
    /// abandoned; it is finalized as failed before the new turn runs.
    /// On stream failure the in-progress message keeps its partial
    /// text, gains a visible error marker, and the error is returned;
    /// the session stays usable.
    pub async fn send_turn(
        &mut self,
        text: &str,
        attachments: Vec<AttachmentPayload>,
        variant: Variant,
        mode: ChatMode,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<(), EngineError> {
        let text = text.trim();
        if text.is_empty() && attachments.is_empty() {
            return Err(EngineError::EmptyTurn);
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(EngineError::TurnInFlight);
        }
        let _turn = TurnGuard(self.in_flight.clone());
        reconcile_abandoned(&mut self.active.messages);

        let mode = normalize_mode(variant, mode);
        self.active.variant = variant;
        self.active.mode = mode;

        let is_first_user_turn = !self.active.has_user_turn();
        let opening = if !text.is_empty() {
            text.to_string()
        } else {
            attachments
                .first()
                .map(|a| format!("Analyze {}", a.name))
                .unwrap_or_else(|| "New Chat".to_string())
        };

        let attachments = encode_attachments(attachments).await;

        let mut user_message =
            Message::new(Uuid::new_v4().to_string(), Role::User, text, self.next_timestamp());
        user_message.attachments = attachments.clone();
        self.active.messages.push(user_message);

        let model_message_id = Uuid::new_v4().to_string();
        let mut placeholder =
            Message::new(&model_message_id, Role::Model, "", self.next_timestamp());
        placeholder.is_streaming = true;
        self.active.messages.push(placeholder);
        self.persist_active();

        let mut latest = String::new();
        let result = aggregator::send_turn(
            &mut self.multiplexer,
            text,
            &attachments,
            variant,
            mode,
            |full| {
                latest.clear();
                latest.push_str(full);
                on_chunk(full);
            },
        )
        .await;

        if let Some(message) = self
            .active
            .messages
            .iter_mut()
            .find(|m| m.id == model_message_id)
        {
            message.content = latest;
            message.is_streaming = false;
            if result.is_err() {
                message.error = true;
                message.content.push_str(ERROR_MARKER);
            }
        }
        self.persist_active();

        // Title derivation is cosmetic and must not delay durability
        // of the turn itself, so it runs after the reply is finalized
        // and persisted.
        if is_first_user_turn {
            self.active.title = generate_title(self.backend.as_ref(), &opening).await;
            self.persist_active();
        }

        result.map(|_| ())
    }

    /// Starts a fresh session with the current variant's greeting.
    pub fn new_session(&mut self) {
        self.multiplexer.reset();
        self.active = ActiveSession::fresh(self.active.variant);
    }

    /// Loads a stored session and primes the multiplexer with its
    /// history so the next turn continues where the record left off.
    ///
    /// A record persisted mid-stream (crash, abandoned turn) carries a
    /// message still marked streaming; it is finalized as failed on
    /// load so the restored session accepts the next turn.
    pub async fn switch_session(&mut self, id: &str) -> Result<(), EngineError> {
        let mut record = self
            .store
            .get(id)
            .ok_or_else(|| EngineError::SessionNotFound(id.to_string()))?;
        let recovered = reconcile_abandoned(&mut record.messages);

        self.multiplexer.reset();
        let variant = record.variant;
        let mode = normalize_mode(variant, record.mode);
        self.multiplexer
            .resume(&record.messages, variant, mode)
            .await?;

        self.active = ActiveSession {
            id: record.id,
            title: record.title,
            messages: record.messages,
            created_at: record.created_at,
            mode,
            variant,
        };
        if recovered {
            self.persist_active();
        }
        Ok(())
    }

    /// Deletes a stored session. Deleting the active session behaves
    /// like `new_session`.
    pub fn delete_session(&mut self, id: &str) {
        self.store.delete(id);
        if id == self.active.id {
            self.new_session();
        }
    }

    /// Switches assistant persona. A variant change abandons the
    /// current conversation and starts fresh with the new variant's
    /// greeting and default mode, visible to the caller.
    pub fn set_variant(&mut self, variant: Variant) {
        if variant == self.active.variant {
            return;
        }
        self.multiplexer.reset();
        self.active = ActiveSession::fresh(variant);
    }

    /// A session is only persisted once it holds a real user turn;
    /// opening the app and reading the greeting creates no record.
    fn persist_active(&self) {
        if !self.active.has_user_turn() {
            return;
        }
        self.store.upsert(ChatSession {
            id: self.active.id.clone(),
            title: self.active.title.clone(),
            messages: self.active.messages.clone(),
            created_at: self.active.created_at,
            updated_at: now_millis(),
            mode: self.active.mode,
            variant: self.active.variant,
        });
    }

    fn next_timestamp(&self) -> u64 {
        let now = now_millis();
        self.active.messages.last().map_or(now, |m| now.max(m.timestamp))
    }
}

/// Finalizes messages left mid-stream by an interrupted turn, the same
/// way the live failure path would. Returns true if anything changed.
fn reconcile_abandoned(messages: &mut [Message]) -> bool {
    let mut recovered = false;
    for message in messages.iter_mut().filter(|m| m.is_streaming) {
        message.is_streaming = false;
        message.error = true;
        message.content.push_str(ERROR_MARKER);
        recovered = true;
    }
    recovered
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
