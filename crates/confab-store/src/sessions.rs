use crate::kv::KeyValueStore;
use crate::types::ChatSession;
use std::sync::Arc;
use tracing::warn;

const STORAGE_KEY: &str = "confab_chat_sessions";

/// Durable mapping from session id to session record.
///
/// Every operation is total: a corrupt or unreadable store reads as an
/// empty collection and write failures are logged and swallowed, so
/// conversation flow never depends on persistence succeeding.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    storage_key: String,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            storage_key: STORAGE_KEY.to_string(),
        }
    }

    pub fn with_storage_key(kv: Arc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        Self {
            kv,
            storage_key: storage_key.into(),
        }
    }

    /// All stored sessions, most recently updated first.
    pub fn list_all(&self) -> Vec<ChatSession> {
        let raw = match self.kv.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read session store, treating as empty");
                return Vec::new();
            }
        };

        let mut sessions = match serde_json::from_str::<Vec<ChatSession>>(&raw) {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!(error = %err, "session store is corrupt, treating as empty");
                return Vec::new();
            }
        };

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions
    }

    pub fn get(&self, id: &str) -> Option<ChatSession> {
        self.list_all().into_iter().find(|session| session.id == id)
    }

    /// Overwrites the record with a matching id, appends otherwise.
    pub fn upsert(&self, session: ChatSession) {
        let mut sessions = self.list_all();
        match sessions.iter_mut().find(|existing| existing.id == session.id) {
            Some(existing) => *existing = session,
            None => sessions.push(session),
        }
        self.write(&sessions);
    }

    pub fn delete(&self, id: &str) {
        let sessions: Vec<ChatSession> = self
            .list_all()
            .into_iter()
            .filter(|session| session.id != id)
            .collect();
        self.write(&sessions);
    }

    pub fn clear_all(&self) {
        if let Err(err) = self.kv.remove(&self.storage_key) {
            warn!(error = %err, "failed to clear session store");
        }
    }

    fn write(&self, sessions: &[ChatSession]) {
        let raw = match serde_json::to_string(sessions) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to serialize session records");
                return;
            }
        };
        if let Err(err) = self.kv.set(&self.storage_key, &raw) {
            warn!(error = %err, "failed to write session store");
        }
    }
}
