//! Scripted backend for engine integration tests.

use async_trait::async_trait;
use confab_backend::{
    BackendError, BackendSession, Fragment, FragmentStream, HistoryTurn, ModelBackend, Part,
    SessionSpec,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub type Script = Vec<Result<Fragment, BackendError>>;

pub fn fragments(texts: &[&str]) -> Script {
    texts.iter().map(|text| Ok(Fragment::text(*text))).collect()
}

/// Backend double: hands out sessions that replay queued scripts, and
/// records every session-creation spec and outbound turn's parts for
/// assertions.
pub struct ScriptedBackend {
    scripts: Arc<Mutex<VecDeque<Script>>>,
    sent_parts: Arc<Mutex<Vec<Vec<Part>>>>,
    created: AtomicUsize,
    specs: Mutex<Vec<SessionSpec>>,
    one_shot: Mutex<Result<String, BackendError>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scripts: Arc::new(Mutex::new(VecDeque::new())),
            sent_parts: Arc::new(Mutex::new(Vec::new())),
            created: AtomicUsize::new(0),
            specs: Mutex::new(Vec::new()),
            one_shot: Mutex::new(Ok("Scripted Title".to_string())),
        })
    }

    pub fn push_script(&self, script: Script) {
        self.scripts.lock().expect("scripts mutex").push_back(script);
    }

    pub fn set_one_shot(&self, reply: Result<String, BackendError>) {
        *self.one_shot.lock().expect("one-shot mutex") = reply;
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn last_spec(&self) -> Option<SessionSpec> {
        self.specs.lock().expect("specs mutex").last().cloned()
    }

    pub fn last_sent_parts(&self) -> Option<Vec<Part>> {
        self.sent_parts.lock().expect("sent parts mutex").last().cloned()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn create_session(
        &self,
        spec: SessionSpec,
    ) -> Result<Box<dyn BackendSession>, BackendError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let history = spec.history.clone();
        self.specs.lock().expect("specs mutex").push(spec);
        Ok(Box::new(ScriptedSession {
            scripts: self.scripts.clone(),
            sent_parts: self.sent_parts.clone(),
            history,
        }))
    }

    async fn generate_once(&self, _model: &str, _prompt: &str) -> Result<String, BackendError> {
        self.one_shot.lock().expect("one-shot mutex").clone()
    }
}

struct ScriptedSession {
    scripts: Arc<Mutex<VecDeque<Script>>>,
    sent_parts: Arc<Mutex<Vec<Vec<Part>>>>,
    history: Vec<HistoryTurn>,
}

#[async_trait]
impl BackendSession for ScriptedSession {
    async fn history(&self) -> Result<Vec<HistoryTurn>, BackendError> {
        Ok(self.history.clone())
    }

    async fn send_stream(&mut self, parts: Vec<Part>) -> Result<FragmentStream, BackendError> {
        self.sent_parts.lock().expect("sent parts mutex").push(parts);
        let script = self
            .scripts
            .lock()
            .expect("scripts mutex")
            .pop_front()
            .ok_or_else(|| BackendError::Rejected("no script queued".to_string()))?;
        Ok(Box::pin(futures::stream::iter(script)))
    }
}
