use serde::{Deserialize, Serialize};

/// The two speakers in a conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

/// Requested capability profile for a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    #[default]
    Standard,
    Search,
    Thinking,
}

/// Which assistant persona is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Primary,
    Unified,
}

/// A file attached to a user message, payload carried as base64 text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
    pub data: String,
}

/// One rendered turn in a conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch, monotonically non-decreasing
    /// across a session's message list.
    pub timestamp: u64,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// True only while a model message is actively being filled.
    #[serde(default)]
    pub is_streaming: bool,
    /// True if the stream for this message terminated abnormally.
    #[serde(default)]
    pub error: bool,
}

impl Message {
    pub fn new(id: impl Into<String>, role: Role, content: impl Into<String>, timestamp: u64) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp,
            attachments: Vec::new(),
            is_streaming: false,
            error: false,
        }
    }
}

/// Persisted session record. Identity is `id`; the store overwrites on
/// a matching id and appends otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: u64,
    pub updated_at: u64,
    pub mode: ChatMode,
    #[serde(default)]
    pub variant: Variant,
}
