use serde::{Deserialize, Serialize};

/// One piece of a turn sent to or replayed from the backend.
///
/// Binary content travels as base64 text, matching how the engine
/// stores attachments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text { text: String },
    InlineData { data: String, mime_type: String },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn inline_data(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::InlineData {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Model,
}

/// One request/response unit in the backend's history representation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: TurnRole,
    pub parts: Vec<Part>,
}

impl HistoryTurn {
    pub fn new(role: TurnRole, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }
}

/// Optional capability granted to a backend session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSpec {
    WebSearch,
}

/// Everything needed to create one stateful backend conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSpec {
    pub model: String,
    pub history: Vec<HistoryTurn>,
    pub system_instruction: String,
    pub tools: Vec<ToolSpec>,
    pub thinking_budget: Option<u32>,
    pub temperature: Option<f32>,
}
