use serde::{Deserialize, Deserializer, Serialize};

use crate::application::services::{RelayEvent, SessionSnapshot};
use crate::domain::{ConversationRecord, Message};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// May be omitted, but an explicit `null` is rejected.
    #[serde(default, deserialize_with = "present_string")]
    pub model: Option<String>,
}

fn present_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

/// Payload of one SSE `data:` line on `/chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChatEvent {
    Content { content: String, model: String },
    Error { error: String },
}

impl From<RelayEvent> for ChatEvent {
    fn from(event: RelayEvent) -> Self {
        match event {
            RelayEvent::Content { content, model } => ChatEvent::Content { content, model },
            RelayEvent::Error { error } => ChatEvent::Error { error },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewChatResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub current: Vec<Message>,
    pub conversations: Vec<ConversationRecord>,
}

impl From<SessionSnapshot> for HistoryResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            current: snapshot.current,
            conversations: snapshot.conversations,
        }
    }
}
