use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Message;

/// A finished conversation, frozen at the moment it was archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationRecord {
    pub timestamp: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl ConversationRecord {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            timestamp: Utc::now(),
            messages,
        }
    }
}
