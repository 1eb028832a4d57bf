use tokio::sync::Mutex;

use crate::domain::{ConversationRecord, Message};

/// Identifies the conversation a chat turn was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationEpoch(u64);

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub current: Vec<Message>,
    pub conversations: Vec<ConversationRecord>,
}

#[derive(Debug, Default)]
struct SessionState {
    transcript: Vec<Message>,
    archive: Vec<ConversationRecord>,
    epoch: u64,
}

/// In-memory transcript and archive for the single chat session this process serves.
///
/// Every read and write goes through one mutex, so a reset is never observed
/// half-done and an archived record never shares storage with the live transcript.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, message: Message) {
        self.state.lock().await.transcript.push(message);
    }

    /// Appends the opening message of a turn and returns the context the
    /// inference engine should see, together with the current conversation epoch.
    pub async fn begin_turn(&self, message: Message) -> (ConversationEpoch, Vec<Message>) {
        let mut state = self.state.lock().await;
        state.transcript.push(message);
        (ConversationEpoch(state.epoch), state.transcript.clone())
    }

    /// Appends `message` only if no new conversation was started since `epoch`.
    pub async fn append_if_current(&self, epoch: ConversationEpoch, message: Message) -> bool {
        let mut state = self.state.lock().await;
        if state.epoch != epoch.0 {
            return false;
        }
        state.transcript.push(message);
        true
    }

    /// Archives the current transcript and resets it. Returns `false` when
    /// there was nothing to archive.
    pub async fn start_new_conversation(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.transcript.is_empty() {
            return false;
        }

        let messages = std::mem::take(&mut state.transcript);
        state.archive.push(ConversationRecord::new(messages));
        state.epoch += 1;
        true
    }

    pub async fn transcript(&self) -> Vec<Message> {
        self.state.lock().await.transcript.clone()
    }

    pub async fn archive(&self) -> Vec<ConversationRecord> {
        self.state.lock().await.archive.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            current: state.transcript.clone(),
            conversations: state.archive.clone(),
        }
    }
}
