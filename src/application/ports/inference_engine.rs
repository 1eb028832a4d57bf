use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

use crate::domain::Message;

/// Lazily produced completion fragments. Dropping the stream releases the upstream call.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, InferenceError>> + Send>>;

#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Opens a streaming chat completion over the whole conversation so far.
    async fn chat_stream(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<FragmentStream, InferenceError>;

    async fn list_models(&self) -> Result<Vec<String>, InferenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The engine itself reported a failure, e.g. an unknown model.
    #[error("engine error: {0}")]
    Engine(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
