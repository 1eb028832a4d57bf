use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::application::ports::{FragmentStream, InferenceEngine, InferenceError};
use crate::domain::{Message, MessageRole};

pub const ECHO_MODEL: &str = "echo";

/// Offline engine that streams the latest user message back, one word per fragment.
pub struct EchoInferenceEngine {
    word_delay: Duration,
}

impl EchoInferenceEngine {
    pub fn new(word_delay: Duration) -> Self {
        Self { word_delay }
    }
}

#[async_trait]
impl InferenceEngine for EchoInferenceEngine {
    async fn chat_stream(
        &self,
        _model: &str,
        messages: &[Message],
    ) -> Result<FragmentStream, InferenceError> {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let words: Vec<String> = format!("Echo: {}", prompt)
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                if i == 0 {
                    word.to_string()
                } else {
                    format!(" {}", word)
                }
            })
            .collect();

        let delay = self.word_delay;
        let fragments = stream::iter(words).then(move |word| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok::<_, InferenceError>(word)
        });

        Ok(Box::pin(fragments))
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        Ok(vec![ECHO_MODEL.to_string()])
    }
}
