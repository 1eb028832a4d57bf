use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{Stream, StreamExt};
use tracing::Instrument;

use crate::application::ports::{InferenceEngine, InferenceError};
use crate::application::services::{RateLimiter, SessionStore};
use crate::domain::Message;

const SERVICE_ERROR_MESSAGE: &str = "Service error";

pub type RelayStream = Pin<Box<dyn Stream<Item = RelayEvent> + Send>>;

/// One event delivered to the chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Content { content: String, model: String },
    Error { error: String },
}

/// Rejections that happen before any stream is opened.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("too many requests")]
    RateLimited,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl RelayError {
    pub fn client_message(&self) -> String {
        match self {
            RelayError::RateLimited => "Too many requests".to_string(),
            RelayError::MalformedRequest(detail) => detail.clone(),
        }
    }
}

/// A failure after the stream has started, reported as an in-stream error event.
#[derive(Debug, thiserror::Error)]
pub enum StreamFailure {
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl StreamFailure {
    /// Text safe to show the client. Internal failures are never described.
    pub fn client_message(&self) -> String {
        match self {
            StreamFailure::Upstream(message) => message.clone(),
            StreamFailure::Internal(_) => SERVICE_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<InferenceError> for StreamFailure {
    fn from(error: InferenceError) -> Self {
        match error {
            InferenceError::Engine(message) => StreamFailure::Upstream(message),
            other => StreamFailure::Internal(other.to_string()),
        }
    }
}

pub struct RelayService<E>
where
    E: InferenceEngine,
{
    engine: Arc<E>,
    session_store: Arc<SessionStore>,
    rate_limiter: RateLimiter,
}

impl<E> RelayService<E>
where
    E: InferenceEngine + 'static,
{
    pub fn new(
        engine: Arc<E>,
        session_store: Arc<SessionStore>,
        rate_limit_window: Duration,
    ) -> Self {
        Self {
            engine,
            session_store,
            rate_limiter: RateLimiter::new(rate_limit_window),
        }
    }

    pub async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        self.engine.list_models().await
    }

    /// Accepts a user message and returns the stream of events answering it.
    ///
    /// Rate limiting and the user-message append happen before this returns; the
    /// upstream call is opened on the first poll of the returned stream. The
    /// assistant reply is recorded only if the upstream finishes cleanly, so
    /// dropping the stream early leaves the transcript ending with the user turn.
    ///
    /// The stream is polled after the caller's span has closed, so its work and
    /// logs are re-attached to the `submit` span.
    #[tracing::instrument(
        skip(self, message, model),
        fields(model = %model, message_chars = message.chars().count())
    )]
    pub async fn submit(&self, message: String, model: String) -> Result<RelayStream, RelayError> {
        if !self.rate_limiter.try_acquire().await {
            tracing::warn!(
                window_ms = self.rate_limiter.window().as_millis() as u64,
                "Chat request rejected by rate limiter"
            );
            return Err(RelayError::RateLimited);
        }

        let (epoch, context) = self.session_store.begin_turn(Message::user(message)).await;
        tracing::debug!(context_messages = context.len(), "User message appended");

        let engine = Arc::clone(&self.engine);
        let session_store = Arc::clone(&self.session_store);
        let span = tracing::Span::current();

        let events = async_stream::stream! {
            let opened = engine
                .chat_stream(&model, &context)
                .instrument(span.clone())
                .await;
            let mut fragments = match opened {
                Ok(fragments) => fragments,
                Err(e) => {
                    yield span.in_scope(|| failure_event(e.into()));
                    return;
                }
            };

            let mut reply = String::new();
            let mut fragment_count = 0usize;

            while let Some(result) = fragments.next().instrument(span.clone()).await {
                match result {
                    Ok(fragment) => {
                        if fragment.is_empty() {
                            continue;
                        }
                        fragment_count += 1;
                        reply.push_str(&fragment);
                        yield RelayEvent::Content {
                            content: fragment,
                            model: model.clone(),
                        };
                    }
                    Err(e) => {
                        yield span.in_scope(|| failure_event(e.into()));
                        return;
                    }
                }
            }
            drop(fragments);

            let reply_chars = reply.chars().count();
            let assistant = Message::assistant(reply, model.clone());
            let recorded = session_store.append_if_current(epoch, assistant).await;
            span.in_scope(|| {
                if recorded {
                    tracing::info!(fragment_count, reply_chars, "Assistant reply recorded");
                } else {
                    tracing::warn!(
                        fragment_count,
                        "Conversation was reset during generation; reply discarded"
                    );
                }
            });
        };

        Ok(Box::pin(events))
    }
}

fn failure_event(failure: StreamFailure) -> RelayEvent {
    match &failure {
        StreamFailure::Upstream(message) => {
            tracing::error!(error = %message, "Inference engine reported an error")
        }
        other => tracing::error!(error = %other, "Chat stream failed"),
    }

    RelayEvent::Error {
        error: failure.client_message(),
    }
}
