use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chat_relay::application::ports::{FragmentStream, InferenceEngine, InferenceError};
use chat_relay::domain::Message;

#[derive(Clone)]
enum ScriptedFailure {
    Engine(String),
    RequestFailed(String),
}

impl ScriptedFailure {
    fn to_error(&self) -> InferenceError {
        match self {
            ScriptedFailure::Engine(message) => InferenceError::Engine(message.clone()),
            ScriptedFailure::RequestFailed(detail) => InferenceError::RequestFailed(detail.clone()),
        }
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Inference engine that replays a fixed list of fragments and records what it was asked.
pub struct ScriptedEngine {
    fragments: Vec<String>,
    failure: Option<ScriptedFailure>,
    open_failure: Option<ScriptedFailure>,
    hang_after_fragments: bool,
    reachable: bool,
    calls: AtomicUsize,
    contexts: Mutex<Vec<Vec<Message>>>,
    models_requested: Mutex<Vec<String>>,
    upstream_dropped: Arc<AtomicBool>,
}

impl ScriptedEngine {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            failure: None,
            open_failure: None,
            hang_after_fragments: false,
            reachable: true,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
            models_requested: Mutex::new(Vec::new()),
            upstream_dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ends the stream with a structured engine error after the fragments.
    pub fn failing_with_engine_error(mut self, message: &str) -> Self {
        self.failure = Some(ScriptedFailure::Engine(message.to_string()));
        self
    }

    /// Ends the stream with a transport failure after the fragments.
    pub fn failing_with_transport_error(mut self, detail: &str) -> Self {
        self.failure = Some(ScriptedFailure::RequestFailed(detail.to_string()));
        self
    }

    /// Refuses to open the stream at all.
    pub fn failing_on_open_with_engine_error(mut self, message: &str) -> Self {
        self.open_failure = Some(ScriptedFailure::Engine(message.to_string()));
        self
    }

    /// Never finishes after the fragments, like a generation still in progress.
    pub fn hanging(mut self) -> Self {
        self.hang_after_fragments = true;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contexts(&self) -> Vec<Vec<Message>> {
        self.contexts.lock().unwrap().clone()
    }

    pub fn models_requested(&self) -> Vec<String> {
        self.models_requested.lock().unwrap().clone()
    }

    pub fn upstream_dropped(&self) -> bool {
        self.upstream_dropped.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InferenceEngine for ScriptedEngine {
    async fn chat_stream(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<FragmentStream, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push(messages.to_vec());
        self.models_requested.lock().unwrap().push(model.to_string());

        if let Some(failure) = &self.open_failure {
            return Err(failure.to_error());
        }

        let guard = DropFlag(Arc::clone(&self.upstream_dropped));
        let fragments = self.fragments.clone();
        let failure = self.failure.clone();
        let hang = self.hang_after_fragments;

        let stream = async_stream::stream! {
            let _guard = guard;
            for fragment in fragments {
                yield Ok(fragment);
            }
            if let Some(failure) = failure {
                yield Err(failure.to_error());
                return;
            }
            if hang {
                futures::future::pending::<()>().await;
            }
        };

        Ok(Box::pin(stream))
    }

    async fn list_models(&self) -> Result<Vec<String>, InferenceError> {
        if self.reachable {
            Ok(vec!["mistral".to_string(), "llama2".to_string()])
        } else {
            Err(InferenceError::RequestFailed("connection refused".to_string()))
        }
    }
}
