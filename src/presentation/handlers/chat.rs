use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::stream::StreamExt;

use crate::application::ports::InferenceEngine;
use crate::application::services::RelayError;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::api_types::{ChatEvent, ChatRequest};

/// The body is parsed by hand rather than through `Json` so that every
/// malformed payload maps to 400, whatever its content type. Only a JSON
/// object is accepted; serde would otherwise also take the array form.
fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, RelayError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| RelayError::MalformedRequest("Invalid JSON".to_string()))?;

    if !value.is_object() {
        return Err(RelayError::MalformedRequest(
            "Invalid request: expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| RelayError::MalformedRequest(format!("Invalid request: {}", e)))
}

#[tracing::instrument(skip(state, body), fields(body_bytes = body.len()))]
pub async fn chat_handler<E>(State(state): State<AppState<E>>, body: Bytes) -> Response
where
    E: InferenceEngine + 'static,
{
    let request = match parse_chat_request(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed chat request");
            return e.into_response();
        }
    };

    let model = request
        .model
        .unwrap_or_else(|| state.settings.inference.default_model.clone());

    tracing::debug!(
        prompt = %sanitize_prompt(&request.message),
        model = %model,
        "Processing chat message"
    );

    let events = match state.relay_service.submit(request.message, model).await {
        Ok(events) => events,
        Err(e) => return e.into_response(),
    };

    let sse_stream = events.filter_map(|event| async move {
        match serde_json::to_string(&ChatEvent::from(event)) {
            Ok(json) => Some(Ok::<_, Infallible>(Event::default().data(json))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize chat event");
                None
            }
        }
    });

    Sse::new(sse_stream)
        .keep_alive(
            KeepAlive::new()
                .interval(state.settings.relay.sse_keep_alive())
                .text("keep-alive"),
        )
        .into_response()
}
