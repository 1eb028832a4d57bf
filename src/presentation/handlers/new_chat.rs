use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::ports::InferenceEngine;
use crate::presentation::state::AppState;

use super::api_types::NewChatResponse;

#[tracing::instrument(skip(state))]
pub async fn new_chat_handler<E>(State(state): State<AppState<E>>) -> impl IntoResponse
where
    E: InferenceEngine + 'static,
{
    if state.session_store.start_new_conversation().await {
        tracing::info!("Conversation archived");
    } else {
        tracing::debug!("Transcript already empty; nothing archived");
    }

    (
        StatusCode::OK,
        Json(NewChatResponse {
            status: "new chat started".to_string(),
        }),
    )
}
