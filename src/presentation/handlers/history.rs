use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::ports::InferenceEngine;
use crate::presentation::state::AppState;

use super::api_types::HistoryResponse;

pub async fn history_handler<E>(State(state): State<AppState<E>>) -> impl IntoResponse
where
    E: InferenceEngine + 'static,
{
    let snapshot = state.session_store.snapshot().await;
    (StatusCode::OK, Json(HistoryResponse::from(snapshot)))
}
