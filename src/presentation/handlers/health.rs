use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::ports::InferenceEngine;
use crate::presentation::state::AppState;

use super::api_types::{ErrorResponse, HealthResponse};

pub async fn health_handler<E>(State(state): State<AppState<E>>) -> Response
where
    E: InferenceEngine + 'static,
{
    match state.relay_service.list_models().await {
        Ok(models) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                models,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Inference engine is unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    detail: "Inference engine unavailable".to_string(),
                }),
            )
                .into_response()
        }
    }
}
