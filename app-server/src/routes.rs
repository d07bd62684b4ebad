//! Request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use raglite_retrieval::AnswerError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::server::AppState;

/// Body of `/basic` and `/with-gpt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Successful answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub documents: usize,
    pub augmented: bool,
}

/// `POST /basic`: the best-matching document's text.
pub async fn basic(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = body?;
    debug!("basic query: {}", request.query);

    let answer = state.service.answer_direct(&request.query).await?;
    Ok(Json(MessageResponse {
        message: answer.message,
    }))
}

/// `POST /with-gpt`: a completion grounded in the best-matching document.
pub async fn with_gpt(
    State(state): State<AppState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.service.has_completion() {
        return Err(AnswerError::CompletionNotConfigured.into());
    }

    let Json(request) = body?;
    debug!("with-gpt query: {}", request.query);

    let answer = state.service.answer_augmented(&request.query).await?;
    Ok(Json(MessageResponse {
        message: answer.message,
    }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        documents: state.service.index().len(),
        augmented: state.service.has_completion(),
    })
}
