//! Mapping of request failures to JSON error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use raglite_retrieval::AnswerError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A failed request.
#[derive(Debug)]
pub enum ApiError {
    /// Answering failed.
    Answer(AnswerError),

    /// The body was not `{ "query": string }`.
    InvalidBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Answer(AnswerError::CompletionNotConfigured) => StatusCode::BAD_REQUEST,
            Self::Answer(AnswerError::NoMatch) => StatusCode::NOT_FOUND,
            Self::Answer(AnswerError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            Self::Answer(AnswerError::Embedding(_) | AnswerError::Completion(_))
            | Self::InvalidBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Answer(err) => err.to_string(),
            Self::InvalidBody(message) => format!("invalid request body: {message}"),
        }
    }
}

impl From<AnswerError> for ApiError {
    fn from(err: AnswerError) -> Self {
        Self::Answer(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!("Request failed ({status}): {message}");
        } else {
            warn!("Request rejected ({status}): {message}");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
