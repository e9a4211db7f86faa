use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error envelope shared by every endpoint.
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The payload could not be parsed or broke a field rule.
    #[error("invalid request: {}", .0.join("; "))]
    Validation(Vec<String>),
    /// Something failed server side; the message is safe to show callers.
    #[error("{0}")]
    Internal(&'static str),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![rejection.body_text()])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(details) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Invalid request".to_string(),
                    details,
                },
            ),
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: message.to_string(),
                    details: Vec::new(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
