use crate::{
    api::error::{ApiError, ErrorBody},
    suggestions::{
        Outcome, SuggestionRequest, SuggestionResponse, SuggestionService, NOT_CONFIGURED_ADVISORY,
    },
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use tracing::{error, instrument};

#[utoipa::path(
    post,
    path= "/api/ai/suggest",
    request_body = SuggestionRequest,
    responses (
        (status = 200, description = "Upstream suggestions", body = SuggestionResponse),
        (status = 400, description = "Malformed or incomplete payload", body = ErrorBody),
        (status = 500, description = "Upstream provider failed", body = ErrorBody),
        (status = 503, description = "AI provider is not configured", body = SuggestionResponse),
    ),
    tag = "ai",
)]
#[instrument(skip_all)]
pub async fn suggest(
    Extension(service): Extension<SuggestionService>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SuggestionResponse>), ApiError> {
    let Json(request) = payload?;

    let violations = request.violations();
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    match service.suggest(&request).await {
        Ok(Outcome::Suggested(response)) => Ok((StatusCode::OK, Json(response))),
        Ok(Outcome::NotConfigured) => Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(SuggestionResponse {
                suggestions: NOT_CONFIGURED_ADVISORY.to_string(),
                tokens_used: None,
            }),
        )),
        Err(e) => {
            error!("AI suggestion error: {}", e);
            Err(ApiError::Internal("Failed to generate suggestions"))
        }
    }
}
