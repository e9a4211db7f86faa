//! Code-suggestion contract: request validation, prompt shaping and the
//! optional upstream call.

use crate::upstream::{ChatCompletions, ChatMessage, ChatRequest, UpstreamError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

pub const MAX_SUGGESTION_TOKENS: u32 = 500;
pub const NOT_CONFIGURED_ADVISORY: &str = "AI service not configured. Please add OPENAI_API_KEY.";
const SYSTEM_PROMPT: &str = "You are an expert code reviewer for TechyPark Engine.";

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct SuggestionRequest {
    pub code: String,
    pub language: String,
    pub context: Option<String>,
}

impl SuggestionRequest {
    /// Returns one message per violated field; empty when the request is usable.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.code.is_empty() {
            violations.push("code: must not be empty".to_string());
        }
        if self.language.is_empty() {
            violations.push("language: must not be empty".to_string());
        }
        violations
    }

    fn to_chat(&self) -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "Analyze this {} code: {}",
                    self.language, self.code
                )),
            ],
            max_tokens: MAX_SUGGESTION_TOKENS,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SuggestionResponse {
    pub suggestions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Suggested(SuggestionResponse),
    NotConfigured,
}

/// Holds the (optional) shared upstream client.
#[derive(Clone, Default)]
pub struct SuggestionService {
    upstream: Option<Arc<dyn ChatCompletions>>,
}

impl SuggestionService {
    #[must_use]
    pub fn new(upstream: Arc<dyn ChatCompletions>) -> Self {
        Self {
            upstream: Some(upstream),
        }
    }

    #[must_use]
    pub fn unconfigured() -> Self {
        Self { upstream: None }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.upstream.is_some()
    }

    /// Forward an already validated request upstream.
    ///
    /// # Errors
    /// Returns the upstream failure unchanged; callers decide how much to expose.
    pub async fn suggest(&self, request: &SuggestionRequest) -> Result<Outcome, UpstreamError> {
        let Some(upstream) = &self.upstream else {
            return Ok(Outcome::NotConfigured);
        };

        if request.context.is_some() {
            debug!("suggestion context supplied, not forwarded upstream");
        }

        let completion = upstream.complete(&request.to_chat()).await?;

        Ok(Outcome::Suggested(SuggestionResponse {
            suggestions: completion.content,
            tokens_used: Some(completion.total_tokens),
        }))
    }
}

impl std::fmt::Debug for SuggestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionService")
            .field("configured", &self.is_configured())
            .finish()
    }
}
