use super::{
    ChatCompletion, ChatCompletions, ChatMessage, ChatRequest, CompletionFuture, UpstreamError,
};
use anyhow::{Context, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionReply {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u32>,
}

/// Chat-completion client for the `OpenAI` REST API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .context("Failed to build OpenAI HTTP client")?;

        Ok(Self { client, config })
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn send(&self, request: &ChatRequest) -> Result<ChatCompletion, UpstreamError> {
        let body = CompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let reply: CompletionReply = response.json().await?;
        let total_tokens = reply
            .usage
            .and_then(|usage| usage.total_tokens)
            .unwrap_or(0);

        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::NoChoices)?;

        debug!("completion used {} tokens", total_tokens);

        Ok(ChatCompletion {
            content: choice.message.content.unwrap_or_default(),
            total_tokens,
        })
    }
}

impl ChatCompletions for OpenAiClient {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> CompletionFuture<'a> {
        Box::pin(self.send(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{bearer_token, body_partial_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> anyhow::Result<OpenAiClient> {
        let mut config = OpenAiConfig::new(SecretString::from("sk-test"));
        config.base_url = format!("{}/v1/", server.uri());
        OpenAiClient::new(config)
    }

    fn review_request() -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage::system("You review code."),
                ChatMessage::user("Analyze this rust code: fn main() {}"),
            ],
            max_tokens: 500,
        }
    }

    #[tokio::test]
    async fn sends_model_messages_and_limit() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({
                "model": DEFAULT_MODEL,
                "max_tokens": 500,
                "messages": [
                    { "role": "system", "content": "You review code." },
                    { "role": "user", "content": "Analyze this rust code: fn main() {}" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Looks fine." } },
                    { "message": { "role": "assistant", "content": "Ignored." } }
                ],
                "usage": { "prompt_tokens": 30, "completion_tokens": 12, "total_tokens": 42 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let completion = client_for(&server)?.complete(&review_request()).await?;

        assert_eq!(completion.content, "Looks fine.");
        assert_eq!(completion.total_tokens, 42);
        Ok(())
    }

    #[tokio::test]
    async fn missing_usage_counts_as_zero_tokens() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [ { "message": { "role": "assistant", "content": null } } ]
            })))
            .mount(&server)
            .await;

        let completion = client_for(&server)?.complete(&review_request()).await?;

        assert_eq!(completion.content, "");
        assert_eq!(completion.total_tokens, 0);
        Ok(())
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let result = client_for(&server)?.complete(&review_request()).await;

        assert!(matches!(result, Err(UpstreamError::NoChoices)));
        Ok(())
    }

    #[tokio::test]
    async fn error_status_is_reported() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let result = client_for(&server)?.complete(&review_request()).await;

        match result {
            Err(UpstreamError::Status { status, body }) => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "invalid api key");
            }
            other => anyhow::bail!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = OpenAiConfig::new(SecretString::from("sk-secret"));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }
}
