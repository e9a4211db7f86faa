//! Outbound chat-completion providers.
//!
//! Handlers never talk to a provider directly; they go through the
//! [`ChatCompletions`] seam so the HTTP layer can be exercised without a
//! network and so a single client instance can be shared read-only.

use serde::{Deserialize, Serialize};
use std::{future::Future, pin::Pin};
use thiserror::Error;

pub mod openai;

pub use self::openai::{OpenAiClient, OpenAiConfig};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to upstream provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("upstream provider returned no choices")]
    NoChoices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A provider-agnostic completion request. The model is chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// The parts of a completion the gateway cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub content: String,
    pub total_tokens: u32,
}

pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ChatCompletion, UpstreamError>> + Send + 'a>>;

pub trait ChatCompletions: Send + Sync {
    fn complete<'a>(&'a self, request: &'a ChatRequest) -> CompletionFuture<'a>;
}
