//! ChatProvider trait — the abstraction over AI backends.
//!
//! A ChatProvider knows how to send a conversation to one external AI service
//! and get a single text reply back. The session calls `complete()` without
//! knowing which backend is wired in.
//!
//! Implementations: OpenAI-compatible, Anthropic, Gemini (stub), offline
//! canned responses.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A request to an AI backend.
///
/// `messages` carries the system/context message (if any), the prior
/// conversation history, and the newest user message last. Each adapter
/// reshapes this into its provider's wire schema — e.g. Anthropic hoists the
/// system message into a top-level field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g. "gpt-4", "claude-3-sonnet-20240229")
    pub model: String,

    /// The conversation, system message first, newest user message last
    pub messages: Vec<Message>,

    /// Temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate; `None` lets each adapter apply its
    /// provider's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

impl ProviderRequest {
    /// Build a request with the widget's default sampling settings.
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// A normalized provider response: one plain-text assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderReply {
    /// The generated assistant message
    pub message: Message,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// The core ChatProvider trait.
///
/// Every backend implements this. Errors use the five provider-agnostic
/// failure classes in [`ProviderError`]; adapters are responsible for mapping
/// their wire protocol's status codes and payload shapes onto them.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// A human-readable name for this provider (e.g. "openai", "anthropic").
    fn name(&self) -> &str;

    /// Send a request and get a complete reply.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderReply, ProviderError>;
}
