//! Offline canned-response provider.
//!
//! Answers every message locally when no API key is configured (or offline
//! mode is forced). Keyword matching on the latest user message selects one
//! of a handful of canned replies; no network call is ever made.

use async_trait::async_trait;
use ghostchat_core::error::ProviderError;
use ghostchat_core::message::{Message, Role};
use ghostchat_core::provider::{ChatProvider, ProviderReply, ProviderRequest};

pub struct OfflineProvider;

/// Pick a canned reply for a user message.
fn canned_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();

    if lower.contains("hello") || lower.contains("hi") {
        "Hello! I'm currently in offline mode. Please provide an API key to enable AI responses."
    } else if lower.contains("help") {
        "I'd love to help! However, I need an API key to provide intelligent responses. \
         Please configure your API key."
    } else if lower.contains("email") || lower.contains("contact") {
        "Thank you for your interest! To get in touch with us, please email \
         support@example.com or visit our contact page."
    } else if lower.contains("price") || lower.contains("cost") {
        "For pricing information, please visit our pricing page or contact our sales team."
    } else {
        "Thank you for your message. I'm currently in offline mode and cannot provide \
         AI-powered responses. Please configure an API key or leave your email and we'll \
         get back to you."
    }
}

#[async_trait]
impl ChatProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderReply, ProviderError> {
        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        Ok(ProviderReply {
            message: Message::assistant(canned_reply(last_user)),
            model: "offline".into(),
        })
    }
}
