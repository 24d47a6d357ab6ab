//! Google Gemini adapter — stub.
//!
//! The selector is licensed at the agency tier, but the adapter is not wired
//! to the Gemini API yet. Every request answers with a fixed "coming soon"
//! reply and makes no network call.

use async_trait::async_trait;
use ghostchat_core::error::ProviderError;
use ghostchat_core::message::Message;
use ghostchat_core::provider::{ChatProvider, ProviderReply, ProviderRequest};

pub const COMING_SOON_REPLY: &str = "Gemini provider coming soon";

pub struct GeminiProvider;

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderReply, ProviderError> {
        Ok(ProviderReply {
            message: Message::assistant(COMING_SOON_REPLY),
            model: request.model,
        })
    }
}
