//! AI backend adapters for GhostChat.
//!
//! All adapters implement the `ghostchat_core::ChatProvider` trait. The
//! router selects the correct adapter from the session's provider selector.

pub mod anthropic;
pub mod gemini;
pub mod offline;
pub mod openai_compat;
pub mod router;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use offline::OfflineProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;
