//! Provider router — maps a parsed selector onto a registered adapter.
//!
//! Dispatch is a closed match over `ProviderKind`: one adapter per known
//! namespace, and an explicit `NotImplemented` error for namespaces without
//! one (licensed-but-unwired selectors like `ollama` included). The offline
//! provider is held separately — sessions without a credential go straight
//! to it without touching dispatch.

use crate::anthropic::AnthropicProvider;
use crate::gemini::GeminiProvider;
use crate::offline::OfflineProvider;
use crate::openai_compat::OpenAiCompatProvider;
use crate::{anthropic, openai_compat};
use ghostchat_core::error::ProviderError;
use ghostchat_core::provider::ChatProvider;
use ghostchat_core::selector::{ProviderKind, ProviderSelector};

/// Routes chat requests to the correct adapter.
pub struct ProviderRouter {
    openai: OpenAiCompatProvider,
    anthropic: AnthropicProvider,
    gemini: GeminiProvider,
    offline: OfflineProvider,
}

impl ProviderRouter {
    /// Build the adapter set for one session's credential.
    ///
    /// The OpenAI-compatible adapter points at OpenRouter, which fronts the
    /// `openai:*` model family for the widget.
    pub fn new(api_key: Option<&str>) -> Self {
        let key = api_key.unwrap_or_default();
        Self {
            openai: OpenAiCompatProvider::openrouter(key),
            anthropic: AnthropicProvider::new(key),
            gemini: GeminiProvider,
            offline: OfflineProvider,
        }
    }

    /// Resolve a selector to its adapter and concrete model name.
    ///
    /// Selectors without a model axis get the adapter's default model.
    /// Unregistered namespaces yield `ProviderError::NotImplemented`.
    pub fn dispatch(
        &self,
        selector: &ProviderSelector,
    ) -> Result<(&dyn ChatProvider, String), ProviderError> {
        let model = |default: &str| {
            selector
                .model
                .clone()
                .unwrap_or_else(|| default.to_string())
        };

        match &selector.kind {
            ProviderKind::OpenAi => Ok((&self.openai, model(openai_compat::DEFAULT_MODEL))),
            ProviderKind::Anthropic => Ok((&self.anthropic, model(anthropic::DEFAULT_MODEL))),
            ProviderKind::Google => Ok((&self.gemini, model("gemini"))),
            ProviderKind::Ollama | ProviderKind::WebLlm | ProviderKind::Other(_) => {
                Err(ProviderError::NotImplemented(selector.to_string()))
            }
        }
    }

    /// The no-credential fallback provider.
    pub fn offline(&self) -> &dyn ChatProvider {
        &self.offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_known_namespaces() {
        let router = ProviderRouter::new(Some("sk-test"));

        let (provider, model) = router
            .dispatch(&ProviderSelector::parse("openai:gpt-4"))
            .unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(model, "gpt-4");

        let (provider, model) = router
            .dispatch(&ProviderSelector::parse("anthropic:claude"))
            .unwrap();
        assert_eq!(provider.name(), "anthropic");
        assert_eq!(model, "claude");

        let (provider, _) = router
            .dispatch(&ProviderSelector::parse("google:gemini"))
            .unwrap();
        assert_eq!(provider.name(), "google");
    }

    #[test]
    fn default_models_fill_missing_axis() {
        let router = ProviderRouter::new(Some("sk-test"));
        let (_, model) = router
            .dispatch(&ProviderSelector::parse("anthropic"))
            .unwrap();
        assert_eq!(model, anthropic::DEFAULT_MODEL);
    }

    #[test]
    fn unregistered_namespaces_are_not_implemented() {
        let router = ProviderRouter::new(Some("sk-test"));
        for raw in ["ollama", "webllm", "mistral:large"] {
            let err = match router.dispatch(&ProviderSelector::parse(raw)) {
                Err(err) => err,
                Ok(_) => panic!("expected NotImplemented for {raw}"),
            };
            match err {
                ProviderError::NotImplemented(s) => assert_eq!(s, raw),
                other => panic!("expected NotImplemented, got {other:?}"),
            }
        }
    }
}
