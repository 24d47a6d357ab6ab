//! Provider selectors — `namespace:model` strings parsed into a closed union.
//!
//! The widget config names its backend with a string like `openai:gpt-4` or a
//! bare namespace like `ollama`. Dispatching on string prefixes invites typo
//! bugs, so the namespace is parsed into `ProviderKind` once and matched
//! exhaustively from then on; anything unrecognized lands in
//! `ProviderKind::Other` and gets an explicit "not implemented" reply.

use serde::{Deserialize, Serialize};

/// A known provider namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
    Ollama,
    WebLlm,
    /// A namespace with no registered adapter
    Other(String),
}

impl ProviderKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Ollama => "ollama",
            Self::WebLlm => "webllm",
            Self::Other(s) => s,
        }
    }
}

/// A parsed provider selection: namespace plus optional model axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSelector {
    pub kind: ProviderKind,
    /// `None` for providers without a model axis (e.g. `ollama`)
    pub model: Option<String>,
}

impl ProviderSelector {
    /// Parse a selector string. Total — any string parses, unknown
    /// namespaces become `ProviderKind::Other`.
    pub fn parse(s: &str) -> Self {
        let (namespace, model) = match s.split_once(':') {
            Some((ns, model)) if !model.is_empty() => (ns, Some(model.to_string())),
            Some((ns, _)) => (ns, None),
            None => (s, None),
        };

        let kind = match namespace {
            "openai" => ProviderKind::OpenAi,
            "anthropic" => ProviderKind::Anthropic,
            "google" => ProviderKind::Google,
            "ollama" => ProviderKind::Ollama,
            "webllm" => ProviderKind::WebLlm,
            other => ProviderKind::Other(other.to_string()),
        };

        Self { kind, model }
    }
}

impl std::fmt::Display for ProviderSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.model {
            Some(model) => write!(f, "{}:{}", self.kind.as_str(), model),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespace_and_model() {
        let sel = ProviderSelector::parse("openai:gpt-4");
        assert_eq!(sel.kind, ProviderKind::OpenAi);
        assert_eq!(sel.model.as_deref(), Some("gpt-4"));
    }

    #[test]
    fn parses_bare_namespace() {
        let sel = ProviderSelector::parse("ollama");
        assert_eq!(sel.kind, ProviderKind::Ollama);
        assert!(sel.model.is_none());
    }

    #[test]
    fn unknown_namespace_is_other() {
        let sel = ProviderSelector::parse("mistral:large");
        assert_eq!(sel.kind, ProviderKind::Other("mistral".into()));
        assert_eq!(sel.model.as_deref(), Some("large"));
    }

    #[test]
    fn display_roundtrip() {
        for raw in ["openai:gpt-3.5", "anthropic:claude-opus", "webllm"] {
            assert_eq!(ProviderSelector::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn trailing_colon_means_no_model() {
        let sel = ProviderSelector::parse("openai:");
        assert_eq!(sel.kind, ProviderKind::OpenAi);
        assert!(sel.model.is_none());
    }
}
