//! License tiers and the capability policy table.
//!
//! A `Tier` gates which themes, providers, and context-acquisition modes a
//! session may use. Tiers are totally ordered by capability: everything the
//! free tier may do, the personal tier may do, and so on. The policy tables
//! below encode that ordering by literal extension — each tier's table starts
//! with the full contents of the tier below it — so the superset invariant
//! holds by construction rather than by a runtime check.

use serde::{Deserialize, Serialize};

/// A license capability level.
///
/// Derived `Ord` follows declaration order, so `Free < Personal < Agency`
/// matches the capability ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Personal,
    Agency,
}

impl Tier {
    /// Parse a tier string as sent by the license server.
    ///
    /// Case-insensitive. Unknown strings yield `None`; the license gate folds
    /// that into the free-tier fallback.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "personal" => Some(Self::Personal),
            "agency" => Some(Self::Agency),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Personal => "personal",
            Self::Agency => "agency",
        }
    }

    /// The capability policy for this tier.
    pub fn policy(&self) -> &'static CapabilityPolicy {
        match self {
            Self::Free => &FREE_POLICY,
            Self::Personal => &PERSONAL_POLICY,
            Self::Agency => &AGENCY_POLICY,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A web-content acquisition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    /// Extract Q/A pairs from heading + sibling structure
    Faq,
    /// Extract headings and paragraphs as a flat text corpus
    Summarize,
    /// Extract the origin page, then crawl same-origin links one level deep
    FullScrape,
}

impl ContextMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Faq => "faq",
            Self::Summarize => "summarize",
            Self::FullScrape => "full_scrape",
        }
    }
}

/// The theme every tier is allowed to use; enforcement falls back to it.
pub const FALLBACK_THEME: &str = "minimal-light";

/// The provider selector present in every tier; enforcement falls back to it.
pub const BASELINE_PROVIDER: &str = "openai:gpt-3.5";

/// What a tier is allowed to configure.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityPolicy {
    /// Allowed theme identifiers
    pub themes: &'static [&'static str],
    /// Allowed provider selectors (`namespace:model` or bare namespace)
    pub providers: &'static [&'static str],
    /// Allowed context-acquisition modes (empty for free)
    pub context_modes: &'static [ContextMode],
}

impl CapabilityPolicy {
    pub fn allows_theme(&self, theme: &str) -> bool {
        self.themes.contains(&theme)
    }

    pub fn allows_provider(&self, selector: &str) -> bool {
        self.providers.contains(&selector)
    }

    pub fn allows_context_mode(&self, mode: ContextMode) -> bool {
        self.context_modes.contains(&mode)
    }
}

static FREE_POLICY: CapabilityPolicy = CapabilityPolicy {
    themes: &["minimal-light", "minimal-dark"],
    providers: &["openai:gpt-3.5"],
    context_modes: &[],
};

static PERSONAL_POLICY: CapabilityPolicy = CapabilityPolicy {
    themes: &[
        "minimal-light",
        "minimal-dark",
        "glassmorphism",
        "terminal-console",
    ],
    providers: &["openai:gpt-3.5", "openai:gpt-4", "anthropic:claude"],
    context_modes: &[ContextMode::Faq, ContextMode::Summarize],
};

static AGENCY_POLICY: CapabilityPolicy = CapabilityPolicy {
    themes: &[
        "minimal-light",
        "minimal-dark",
        "glassmorphism",
        "terminal-console",
        "ghost-orb",
    ],
    providers: &[
        "openai:gpt-3.5",
        "openai:gpt-4",
        "openai:gpt-4-turbo",
        "anthropic:claude",
        "anthropic:claude-opus",
        "google:gemini",
        "ollama",
        "webllm",
    ],
    context_modes: &[
        ContextMode::Faq,
        ContextMode::Summarize,
        ContextMode::FullScrape,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn superset<T: PartialEq>(bigger: &[T], smaller: &[T]) -> bool {
        smaller.iter().all(|item| bigger.contains(item))
    }

    #[test]
    fn tier_ordering_matches_capability() {
        assert!(Tier::Free < Tier::Personal);
        assert!(Tier::Personal < Tier::Agency);
    }

    #[test]
    fn policies_are_monotone() {
        let pairs = [
            (Tier::Personal, Tier::Free),
            (Tier::Agency, Tier::Personal),
        ];
        for (higher, lower) in pairs {
            let hi = higher.policy();
            let lo = lower.policy();
            assert!(superset(hi.themes, lo.themes), "{higher} themes ⊉ {lower}");
            assert!(
                superset(hi.providers, lo.providers),
                "{higher} providers ⊉ {lower}"
            );
            assert!(
                superset(hi.context_modes, lo.context_modes),
                "{higher} context modes ⊉ {lower}"
            );
        }
    }

    #[test]
    fn fallbacks_exist_in_every_tier() {
        for tier in [Tier::Free, Tier::Personal, Tier::Agency] {
            assert!(tier.policy().allows_theme(FALLBACK_THEME));
            assert!(tier.policy().allows_provider(BASELINE_PROVIDER));
        }
    }

    #[test]
    fn free_tier_has_no_context_modes() {
        assert!(Tier::Free.policy().context_modes.is_empty());
    }

    #[test]
    fn tier_parsing_is_case_insensitive() {
        assert_eq!(Tier::parse("AGENCY"), Some(Tier::Agency));
        assert_eq!(Tier::parse(" personal "), Some(Tier::Personal));
        assert_eq!(Tier::parse("enterprise"), None);
        assert_eq!(Tier::parse(""), None);
    }

    #[test]
    fn tier_deserializes_from_wire_format() {
        assert_eq!(serde_json::from_str::<Tier>("\"agency\"").unwrap(), Tier::Agency);
        assert!(serde_json::from_str::<Tier>("\"platinum\"").is_err());
    }
}
