//! Configuration loading, validation, and tier enforcement for GhostChat.
//!
//! The host page hands the widget a `WidgetConfig` (or points it at a TOML
//! file with environment variable overrides). Once the license gate resolves
//! a tier, [`enforce`] narrows the configuration so every gated field is a
//! member of that tier's capability policy.

use ghostchat_core::tier::{BASELINE_PROVIDER, FALLBACK_THEME};
use ghostchat_core::{ContextMode, Tier};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// The widget configuration surface.
///
/// Field defaults mirror what an unconfigured embed gets.
#[derive(Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// License key; absent means free tier with no validation round trip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,

    /// Theme identifier (gated by tier)
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Provider selector, `namespace:model` or bare namespace (gated by tier)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// AI backend credential; absent routes every message to the offline
    /// canned-response provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Context acquisition mode (gated by tier; free tier never has one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_mode: Option<ContextMode>,

    /// Page to fetch context from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_url: Option<String>,

    /// Override for the license validation endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_api_url: Option<String>,

    // --- Presentation fields: carried for the host renderer, not
    // --- interpreted here beyond theme gating.
    #[serde(default = "default_position")]
    pub position: String,

    #[serde(default = "default_primary_color")]
    pub primary_color: String,

    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default = "default_button_text")]
    pub button_text: String,

    /// Force the offline provider even when an API key is present
    #[serde(default)]
    pub offline_mode: bool,
}

fn default_theme() -> String {
    FALLBACK_THEME.into()
}
fn default_provider() -> String {
    BASELINE_PROVIDER.into()
}
fn default_position() -> String {
    "bottom-right".into()
}
fn default_primary_color() -> String {
    "#4F46E5".into()
}
fn default_welcome_message() -> String {
    "Hi! How can I help you today?".into()
}
fn default_placeholder() -> String {
    "Type your message...".into()
}
fn default_button_text() -> String {
    "Chat with us".into()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            license_key: None,
            theme: default_theme(),
            provider: default_provider(),
            api_key: None,
            context_mode: None,
            context_url: None,
            license_api_url: None,
            position: default_position(),
            primary_color: default_primary_color(),
            welcome_message: default_welcome_message(),
            placeholder: default_placeholder(),
            button_text: default_button_text(),
            offline_mode: false,
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("license_key", &redact(&self.license_key))
            .field("theme", &self.theme)
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("context_mode", &self.context_mode)
            .field("context_url", &self.context_url)
            .field("license_api_url", &self.license_api_url)
            .field("position", &self.position)
            .field("offline_mode", &self.offline_mode)
            .finish()
    }
}

impl WidgetConfig {
    /// Load configuration from a TOML file, then apply environment variable
    /// overrides:
    /// - `GHOSTCHAT_API_KEY`
    /// - `GHOSTCHAT_PROVIDER`
    /// - `GHOSTCHAT_LICENSE_URL`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("GHOSTCHAT_API_KEY").ok();
        }
        if let Ok(provider) = std::env::var("GHOSTCHAT_PROVIDER") {
            config.provider = provider;
        }
        if let Ok(url) = std::env::var("GHOSTCHAT_LICENSE_URL") {
            config.license_api_url = Some(url);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    /// Check if an AI backend credential is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some() && !self.offline_mode
    }
}

/// Narrow a configuration to what `tier` is licensed for. Pure and
/// idempotent: enforcing an already-enforced config changes nothing.
///
/// - a theme outside the tier's policy falls back to [`FALLBACK_THEME`];
/// - a provider outside the policy falls back to [`BASELINE_PROVIDER`];
/// - the free tier loses its context mode unconditionally — context is not a
///   free-tier feature at all, this is not a policy lookup;
/// - a paid tier keeps its context mode only if the policy allows it.
pub fn enforce(mut config: WidgetConfig, tier: Tier) -> WidgetConfig {
    let policy = tier.policy();

    if !policy.allows_theme(&config.theme) {
        warn!(theme = %config.theme, %tier, "Theme not licensed, using fallback");
        config.theme = FALLBACK_THEME.into();
    }

    if !policy.allows_provider(&config.provider) {
        warn!(provider = %config.provider, %tier, "Provider not licensed, using baseline");
        config.provider = BASELINE_PROVIDER.into();
    }

    if let Some(mode) = config.context_mode {
        let allowed = match tier {
            // Hard rule: no context feature on free, regardless of tables
            Tier::Free => false,
            _ => policy.allows_context_mode(mode),
        };
        if !allowed {
            warn!(mode = %mode.as_str(), %tier, "Context mode not licensed, disabling");
            config.context_mode = None;
        }
    }

    config
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },
}
