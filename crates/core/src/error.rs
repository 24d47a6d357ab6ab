//! Error types for the GhostChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// Aggregation of the bounded-context failures, for hosts that want to
/// hold any of them behind one type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("License error: {0}")]
    License(#[from] LicenseError),

    #[error("Context error: {0}")]
    Context(#[from] ContextError),
}

// --- Bounded context errors ---

/// Failures when talking to an AI backend.
///
/// The first five variants are the provider-agnostic failure classes every
/// adapter must map its wire protocol onto; each surfaces to the end user as
/// a distinct assistant message. `NotImplemented` covers selectors with no
/// registered adapter.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Failed to parse provider response: {0}")]
    ParseFailure(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider not implemented: {0}")]
    NotImplemented(String),
}

/// Failures while validating a license key.
///
/// These never cross the license gate's public boundary — every one of them
/// folds into the free-tier fallback. They exist so the gate can log *why*
/// validation fell back.
#[derive(Debug, Clone, Error)]
pub enum LicenseError {
    #[error("License server unreachable: {0}")]
    Network(String),

    #[error("License server returned status {0}")]
    Http(u16),

    #[error("Malformed validation response: {0}")]
    MalformedBody(String),

    #[error("License key rejected by server")]
    Rejected,
}

/// Failures while fetching or crawling context pages.
///
/// Like license errors these are logged and swallowed: a failed context load
/// means an absent corpus, never a user-visible error.
#[derive(Debug, Clone, Error)]
pub enum ContextError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Fetch of {url} returned status {status}")]
    Http { url: String, status: u16 },
}
