//! # GhostChat Core
//!
//! Domain types, traits, and error definitions for the GhostChat embeddable
//! chat widget. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The widget's session logic is split into bounded contexts (license,
//! context acquisition, provider dispatch), each living in its own crate and
//! depending inward on the types defined here. Anything that performs I/O is
//! a trait in this crate with implementations elsewhere, so every crate can
//! be tested against mocks.

pub mod error;
pub mod message;
pub mod provider;
pub mod selector;
pub mod tier;

// Re-export key types at crate root for ergonomics
pub use error::{ContextError, Error, LicenseError, ProviderError};
pub use message::{Conversation, Message, Role};
pub use provider::{ChatProvider, ProviderReply, ProviderRequest};
pub use selector::{ProviderKind, ProviderSelector};
pub use tier::{CapabilityPolicy, ContextMode, Tier};
