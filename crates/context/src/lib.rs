//! Context acquisition for GhostChat.
//!
//! Turns a host-supplied URL into a plain-text corpus that grounds provider
//! responses: pure HTML-to-text extraction in [`extract`], and the fetching /
//! crawling state machine in [`pipeline`].

pub mod extract;
pub mod pipeline;

pub use extract::{extract_content, extract_faq};
pub use pipeline::{ContextPipeline, ContextState, HttpFetcher, PageFetcher, MAX_CRAWL_PAGES};
