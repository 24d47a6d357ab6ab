//! The context acquisition pipeline.
//!
//! `idle → fetching → {extracting | crawling} → ready`, with `failed`
//! reachable only from `fetching`. The `full_scrape` mode fans out over
//! same-origin links discovered on the origin page and fans back in before
//! the corpus is published: every candidate request must settle (success or
//! failure) before the pipeline reports `Ready`.
//!
//! Crawl segments append in network completion order, not document order.
//! That non-determinism is documented behavior, not a bug.

use crate::extract::{extract_content, extract_faq};
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use ghostchat_core::{ContextError, ContextMode};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Crawl candidate cap — the first 5 distinct same-host links in document
/// order, everything after is ignored.
pub const MAX_CRAWL_PAGES: usize = 5;

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Fetches one page body. The pipeline is generic over this so crawl
/// behavior is testable without a network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ContextError>;
}

/// The production fetcher: a plain GET, no authentication, no retries.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ContextError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            ContextError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContextError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| ContextError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Pipeline state. `Failed` means the origin fetch failed; candidate
/// failures during a crawl are skipped, not fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Idle,
    Fetching,
    Extracting,
    Crawling,
    Ready,
    Failed,
}

/// Acquires the context corpus for one session.
pub struct ContextPipeline<F> {
    fetcher: F,
    state: ContextState,
    corpus: Option<String>,
}

impl<F: PageFetcher> ContextPipeline<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            state: ContextState::Idle,
            corpus: None,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// The accumulated corpus — observable only once the pipeline is
    /// `Ready`, i.e. after the crawl barrier has been crossed.
    pub fn corpus(&self) -> Option<&str> {
        match self.state {
            ContextState::Ready => self.corpus.as_deref(),
            _ => None,
        }
    }

    /// Fetch `url` and build the corpus for `mode`.
    ///
    /// On origin fetch failure the pipeline lands in `Failed` with no corpus
    /// and no retry. Returns the final state.
    pub async fn load(&mut self, mode: ContextMode, url: &str) -> ContextState {
        debug!(mode = mode.as_str(), url, "Loading context");
        self.state = ContextState::Fetching;

        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(url, error = %e, "Context fetch failed");
                self.state = ContextState::Failed;
                return self.state;
            }
        };

        let corpus = match mode {
            ContextMode::Faq => {
                self.state = ContextState::Extracting;
                extract_faq(&body)
            }
            ContextMode::Summarize => {
                self.state = ContextState::Extracting;
                extract_content(&body)
            }
            ContextMode::FullScrape => {
                self.state = ContextState::Crawling;
                self.crawl(url, &body).await
            }
        };

        self.corpus = Some(corpus);
        self.state = ContextState::Ready;
        debug!(url, "Context loaded");
        self.state
    }

    /// Extract the origin page, then fetch up to [`MAX_CRAWL_PAGES`]
    /// same-host links concurrently and append each successful page's
    /// content as it completes. Returns only after every candidate settled.
    async fn crawl(&self, origin_url: &str, origin_body: &str) -> String {
        let mut corpus = extract_content(origin_body);

        let candidates = collect_candidates(origin_url, origin_body, MAX_CRAWL_PAGES);
        if candidates.is_empty() {
            return corpus;
        }

        debug!(count = candidates.len(), "Crawling same-origin pages");

        let mut fetches: FuturesUnordered<_> = candidates
            .iter()
            .map(|link| async move { (link.as_str(), self.fetcher.fetch(link).await) })
            .collect();

        // Fan-in barrier: drain every fetch before returning the corpus.
        while let Some((link, result)) = fetches.next().await {
            match result {
                Ok(body) => {
                    corpus.push_str(&format!("\n\n--- Page: {link} ---\n\n"));
                    corpus.push_str(&extract_content(&body));
                }
                Err(e) => {
                    warn!(url = link, error = %e, "Crawl candidate failed, skipping");
                }
            }
        }

        corpus
    }
}

/// Collect crawl candidates: every anchor's href resolved against the origin
/// URL, exact host matches only, deduplicated preserving document order,
/// capped at `cap`.
fn collect_candidates(origin_url: &str, html: &str, cap: usize) -> Vec<String> {
    let Ok(base) = Url::parse(origin_url) else {
        return Vec::new();
    };
    let Some(host) = base.host_str().map(str::to_string) else {
        return Vec::new();
    };

    let doc = Html::parse_document(html);
    let sel = Selector::parse("a[href]").unwrap_or_else(|_| unreachable!());

    let mut candidates: Vec<String> = Vec::new();
    for anchor in doc.select(&sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href) else {
            continue; // invalid URL, skip
        };
        if resolved.host_str() != Some(host.as_str()) {
            continue;
        }
        let resolved = resolved.to_string();
        if !candidates.contains(&resolved) {
            candidates.push(resolved);
            if candidates.len() == cap {
                break;
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Serves canned bodies with per-URL delays, counting every fetch.
    struct MockFetcher {
        pages: HashMap<String, Result<String, ContextError>>,
        delays: HashMap<String, Duration>,
        fetch_count: AtomicUsize,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                delays: HashMap::new(),
                fetch_count: AtomicUsize::new(0),
            }
        }

        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.into(), Ok(body.into()));
            self
        }

        fn failing(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(
                url.into(),
                Err(ContextError::Http {
                    url: url.into(),
                    status,
                }),
            );
            self
        }

        fn delayed(mut self, url: &str, delay: Duration) -> Self {
            self.delays.insert(url.into(), delay);
            self
        }

        fn fetches(&self) -> usize {
            self.fetch_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String, ContextError> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
            self.pages.get(url).cloned().unwrap_or_else(|| {
                Err(ContextError::Fetch {
                    url: url.to_string(),
                    reason: "no route to host".into(),
                })
            })
        }
    }

    fn anchors(hrefs: &[&str]) -> String {
        hrefs
            .iter()
            .map(|h| format!("<a href=\"{h}\">link</a>"))
            .collect()
    }

    // --- candidate collection ---

    #[test]
    fn candidates_same_host_only() {
        let html = anchors(&[
            "/about",
            "https://example.com/pricing",
            "https://other.com/elsewhere",
            "https://sub.example.com/not-exact",
        ]);
        let found = collect_candidates("https://example.com/", &html, MAX_CRAWL_PAGES);
        assert_eq!(
            found,
            vec![
                "https://example.com/about".to_string(),
                "https://example.com/pricing".to_string(),
            ]
        );
    }

    #[test]
    fn candidates_deduplicated_in_document_order() {
        let html = anchors(&["/a", "/b", "/a", "/c"]);
        let found = collect_candidates("https://example.com/", &html, MAX_CRAWL_PAGES);
        assert_eq!(found.len(), 3);
        assert!(found[0].ends_with("/a"));
        assert!(found[2].ends_with("/c"));
    }

    #[test]
    fn candidates_capped_at_first_five() {
        let hrefs: Vec<String> = (0..12).map(|i| format!("/page{i}")).collect();
        let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
        let html = anchors(&href_refs);
        let found = collect_candidates("https://example.com/", &html, MAX_CRAWL_PAGES);
        assert_eq!(found.len(), 5);
        assert!(found[4].ends_with("/page4"));
    }

    #[test]
    fn candidates_skip_invalid_urls() {
        let html = anchors(&["https://", "/ok"]);
        let found = collect_candidates("https://example.com/", &html, MAX_CRAWL_PAGES);
        assert_eq!(found, vec!["https://example.com/ok".to_string()]);
    }

    #[test]
    fn candidates_empty_on_unparseable_origin() {
        assert!(collect_candidates("not a url", "<a href=\"/x\">x</a>", 5).is_empty());
    }

    // --- pipeline ---

    #[tokio::test]
    async fn faq_mode_extracts_pairs() {
        let fetcher = MockFetcher::new().page(
            "https://example.com/faq",
            "<h2>Hours?</h2><p>9 to 5.</p>",
        );
        let mut pipeline = ContextPipeline::new(fetcher);
        let state = pipeline.load(ContextMode::Faq, "https://example.com/faq").await;
        assert_eq!(state, ContextState::Ready);
        assert_eq!(pipeline.corpus(), Some("Q: Hours?\nA: 9 to 5.\n\n"));
    }

    #[tokio::test]
    async fn summarize_mode_extracts_content() {
        let fetcher =
            MockFetcher::new().page("https://example.com/", "<h1>Home</h1><p>Welcome.</p>");
        let mut pipeline = ContextPipeline::new(fetcher);
        pipeline
            .load(ContextMode::Summarize, "https://example.com/")
            .await;
        assert_eq!(pipeline.corpus(), Some("Home\n\nWelcome.\n\n"));
    }

    #[tokio::test]
    async fn origin_fetch_failure_is_terminal() {
        let fetcher = MockFetcher::new().failing("https://example.com/faq", 500);
        let mut pipeline = ContextPipeline::new(fetcher);
        let state = pipeline.load(ContextMode::Faq, "https://example.com/faq").await;
        assert_eq!(state, ContextState::Failed);
        assert_eq!(pipeline.corpus(), None);
        // One attempt, no retry
        assert_eq!(pipeline.fetcher.fetches(), 1);
    }

    #[tokio::test]
    async fn corpus_unreadable_before_load() {
        let pipeline = ContextPipeline::new(MockFetcher::new());
        assert_eq!(pipeline.state(), ContextState::Idle);
        assert_eq!(pipeline.corpus(), None);
    }

    #[tokio::test]
    async fn full_scrape_without_candidates_is_origin_only() {
        let fetcher = MockFetcher::new().page(
            "https://example.com/",
            "<p>Origin only.</p><a href=\"https://other.com/x\">external</a>",
        );
        let mut pipeline = ContextPipeline::new(fetcher);
        let state = pipeline
            .load(ContextMode::FullScrape, "https://example.com/")
            .await;
        assert_eq!(state, ContextState::Ready);
        assert_eq!(pipeline.corpus(), Some("Origin only.\n\n"));
        assert_eq!(pipeline.fetcher.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn full_scrape_barrier_and_partial_failures() {
        // 5 candidates: 2 fail, 3 succeed; the slowest success settles last.
        let origin_html = format!(
            "<p>Origin.</p>{}",
            anchors(&["/a", "/b", "/c", "/d", "/e"])
        );
        let fetcher = MockFetcher::new()
            .page("https://example.com/", &origin_html)
            .page("https://example.com/a", "<p>Page A</p>")
            .failing("https://example.com/b", 404)
            .page("https://example.com/c", "<p>Page C</p>")
            .failing("https://example.com/d", 500)
            .page("https://example.com/e", "<p>Page E</p>")
            // Completion order: c (5ms), a (20ms), e (40ms)
            .delayed("https://example.com/a", Duration::from_millis(20))
            .delayed("https://example.com/c", Duration::from_millis(5))
            .delayed("https://example.com/e", Duration::from_millis(40));

        let mut pipeline = ContextPipeline::new(fetcher);
        let state = pipeline
            .load(ContextMode::FullScrape, "https://example.com/")
            .await;

        assert_eq!(state, ContextState::Ready);
        // All 5 candidates were issued (plus the origin fetch)
        assert_eq!(pipeline.fetcher.fetches(), 6);

        let corpus = pipeline.corpus().unwrap();
        // Origin content first, then exactly the 3 successful segments
        assert!(corpus.starts_with("Origin.\n\n"));
        assert_eq!(corpus.matches("--- Page: ").count(), 3);
        assert!(corpus.contains("--- Page: https://example.com/a ---"));
        assert!(corpus.contains("Page A"));
        assert!(corpus.contains("Page C"));
        assert!(corpus.contains("Page E"));
        assert!(!corpus.contains("/b"));
        assert!(!corpus.contains("/d"));

        // Segments append in completion order, not document order: the
        // slowest page (e) is last even though all were issued together.
        let pos_c = corpus.find("Page C").unwrap();
        let pos_a = corpus.find("Page A").unwrap();
        let pos_e = corpus.find("Page E").unwrap();
        assert!(pos_c < pos_a && pos_a < pos_e);
    }

    #[tokio::test]
    async fn full_scrape_caps_candidate_fetches() {
        let hrefs: Vec<String> = (0..12).map(|i| format!("/page{i}")).collect();
        let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
        let mut fetcher = MockFetcher::new().page(
            "https://example.com/",
            &format!("<p>Origin.</p>{}", anchors(&href_refs)),
        );
        for i in 0..12 {
            fetcher = fetcher.page(&format!("https://example.com/page{i}"), "<p>x</p>");
        }

        let mut pipeline = ContextPipeline::new(fetcher);
        pipeline
            .load(ContextMode::FullScrape, "https://example.com/")
            .await;

        // Origin + exactly 5 candidates, despite 12 distinct same-host links
        assert_eq!(pipeline.fetcher.fetches(), 6);
        assert_eq!(
            pipeline.corpus().unwrap().matches("--- Page: ").count(),
            5
        );
    }
}
