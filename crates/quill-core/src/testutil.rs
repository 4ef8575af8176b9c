//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::collect::{CollectEvent, CollectReporter};
use crate::error::AppError;
use crate::models::{ExtractedPage, Quote};
use crate::traits::{Extractor, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns queued responses and records requested URLs.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a default HTML string.
    responses: Arc<Mutex<VecDeque<Result<String, AppError>>>>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("<html><body>default</body></html>".to_string()))
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// Mock extractor that hands out prepared pages regardless of the markup.
#[derive(Clone)]
pub struct MockExtractor {
    pages: Arc<Mutex<VecDeque<ExtractedPage>>>,
    /// Returned once the queue is exhausted.
    fallback: ExtractedPage,
}

impl MockExtractor {
    /// Every page is empty.
    pub fn empty() -> Self {
        Self::with_pages(Vec::new())
    }

    /// One prepared page per call, then empty pages.
    pub fn with_pages(pages: Vec<ExtractedPage>) -> Self {
        Self {
            pages: Arc::new(Mutex::new(pages.into())),
            fallback: ExtractedPage::default(),
        }
    }

    /// The same page on every call.
    pub fn repeating(page: ExtractedPage) -> Self {
        Self {
            pages: Arc::new(Mutex::new(VecDeque::new())),
            fallback: page,
        }
    }
}

impl Extractor for MockExtractor {
    fn extract(&self, _html: &str) -> ExtractedPage {
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// ---------------------------------------------------------------------------
// MockReporter
// ---------------------------------------------------------------------------

/// Mock collect reporter that records event names.
#[derive(Default)]
pub struct MockReporter {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectReporter for MockReporter {
    fn report(&self, event: CollectEvent<'_>) {
        let label = match &event {
            CollectEvent::Started { .. } => "Started",
            CollectEvent::PageFetching { .. } => "PageFetching",
            CollectEvent::PageExtracted { .. } => "PageExtracted",
            CollectEvent::PageFailed { .. } => "PageFailed",
            CollectEvent::Stopped { .. } => "Stopped",
            CollectEvent::Finished { .. } => "Finished",
        };
        self.events.lock().unwrap().push(label.to_string());
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a quote with a fixed timestamp.
pub fn make_test_quote(id: u64, text: &str, author: &str, tags: &[&str]) -> Quote {
    Quote {
        id,
        text: text.to_string(),
        author: author.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        page: 1,
        collected_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
    }
}

/// The two-quote record set used across the store and export tests.
pub fn make_sample_quotes() -> Vec<Quote> {
    vec![
        make_test_quote(1, "A", "X", &["life"]),
        make_test_quote(2, "B", "Y", &[]),
    ]
}
