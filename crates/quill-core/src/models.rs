use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A quote as scraped from one listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 1-based, assigned in insertion order within one collection run.
    pub id: u64,
    pub text: String,
    pub author: String,
    /// Tags in source display order.
    pub tags: Vec<String>,
    /// Page number the quote was parsed from.
    pub page: u32,
    pub collected_at: DateTime<Utc>,
}

/// A quote as produced by an [`Extractor`](crate::traits::Extractor), before the
/// collector assigns its id, page and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl QuoteDraft {
    pub fn new(text: impl Into<String>, author: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            tags,
        }
    }
}

/// Everything the extractor found on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub quotes: Vec<QuoteDraft>,
    /// Quote blocks seen on the page, including ones that yielded no record.
    pub blocks: usize,
    /// False when the page has no quotes or no link to a next page.
    pub has_more: bool,
}

/// Why a collection run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The requested page count was reached.
    PageLimit,
    /// The site reported the next page as missing.
    NotFound,
    /// A page contained no quote blocks.
    EmptyPage,
    /// A page had quotes but no link to a next page.
    LastPage,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::PageLimit => "page_limit",
            StopReason::NotFound => "not_found",
            StopReason::EmptyPage => "empty_page",
            StopReason::LastPage => "last_page",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of one collection run.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionResult {
    pub records: Vec<Quote>,
    /// Pages fetched successfully and handed to the extractor.
    pub pages_visited: u32,
    /// Pages skipped because their fetch failed.
    pub failed_pages: Vec<u32>,
    pub stop_reason: StopReason,
}

/// Aggregate figures over a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuoteStats {
    pub total_quotes: usize,
    pub unique_authors: usize,
    pub unique_tags: usize,
    pub tag_frequency: BTreeMap<String, usize>,
}
