use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quill_core::models::{Quote, QuoteStats};
use quill_core::store::QuoteQuery;

const DEFAULT_SCRAPE_PAGES: u32 = 3;

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuoteResponse {
    pub id: u64,
    pub text: String,
    pub author: String,
    pub tags: Vec<String>,
    pub page: u32,
    pub collected_at: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            id: q.id,
            text: q.text,
            author: q.author,
            tags: q.tags,
            page: q.page,
            collected_at: q.collected_at,
        }
    }
}

/// Optional search text and tag, shared by the listing and export endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct QuoteFilterQuery {
    /// Case-insensitive substring matched against quote text or author
    pub search: Option<String>,
    /// Case-insensitive exact tag
    pub tag: Option<String>,
}

impl From<QuoteFilterQuery> for QuoteQuery {
    fn from(q: QuoteFilterQuery) -> Self {
        QuoteQuery {
            search: q.search,
            tag: q.tag,
            case_sensitive: false,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuoteListResponse {
    pub quotes: Vec<QuoteResponse>,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Stats & tags
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatsResponse {
    pub total_quotes: usize,
    pub unique_authors: usize,
    pub unique_tags: usize,
    pub tag_frequency: BTreeMap<String, usize>,
}

impl From<QuoteStats> for StatsResponse {
    fn from(s: QuoteStats) -> Self {
        Self {
            total_quotes: s.total_quotes,
            unique_authors: s.unique_authors,
            unique_tags: s.unique_tags,
            tag_frequency: s.tag_frequency,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TagListResponse {
    /// Sorted, de-duplicated
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Scrape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScrapeRequest {
    /// Number of listing pages to visit (default: 3)
    #[serde(default = "default_scrape_pages")]
    pub max_pages: u32,
}

fn default_scrape_pages() -> u32 {
    DEFAULT_SCRAPE_PAGES
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ScrapeResponse {
    pub quotes: Vec<QuoteResponse>,
    pub stats: StatsResponse,
    pub pages_visited: u32,
    pub failed_pages: Vec<u32>,
    /// One of `page_limit`, `not_found`, `empty_page`, `last_page`
    pub stop_reason: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Size of the current record set
    pub quotes: usize,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
