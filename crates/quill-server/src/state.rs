use tokio::sync::Mutex;

use quill_client::{QuotesExtractor, ReqwestFetcher};
use quill_core::{AppError, CollectService, QuoteStore, ScraperConfig};

use crate::config::ServerConfig;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    /// Records of the most recent successful scrape. Replaced wholesale by the next one.
    pub store: QuoteStore,
    /// Held for the duration of a scrape; a second scrape is rejected while it is taken.
    pub scrape_guard: Mutex<()>,
    pub collector: CollectService<ReqwestFetcher, QuotesExtractor>,
    pub max_pages: u32,
}

impl AppState {
    pub fn new(scraper: ScraperConfig, server: &ServerConfig) -> Result<Self, AppError> {
        let fetcher = ReqwestFetcher::from_config(&scraper)?;
        let extractor = QuotesExtractor::new()?;

        Ok(Self {
            store: QuoteStore::new(),
            scrape_guard: Mutex::new(()),
            collector: CollectService::new(fetcher, extractor, scraper),
            max_pages: server.max_pages,
        })
    }
}
