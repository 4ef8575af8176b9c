use chrono::Utc;

use crate::config::ScraperConfig;
use crate::error::AppError;
use crate::models::{CollectionResult, ExtractedPage, Quote, StopReason};
use crate::traits::{Extractor, Fetcher};

/// Events emitted during a collection run for monitoring/logging.
#[derive(Debug, Clone)]
pub enum CollectEvent<'a> {
    Started {
        max_pages: u32,
    },
    PageFetching {
        page: u32,
        url: &'a str,
    },
    PageExtracted {
        page: u32,
        records: usize,
        total: usize,
    },
    PageFailed {
        page: u32,
        url: &'a str,
        error: &'a AppError,
    },
    Stopped {
        page: u32,
        reason: StopReason,
    },
    Finished {
        total: usize,
        pages_visited: u32,
    },
}

/// Trait for receiving collection events (decoupled logging).
pub trait CollectReporter: Send + Sync {
    fn report(&self, event: CollectEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCollectReporter;

impl CollectReporter for TracingCollectReporter {
    fn report(&self, event: CollectEvent<'_>) {
        match event {
            CollectEvent::Started { max_pages } => {
                tracing::info!(%max_pages, "Starting to scrape");
            }
            CollectEvent::PageFetching { page, url } => {
                tracing::info!(%page, %url, "Scraping page");
            }
            CollectEvent::PageExtracted {
                page,
                records,
                total,
            } => {
                tracing::info!(%page, %records, %total, "Page extracted");
            }
            CollectEvent::PageFailed { page, url, error } => {
                tracing::warn!(%page, %url, %error, "Page fetch failed, skipping");
            }
            CollectEvent::Stopped { page, reason } => {
                tracing::info!(%page, %reason, "Stopping");
            }
            CollectEvent::Finished {
                total,
                pages_visited,
            } => {
                tracing::info!(%total, %pages_visited, "Scraping completed");
            }
        }
    }
}

/// State of one collection run. Lives only for the duration of a `collect` call.
struct CollectionRun {
    records: Vec<Quote>,
    pages_visited: u32,
    failed_pages: Vec<u32>,
}

impl CollectionRun {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            pages_visited: 0,
            failed_pages: Vec::new(),
        }
    }

    /// Stamp each draft with the next id, its page and the current time.
    fn append(&mut self, page: u32, extracted: ExtractedPage) {
        for draft in extracted.quotes {
            let id = self.records.len() as u64 + 1;
            self.records.push(Quote {
                id,
                text: draft.text,
                author: draft.author,
                tags: draft.tags,
                page,
                collected_at: Utc::now(),
            });
        }
    }

    fn finish(self, stop_reason: StopReason) -> CollectionResult {
        CollectionResult {
            records: self.records,
            pages_visited: self.pages_visited,
            failed_pages: self.failed_pages,
            stop_reason,
        }
    }
}

/// Drives the extractor across the listing pages, one fetch at a time.
///
/// Generic over the fetcher and extractor so tests can run without HTTP.
pub struct CollectService<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    fetcher: F,
    extractor: E,
    config: ScraperConfig,
}

impl<F, E> CollectService<F, E>
where
    F: Fetcher,
    E: Extractor,
{
    pub fn new(fetcher: F, extractor: E, config: ScraperConfig) -> Self {
        Self {
            fetcher,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Collect quotes from pages `1..=max_pages`.
    ///
    /// Stops early after the first page that is missing, empty, or has no
    /// next-page link. A page whose fetch fails is skipped and still uses up
    /// one page of the budget. Nothing is retried.
    pub async fn collect<R: CollectReporter>(
        &self,
        max_pages: u32,
        reporter: &R,
    ) -> Result<CollectionResult, AppError> {
        if max_pages < 1 {
            return Err(AppError::ConfigError(
                "Page count must be at least 1".to_string(),
            ));
        }

        reporter.report(CollectEvent::Started { max_pages });

        let mut run = CollectionRun::new();
        let mut stop_reason = StopReason::PageLimit;

        for page in 1..=max_pages {
            if page > 1 && !self.config.request_delay.is_zero() {
                tokio::time::sleep(self.config.request_delay).await;
            }

            let url = self.config.page_url(page);
            reporter.report(CollectEvent::PageFetching { page, url: &url });

            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) if e.ends_pagination() => {
                    stop_reason = StopReason::NotFound;
                    reporter.report(CollectEvent::Stopped {
                        page,
                        reason: stop_reason,
                    });
                    break;
                }
                Err(e) => {
                    reporter.report(CollectEvent::PageFailed {
                        page,
                        url: &url,
                        error: &e,
                    });
                    run.failed_pages.push(page);
                    continue;
                }
            };

            run.pages_visited += 1;
            let extracted = self.extractor.extract(&html);
            let found = extracted.quotes.len();
            let blocks = extracted.blocks;
            let has_more = extracted.has_more;
            run.append(page, extracted);

            reporter.report(CollectEvent::PageExtracted {
                page,
                records: found,
                total: run.records.len(),
            });

            if !has_more {
                stop_reason = if blocks == 0 {
                    StopReason::EmptyPage
                } else {
                    StopReason::LastPage
                };
                reporter.report(CollectEvent::Stopped {
                    page,
                    reason: stop_reason,
                });
                break;
            }
        }

        reporter.report(CollectEvent::Finished {
            total: run.records.len(),
            pages_visited: run.pages_visited,
        });

        Ok(run.finish(stop_reason))
    }
}
