pub mod collect;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod store;
pub mod traits;

#[cfg(test)]
pub mod testutil;

pub use collect::{CollectEvent, CollectReporter, CollectService, TracingCollectReporter};
pub use config::ScraperConfig;
pub use error::AppError;
pub use export::{export_filename, to_csv, write_csv};
pub use models::{CollectionResult, ExtractedPage, Quote, QuoteDraft, QuoteStats, StopReason};
pub use store::{QuoteQuery, QuoteStore};
pub use traits::{Extractor, Fetcher};
