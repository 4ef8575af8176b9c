pub mod extractor;
pub mod fetcher;

pub use extractor::QuotesExtractor;
pub use fetcher::{ReqwestFetcher, ensure_resolvable};
