use std::future::Future;

use crate::error::AppError;
use crate::models::ExtractedPage;

/// Fetches raw HTML content from a URL.
///
/// Implementations report a missing page as [`AppError::NotFound`] so the
/// collector can tell the end of the listing apart from a transient failure.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Turns one listing page's markup into quote drafts.
///
/// Must not fail: markup lacking the expected elements yields fewer drafts.
pub trait Extractor: Send + Sync + Clone {
    fn extract(&self, html: &str) -> ExtractedPage;
}
