use thiserror::Error;

/// Application-wide error types for Quill.
#[derive(Error, Debug)]
pub enum AppError {
    /// The site answered with a non-success status other than 404.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The requested page does not exist (HTTP 404).
    #[error("Page not found: {0}")]
    NotFound(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A CSS selector or other parser input could not be compiled.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid configuration or request parameters.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Another collection run is still replacing the record set.
    #[error("A scrape is already in progress")]
    ScrapeInProgress,

    /// The record set selected for export is empty.
    #[error("No quotes to export")]
    NothingToExport,

    /// Writing CSV output failed.
    #[error("Export error: {0}")]
    ExportError(String),
}

impl AppError {
    /// Returns true if this error means the page sequence has ended.
    pub fn ends_pagination(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Returns true for transport failures: the page is skipped and the run goes on.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::NetworkError(_) | AppError::Timeout(_)
        )
    }
}
