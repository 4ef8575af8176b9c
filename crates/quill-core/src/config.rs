use std::time::Duration;

use url::Url;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://quotes.toscrape.com";
const DEFAULT_DELAY_MS: u64 = 1000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how politely to scrape.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Site root; page 1 lives here, page n under `{base_url}/page/{n}/`.
    pub base_url: String,
    /// Fixed pause between consecutive page fetches.
    pub request_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

impl ScraperConfig {
    /// Read configuration from environment variables.
    ///
    /// - `QUILL_BASE_URL` (optional, defaults to quotes.toscrape.com)
    /// - `QUILL_REQUEST_DELAY_MS` (optional, defaults to 1000)
    /// - `QUILL_TIMEOUT_SECS` (optional, defaults to 30)
    /// - `QUILL_USER_AGENT` (optional)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let base_url = match lookup("QUILL_BASE_URL") {
            Some(raw) => validate_base_url(&raw)?,
            None => defaults.base_url,
        };

        let request_delay = match lookup("QUILL_REQUEST_DELAY_MS") {
            None => defaults.request_delay,
            Some(raw) => Duration::from_millis(raw.parse().map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid QUILL_REQUEST_DELAY_MS '{raw}': must be a non-negative integer"
                ))
            })?),
        };

        let timeout = match lookup("QUILL_TIMEOUT_SECS") {
            None => defaults.timeout,
            Some(raw) => {
                let parsed: u64 = raw.parse().map_err(|_| {
                    AppError::ConfigError(format!(
                        "Invalid QUILL_TIMEOUT_SECS '{raw}': must be a positive integer"
                    ))
                })?;
                if parsed == 0 {
                    return Err(AppError::ConfigError(
                        "QUILL_TIMEOUT_SECS must be at least 1".into(),
                    ));
                }
                Duration::from_secs(parsed)
            }
        };

        let user_agent = lookup("QUILL_USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(defaults.user_agent);

        Ok(Self {
            base_url,
            request_delay,
            timeout,
            user_agent,
        })
    }

    /// Replace the base URL after validating it.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, AppError> {
        self.base_url = validate_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// URL of a listing page. Page 1 is the site root.
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.base_url.clone()
        } else {
            format!("{}/page/{page}/", self.base_url)
        }
    }
}

/// Parse an http(s) URL and normalise it without a trailing slash.
fn validate_base_url(raw: &str) -> Result<String, AppError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| AppError::ConfigError(format!("Invalid base URL '{raw}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::ConfigError(format!(
                "URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }
    if parsed.host_str().is_none() {
        return Err(AppError::ConfigError(format!("Base URL '{raw}' has no host")));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn default_user_agent() -> String {
    format!("quill/{}", env!("CARGO_PKG_VERSION"))
}
