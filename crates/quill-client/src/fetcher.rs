use std::net::IpAddr;
use std::time::Duration;

use quill_core::config::ScraperConfig;
use quill_core::error::AppError;
use quill_core::traits::Fetcher;
use reqwest::{Client, StatusCode};
use url::Url;

/// HTTP fetcher using reqwest.
///
/// Downloads raw HTML with the configured User-Agent and timeout. A 404 is
/// reported as [`AppError::NotFound`], which ends pagination; every other
/// failure is a transport error the collector skips past.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        Self::from_config(&ScraperConfig::default())
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, AppError> {
        Self::build(&config.user_agent, config.timeout)
    }

    fn build(user_agent: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Preflight
// ---------------------------------------------------------------------------

/// Check that the target site can be reached at all before a run starts.
///
/// 1. Only allow `http` and `https` schemes.
/// 2. Require a host.
/// 3. Resolve the hostname via DNS (IP literals are accepted as-is).
pub async fn ensure_resolvable(url: &str) -> Result<(), AppError> {
    let parsed =
        Url::parse(url).map_err(|e| AppError::ConfigError(format!("Invalid URL: {e}")))?;

    // 1. Scheme check
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::ConfigError(format!(
                "URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }

    // 2. Extract host
    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::ConfigError("URL has no host".to_string()))?;

    // 3. IP literals need no lookup
    if host.trim_matches(['[', ']']).parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    let port = parsed.port_or_known_default().unwrap_or(80);
    let addr = format!("{host}:{port}");
    let mut addrs = tokio::net::lookup_host(&addr)
        .await
        .map_err(|e| AppError::NetworkError(format!("DNS resolution failed for {host}: {e}")))?;

    if addrs.next().is_none() {
        return Err(AppError::NetworkError(format!(
            "DNS resolution returned no addresses for {host}"
        )));
    }

    tracing::debug!(%host, "Target host resolved");
    Ok(())
}
