use quill_core::AppError;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_MAX_PAGES: u32 = 50;

/// Server-level settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Largest page count a single scrape request may ask for.
    pub max_pages: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `QUILL_SERVER_PORT` (optional, defaults to 5001)
    /// - `QUILL_MAX_PAGES` (optional, defaults to 50)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("QUILL_SERVER_PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.parse().map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid QUILL_SERVER_PORT '{raw}': must be a port number"
                ))
            })?,
        };

        let max_pages = match lookup("QUILL_MAX_PAGES") {
            None => DEFAULT_MAX_PAGES,
            Some(raw) => {
                let parsed: u32 = raw.parse().map_err(|_| {
                    AppError::ConfigError(format!(
                        "Invalid QUILL_MAX_PAGES '{raw}': must be a positive integer"
                    ))
                })?;
                if parsed == 0 {
                    return Err(AppError::ConfigError(
                        "QUILL_MAX_PAGES must be at least 1".into(),
                    ));
                }
                parsed
            }
        };

        Ok(Self { port, max_pages })
    }
}
