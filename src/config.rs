//! Relay configuration loaded from environment variables

use std::path::PathBuf;
use std::time::Duration;

use crate::tts::DEFAULT_MURF_API_URL;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Murf API key (None = every conversion fails upstream)
    pub api_key: Option<String>,
    pub api_url: String,
    pub port: u16,
    /// Front-end directory served as fallback (None = API only)
    pub static_dir: Option<PathBuf>,
    pub upstream_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_MURF_API_URL.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl RelayConfig {
    /// Load relay config from environment variables.
    ///
    /// MURF_API_KEY is the only source of the credential. Its absence is
    /// logged but does not stop startup.
    pub fn from_env() -> Self {
        let api_key = non_empty_var("MURF_API_KEY");
        if api_key.is_some() {
            tracing::info!("Murf API key loaded");
        } else {
            tracing::warn!(
                "MURF_API_KEY not found in environment - conversions will fail until it is set"
            );
        }

        let api_url = non_empty_var("MURF_API_URL").unwrap_or_else(|| DEFAULT_MURF_API_URL.to_string());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let static_dir = non_empty_var("STATIC_DIR").map(PathBuf::from);

        let upstream_timeout = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS));

        Self {
            api_key,
            api_url,
            port,
            static_dir,
            upstream_timeout,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
