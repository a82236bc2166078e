use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const ALERT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub alert_poll_interval: Duration,
}

impl AppConfig {
    /// Builds a config pointing at `api_base_url` with the compiled-in
    /// timeout and polling interval.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&api_base_url.into()),
            request_timeout: REQUEST_TIMEOUT,
            alert_poll_interval: ALERT_POLL_INTERVAL,
        }
    }

    pub fn from_env() -> Self {
        let api_base_url = env::var("API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| {
                warn!("API_URL not set, using default {}", DEFAULT_API_URL);
                DEFAULT_API_URL.to_string()
            });

        Self::new(api_base_url)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_alert_poll_interval(mut self, interval: Duration) -> Self {
        self.alert_poll_interval = interval;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
