use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://ec.europa.eu/taxation_customs/dds2/taric/services/goods";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_COUNTRY: &str = "CN";
pub const DEFAULT_LANGUAGE: &str = "EN";

/// Documented ceiling of the remote service.
pub const MAX_REQUESTS_PER_SECOND: u32 = 100;

/// Fixed settings of a `TaricClient`. The client never reads the environment;
/// callers resolve env toggles before building this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub force_substitute: bool,
    pub default_country: String,
    /// 0 disables throttling.
    pub max_requests_per_second: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            force_substitute: false,
            default_country: DEFAULT_COUNTRY.to_string(),
            max_requests_per_second: MAX_REQUESTS_PER_SECOND,
        }
    }
}

impl ClientConfig {
    pub fn substitute() -> Self {
        ClientConfig::default().with_force_substitute(true)
    }

    pub fn with_api_url(mut self, api_url: Option<&str>) -> Self {
        if let Some(url) = api_url {
            let url = url.trim();
            if !url.is_empty() {
                self.api_url = url.to_string();
            }
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_force_substitute(mut self, force: bool) -> Self {
        self.force_substitute = force;
        self
    }

    pub fn with_default_country(mut self, country: &str) -> Self {
        self.default_country = country.trim().to_uppercase();
        self
    }

    pub fn with_max_requests_per_second(mut self, rate: u32) -> Self {
        self.max_requests_per_second = rate;
        self
    }
}
