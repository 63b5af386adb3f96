use std::env;

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpstashConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub upstash: UpstashConfig,
    pub max_requests: u64,
    pub window_minutes: u64,
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub width: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub provider: ProviderConfig,
    pub ratelimit: RateLimitConfig,
    pub batch: BatchConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            api_key: None,
            base_url: None,
            model: None,
        }
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("TOGETHER_API_KEY").ok();
        let base_url = env::var("TOGETHER_BASE_URL").ok();
        let model = env::var("TOGETHER_IMAGE_MODEL").ok();

        ProviderConfig {
            api_key,
            base_url,
            model,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// A missing key or the placeholder "tok_" value means the provider
    /// integration is not configured and generation runs in fallback mode.
    pub fn is_live(&self) -> bool {
        match self.api_key.as_deref() {
            Some(key) => !key.is_empty() && key != "tok_",
            None => false,
        }
    }
}

impl Default for UpstashConfig {
    fn default() -> Self {
        UpstashConfig {
            url: None,
            token: None,
        }
    }
}

impl UpstashConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, url: impl Into<String>, token: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.token = Some(token.into());
        self
    }

    pub fn from_env() -> Self {
        let url = env::var("UPSTASH_REDIS_REST_URL").ok();
        let token = env::var("UPSTASH_REDIS_REST_TOKEN").ok();

        UpstashConfig { url, token }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.token.is_some()
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            upstash: UpstashConfig::default(),
            max_requests: 100,
            window_minutes: 1440,
        }
    }
}

impl RateLimitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let max_requests = env::var("RATE_LIMIT_REQUESTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);
        let window_minutes = env::var("RATE_LIMIT_WINDOW_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1440);

        RateLimitConfig {
            upstash: UpstashConfig::from_env(),
            max_requests,
            window_minutes,
        }
    }

    pub fn with_upstash(mut self, upstash: UpstashConfig) -> Self {
        self.upstash = upstash;
        self
    }

    pub fn with_quota(mut self, max_requests: u64, window_minutes: u64) -> Self {
        self.max_requests = max_requests;
        self.window_minutes = window_minutes;
        self
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig { width: 5 }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let width = env::var("BATCH_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|w| *w >= 1)
            .unwrap_or(5);

        BatchConfig { width }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            provider: ProviderConfig::default(),
            ratelimit: RateLimitConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        Config {
            port,
            provider: ProviderConfig::from_env(),
            ratelimit: RateLimitConfig::from_env(),
            batch: BatchConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_provider(mut self, config: ProviderConfig) -> Self {
        self.provider = config;
        self
    }

    pub fn with_ratelimit(mut self, config: RateLimitConfig) -> Self {
        self.ratelimit = config;
        self
    }

    pub fn with_batch(mut self, config: BatchConfig) -> Self {
        self.batch = config;
        self
    }
}
