use reqwest::Client;
use serde_json::{json, Value};

use crate::config::RateLimitConfig;
use crate::error::{ForgeError, Result};

pub const LIMIT_MESSAGE: &str =
    "No requests left. Please add your own API key or try again in 24h.";

/// Fixed-window request counter backed by the Upstash Redis REST API,
/// keyed by caller identity (wallet public key or peer address).
///
/// Without Upstash credentials the limiter is disabled and admits
/// everything. Backend errors fail open: quota enforcement is a courtesy
/// gate, not a correctness requirement.
pub struct FixedWindowLimiter {
    client: Client,
    base_url: Option<String>,
    token: Option<String>,
    max_requests: u64,
    window_seconds: u64,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        if !config.upstash.is_configured() {
            log::warn!("⚠️  Rate limiting disabled: no Upstash credentials configured");
        }
        Self {
            client: Client::new(),
            base_url: config.upstash.url,
            token: config.upstash.token,
            max_requests: config.max_requests,
            window_seconds: config.window_minutes * 60,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some() && self.token.is_some()
    }

    /// Admission check for one request. Never blocks the caller on limiter
    /// backend trouble.
    pub async fn allow(&self, identity: &str) -> bool {
        if !self.is_enabled() {
            return true;
        }
        match self.check(identity).await {
            Ok(allowed) => allowed,
            Err(e) => {
                log::warn!("⚠️  Rate limit check failed, allowing request: {}", e);
                true
            }
        }
    }

    async fn check(&self, identity: &str) -> Result<bool> {
        let base_url = self
            .base_url
            .as_ref()
            .ok_or_else(|| ForgeError::InvalidConfig("Upstash URL is required".into()))?;
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| ForgeError::InvalidConfig("Upstash token is required".into()))?;

        let key = format!("mintforge:ratelimit:{}", identity);
        // INCR opens the window on first hit; EXPIRE NX only arms the TTL
        // once per window.
        let commands = json!([
            ["INCR", key],
            ["EXPIRE", key, self.window_seconds, "NX"]
        ]);

        let response = self
            .client
            .post(format!("{}/pipeline", base_url))
            .bearer_auth(token)
            .json(&commands)
            .send()
            .await
            .map_err(|e| ForgeError::RequestError(format!("Upstash request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ForgeError::RequestError(format!(
                "Rate limit check failed: {}",
                error_text
            )));
        }

        let results: Vec<Value> = response.json().await.map_err(|e| {
            ForgeError::ResponseError(format!("Failed to parse rate limit response: {}", e))
        })?;

        let count = results
            .first()
            .and_then(|entry| entry["result"].as_u64())
            .ok_or_else(|| {
                ForgeError::ResponseError("Invalid rate limit response format".into())
            })?;

        Ok(count <= self.max_requests)
    }
}
