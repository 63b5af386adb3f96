use chrono::Utc;

use crate::models::ImagePayload;

pub const FALLBACK_API_URL: &str = "https://picsum.photos/1024/768";
pub const FALLBACK_NOTE: &str = "Using fallback random image API (for demo purposes)";

/// Substitute image source used when no provider credential is configured.
/// Returns a fetchable placeholder URL and marks the result so callers can
/// surface the degraded mode; it never fails.
#[derive(Clone, Default)]
pub struct FallbackImageClient;

impl FallbackImageClient {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> ImagePayload {
        // Cache-busting query parameter: each call should yield a fresh image.
        let timestamp = Utc::now().timestamp_millis();
        ImagePayload {
            url: Some(format!("{}?t={}", FALLBACK_API_URL, timestamp)),
            b64_json: None,
            timings: None,
            note: Some(FALLBACK_NOTE.to_string()),
        }
    }
}
