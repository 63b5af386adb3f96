use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};

pub const MAX_BATCH_COUNT: u32 = 10_000;

fn default_count() -> u32 {
    1
}

/// One generation run as submitted by a caller. Immutable once issued.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub iterative_mode: bool,
    #[serde(default, rename = "userAPIKey")]
    pub user_api_key: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        GenerationRequest {
            prompt: prompt.into(),
            count: 1,
            iterative_mode: false,
            user_api_key: None,
            public_key: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_iterative_mode(mut self, enabled: bool) -> Self {
        self.iterative_mode = enabled;
        self
    }

    pub fn with_user_api_key(mut self, key: impl Into<String>) -> Self {
        self.user_api_key = Some(key.into());
        self
    }

    /// Caller-supplied provider credential. Empty or whitespace-only keys
    /// count as absent, so the rate-limit bypass and the provider key
    /// override always agree on whether a personal credential exists.
    pub fn personal_api_key(&self) -> Option<&str> {
        self.user_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(ForgeError::InvalidConfig("Prompt must not be empty".into()));
        }
        if self.count < 1 || self.count > MAX_BATCH_COUNT {
            return Err(ForgeError::InvalidConfig(format!(
                "Count must be between 1 and {}, got {}",
                MAX_BATCH_COUNT, self.count
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timings {
    pub inference: f64,
}

/// Wire shape of one generated image as returned by the provider (and by
/// the generation endpoint): either a fetchable URL or inline base64 data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timings: Option<Timings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ImagePayload {
    pub fn from_url(url: impl Into<String>) -> Self {
        ImagePayload {
            url: Some(url.into()),
            b64_json: None,
            timings: None,
            note: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.b64_json.is_none()
    }
}

/// A provider result tagged with its 0-based position in the batch, so
/// archive filenames stay deterministic regardless of completion order.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    pub index: usize,
    pub fallback: bool,
    #[serde(flatten)]
    pub payload: ImagePayload,
}
