use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::ProviderConfig;
use crate::error::{ForgeError, Result};
use crate::models::ImagePayload;

pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz";
pub const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-schnell";

/// Fixed seed used in consistency mode so repeated generations of the same
/// prompt stay visually related.
const ITERATIVE_SEED: u64 = 123;

#[derive(Clone)]
pub struct TogetherImageClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderImageResponse {
    #[serde(default)]
    data: Vec<ImagePayload>,
}

impl TogetherImageClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: config.api_key,
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        iterative_mode: bool,
        api_key_override: Option<&str>,
    ) -> Result<ImagePayload> {
        let api_key = api_key_override
            .map(str::to_string)
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| ForgeError::InvalidConfig("No provider API key configured".into()))?;

        let mut request_payload = json!({
            "model": self.model,
            "prompt": prompt,
            "width": 1024,
            "height": 768,
            "steps": 3,
            "n": 1,
            "response_format": "b64_json"
        });
        if iterative_mode {
            request_payload["seed"] = json!(ITERATIVE_SEED);
        }

        log::info!("🎨 Generating image with model: {}", self.model);

        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(api_key)
            .json(&request_payload)
            .send()
            .await
            .map_err(|e| ForgeError::ProviderError(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ForgeError::ProviderError(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let parsed: ProviderImageResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::ResponseError(format!("Malformed provider response: {}", e)))?;

        let payload = parsed
            .data
            .into_iter()
            .find(|image| !image.is_empty())
            .ok_or_else(|| {
                ForgeError::ResponseError("No image data returned from provider".into())
            })?;

        Ok(payload)
    }
}
