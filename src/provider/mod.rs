pub mod fallback;
pub mod together;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::error::Result;
use crate::models::ImagePayload;

pub use fallback::FallbackImageClient;
pub use together::TogetherImageClient;

/// Seam between the batch orchestrator and the image backend. Production
/// code goes through [`ProviderClient`]; tests substitute a mock.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        iterative_mode: bool,
        api_key_override: Option<&str>,
    ) -> Result<ImagePayload>;
}

/// Dispatches between the live provider and the fallback image source.
///
/// A caller-supplied key always routes to the live provider. Without one,
/// the service key decides: configured means live, absent or placeholder
/// means fallback. Fallback results carry a note so callers can flag the
/// output as non-authoritative.
#[derive(Clone)]
pub struct ProviderClient {
    together: TogetherImageClient,
    fallback: FallbackImageClient,
    live: bool,
}

impl ProviderClient {
    pub fn new(config: ProviderConfig) -> Self {
        let live = config.is_live();
        Self {
            together: TogetherImageClient::new(config),
            fallback: FallbackImageClient::new(),
            live,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}

#[async_trait]
impl ImageProvider for ProviderClient {
    async fn generate(
        &self,
        prompt: &str,
        iterative_mode: bool,
        api_key_override: Option<&str>,
    ) -> Result<ImagePayload> {
        let override_key = api_key_override.filter(|key| !key.is_empty());

        if override_key.is_some() || self.live {
            self.together
                .generate(prompt, iterative_mode, override_key)
                .await
        } else {
            log::info!("🎨 Using fallback API for image generation");
            Ok(self.fallback.generate())
        }
    }
}
