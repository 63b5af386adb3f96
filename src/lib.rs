pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod provider;
pub mod ratelimit;
pub mod sampler;
pub mod server;

pub use archive::CollectionArchive;
pub use batch::{BatchOrchestrator, BatchOutcome, BatchProgress, CancelToken};
pub use config::{BatchConfig, Config, ProviderConfig, RateLimitConfig, UpstashConfig};
pub use error::{ForgeError, Result};
pub use models::*;
pub use provider::{ImageProvider, ProviderClient};
pub use ratelimit::FixedWindowLimiter;
