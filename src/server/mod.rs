pub mod collection;
pub mod generate;
pub mod proxy;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::config::Config;
use crate::error::ForgeError;
use crate::provider::{ImageProvider, ProviderClient};
use crate::ratelimit::FixedWindowLimiter;

/// Per-process state shared by the route handlers. The provider client is
/// constructed once here and passed in explicitly; no hidden globals.
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn ImageProvider>,
    pub limiter: Arc<FixedWindowLimiter>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let provider: Arc<dyn ImageProvider> =
            Arc::new(ProviderClient::new(config.provider.clone()));
        let limiter = Arc::new(FixedWindowLimiter::new(config.ratelimit.clone()));
        Self {
            config,
            provider,
            limiter,
            http: reqwest::Client::new(),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate::generate_images)
        .service(collection::generate_collection)
        .service(proxy::proxy_image);
}

impl actix_web::ResponseError for ForgeError {
    fn status_code(&self) -> StatusCode {
        match self {
            ForgeError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            ForgeError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
