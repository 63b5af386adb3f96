use actix_web::{post, web, HttpRequest, HttpResponse};

use super::AppState;
use crate::batch::BatchOrchestrator;
use crate::error::{ForgeError, Result};
use crate::models::GenerationRequest;
use crate::ratelimit::LIMIT_MESSAGE;

/// Generates one image, or a batch of images when `count > 1`.
///
/// Callers presenting their own API key bypass the quota; everyone else is
/// admitted per wallet public key or peer address.
#[post("/api/generateImages")]
pub async fn generate_images(
    state: web::Data<AppState>,
    http_request: HttpRequest,
    body: web::Json<GenerationRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    request.validate()?;

    if request.personal_api_key().is_none() {
        let identity = caller_identity(&request, &http_request);
        if !state.limiter.allow(&identity).await {
            log::warn!("🚫 Rate limit hit for {}", identity);
            return Err(ForgeError::RateLimitExceeded(LIMIT_MESSAGE.into()));
        }
    }

    if request.count == 1 {
        let payload = state
            .provider
            .generate(
                &request.prompt,
                request.iterative_mode,
                request.personal_api_key(),
            )
            .await?;
        return Ok(HttpResponse::Ok().json(payload));
    }

    let orchestrator = BatchOrchestrator::new(state.provider.clone(), state.config.batch.clone());
    let outcome = orchestrator.run(&request).await?;

    if outcome.succeeded() == 0 {
        return Err(ForgeError::ProviderError(
            "All generation calls failed".into(),
        ));
    }
    log::info!(
        "🖼️  Returning {} of {} requested images",
        outcome.succeeded(),
        outcome.requested
    );
    Ok(HttpResponse::Ok().json(outcome.into_images()))
}

fn caller_identity(request: &GenerationRequest, http_request: &HttpRequest) -> String {
    if let Some(public_key) = &request.public_key {
        return public_key.clone();
    }
    http_request
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
