use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use super::AppState;
use crate::error::{ForgeError, Result};

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// Streams remote image bytes back to the browser, sidestepping
/// cross-origin and caching restrictions on provider-hosted URLs.
#[get("/api/proxyImage")]
pub async fn proxy_image(
    state: web::Data<AppState>,
    query: web::Query<ProxyQuery>,
) -> HttpResponse {
    let url = match &query.url {
        Some(url) if !url.is_empty() => url,
        _ => return HttpResponse::BadRequest().body("URL is required"),
    };

    match fetch_image(&state.http, url).await {
        Ok((bytes, content_type)) => HttpResponse::Ok().content_type(content_type).body(bytes),
        Err(e) => {
            log::error!("❌ Proxy fetch failed for {}: {}", url, e);
            HttpResponse::InternalServerError().body("Failed to fetch image")
        }
    }
}

/// Controlled fetch path for remote image bytes, shared with the archive
/// export. Returns the body plus the upstream content type.
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<(Vec<u8>, String)> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ForgeError::RequestError(format!("Image fetch failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(ForgeError::RequestError(format!(
            "Image fetch returned {}",
            response.status()
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ForgeError::ResponseError(format!("Failed to read image body: {}", e)))?;

    Ok((bytes.to_vec(), content_type))
}
