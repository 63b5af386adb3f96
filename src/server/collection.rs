use actix_web::{post, web, HttpResponse};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use super::{proxy, AppState};
use crate::archive::{archive_filename, CollectionArchive};
use crate::error::{ForgeError, Result};
use crate::logger;
use crate::models::{CollectionConfig, CollectionMetadata, ImagePayload, NftMetadata};
use crate::sampler;

#[derive(Debug, Deserialize)]
pub struct CollectionExportRequest {
    #[serde(flatten)]
    pub config: CollectionConfig,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
}

/// Builds the downloadable collection archive: one sampled metadata record
/// per item, plus image bytes for every item that has a resolvable image
/// reference. Unresolvable images are skipped, not fatal; only a finalize
/// failure aborts the export.
#[post("/api/generateCollection")]
pub async fn generate_collection(
    state: web::Data<AppState>,
    body: web::Json<CollectionExportRequest>,
) -> Result<HttpResponse> {
    let CollectionExportRequest { config, images } = body.into_inner();
    config.validate()?;

    let _timer = logger::timer("collection export");
    let mut archive = CollectionArchive::new();
    let mut skipped = 0usize;

    for i in 0..config.size as usize {
        let traits = {
            let mut rng = rand::thread_rng();
            sampler::sample_traits(&config.traits, &mut rng)?
        };
        let record = NftMetadata::build(&config, i as u32, &traits);
        archive.add_item_metadata(i, &record)?;

        if let Some(image) = images.get(i) {
            match resolve_image_bytes(&state.http, image).await {
                Ok(bytes) => archive.add_image(i, "png", &bytes)?,
                Err(e) => {
                    log::warn!("⚠️  Skipping image {}: {}", i + 1, e);
                    skipped += 1;
                }
            }
        }
    }

    archive.add_collection_metadata(&CollectionMetadata::build(&config))?;

    if skipped > 0 {
        log::warn!("⚠️  {} of {} images skipped during export", skipped, config.size);
    }
    log::info!(
        "📦 Archive built: {} images, {} metadata entries",
        archive.image_count(),
        archive.metadata_count()
    );

    let bytes = archive.finish()?;

    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", archive_filename(&config.name)),
        ))
        .body(bytes))
}

/// Resolves one image reference to raw bytes: inline base64 is decoded
/// locally, URLs go through the shared proxy fetch path.
async fn resolve_image_bytes(
    client: &reqwest::Client,
    payload: &ImagePayload,
) -> Result<Vec<u8>> {
    if let Some(b64) = &payload.b64_json {
        return BASE64
            .decode(b64)
            .map_err(|e| ForgeError::ArchiveError(format!("Invalid base64 image data: {}", e)));
    }
    if let Some(url) = &payload.url {
        let (bytes, _content_type) = proxy::fetch_image(client, url).await?;
        return Ok(bytes);
    }
    Err(ForgeError::ArchiveError(
        "Image reference has neither url nor b64_json".into(),
    ))
}
