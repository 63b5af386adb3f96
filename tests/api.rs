use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::io::Cursor;

use mintforge::server::{configure, AppState};
use mintforge::Config;

fn app_state() -> web::Data<AppState> {
    // Default config has no provider key and no Upstash credentials, so
    // generation runs in fallback mode and the limiter admits everything.
    // No network is touched anywhere in these tests.
    web::Data::new(AppState::from_config(Config::new()))
}

#[actix_web::test]
async fn generate_single_image_in_fallback_mode() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let request = test::TestRequest::post()
        .uri("/api/generateImages")
        .set_json(json!({ "prompt": "pixel art character" }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with("https://picsum.photos/1024/768"));
    assert!(body["note"].as_str().is_some());
}

#[actix_web::test]
async fn generate_batch_returns_indexed_array() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let request = test::TestRequest::post()
        .uri("/api/generateImages")
        .set_json(json!({ "prompt": "pixel art character", "count": 3 }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    let images = body.as_array().unwrap();
    assert_eq!(images.len(), 3);
    for (i, image) in images.iter().enumerate() {
        assert_eq!(image["index"].as_u64().unwrap(), i as u64);
        assert_eq!(image["fallback"], true);
    }
}

#[actix_web::test]
async fn out_of_range_count_is_rejected() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let request = test::TestRequest::post()
        .uri("/api/generateImages")
        .set_json(json!({ "prompt": "p", "count": 10_001 }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Count"));
}

#[actix_web::test]
async fn proxy_requires_url_parameter() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let request = test::TestRequest::get().uri("/api/proxyImage").to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), b"URL is required");
}

#[actix_web::test]
async fn collection_export_produces_named_zip() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let request = test::TestRequest::post()
        .uri("/api/generateCollection")
        .set_json(json!({
            "name": "Forge Apes",
            "symbol": "FAPE",
            "description": "Test collection",
            "size": 2,
            "sellerFeeBasisPoints": 500,
            "creators": [{ "address": "9xQe", "share": 100 }],
            "traits": [{ "name": "Background", "values": ["Red", "Blue"], "weights": [3.0, 1.0] }]
        }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("Content-Type").unwrap(),
        "application/zip"
    );
    assert_eq!(
        response.headers().get("Content-Disposition").unwrap(),
        "attachment; filename=\"forge-apes-collection.zip\""
    );

    let bytes = test::read_body(response).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    // No image references were supplied, so the archive holds metadata only.
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"metadata/1.json".to_string()));
    assert!(names.contains(&"metadata/2.json".to_string()));
    assert!(names.contains(&"metadata/collection.json".to_string()));
}

#[actix_web::test]
async fn archived_metadata_carries_sampled_traits() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let request = test::TestRequest::post()
        .uri("/api/generateCollection")
        .set_json(json!({
            "name": "Forge Apes",
            "symbol": "FAPE",
            "description": "Test collection",
            "size": 1,
            "sellerFeeBasisPoints": 500,
            "creators": [{ "address": "9xQe", "share": 100 }],
            "traits": [{ "name": "Background", "values": ["Red", "Blue"] }]
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = test::read_body(response).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();

    let item: Value = {
        let entry = archive.by_name("metadata/1.json").unwrap();
        serde_json::from_reader(entry).unwrap()
    };
    assert_eq!(item["name"], "Forge Apes #1");
    assert_eq!(item["symbol"], "FAPE");
    let attributes = item["attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes[0]["trait_type"], "Background");
    let value = attributes[0]["value"].as_str().unwrap();
    assert!(value == "Red" || value == "Blue");

    let collection: Value = {
        let entry = archive.by_name("metadata/collection.json").unwrap();
        serde_json::from_reader(entry).unwrap()
    };
    assert_eq!(collection["name"], "Forge Apes");
    assert_eq!(collection["symbol"], "FAPE");
    assert_eq!(collection["image"], "collection.png");
}

#[actix_web::test]
async fn collection_with_bad_creator_shares_is_rejected() {
    let app = test::init_service(App::new().app_data(app_state()).configure(configure)).await;

    let request = test::TestRequest::post()
        .uri("/api/generateCollection")
        .set_json(json!({
            "name": "Forge Apes",
            "symbol": "FAPE",
            "description": "Test collection",
            "size": 1,
            "sellerFeeBasisPoints": 500,
            "creators": [{ "address": "9xQe", "share": 60 }],
            "traits": []
        }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Creator shares"));
}
