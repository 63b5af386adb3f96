use actix_web::{web, App, HttpServer};
use mintforge::server::AppState;
use mintforge::{logger, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    match dotenv::dotenv() {
        Ok(_) => println!("✅ .env file loaded successfully"),
        Err(_) => println!("⚠️  No .env file found, using system environment variables"),
    }

    if let Err(e) = logger::init_with_config(logger::LoggerConfig::development()) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_env();
    let port = config.port.unwrap_or(8080);
    let bind_addr = "0.0.0.0";

    logger::log_startup_info("mintforge", env!("CARGO_PKG_VERSION"), bind_addr, port);
    logger::log_config_info(&config);

    if !config.provider.is_live() {
        log::warn!("⚠️  No provider API key configured, image generation runs in fallback mode");
    }

    let state = web::Data::new(AppState::from_config(config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(16 * 1024 * 1024))
            .configure(mintforge::server::configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
