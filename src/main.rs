use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Compress, web};
use tracing::{info, warn};

use qrtrack::api::middleware::BearerAuth;
use qrtrack::api::services::{health_routes, qr_routes, redirect_routes, user_routes};
use qrtrack::config::init_config;
use qrtrack::storage::StorageFactory;
use qrtrack::system::init_logging;

/// Build CORS middleware: API is consumed by a separately-hosted frontend
fn build_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "HEAD", "OPTIONS"])
        .allowed_headers(vec!["Content-Type", "Authorization", "Accept"])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = init_config();

    // 日志初始化，guard 需存活到进程结束
    let _log_guard = init_logging(config);

    let storage = match StorageFactory::create().await {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return Err(std::io::Error::other(e.format_simple()));
        }
    };
    info!("Using storage backend: {}", storage.backend_name());

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    let app_storage = storage.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(build_cors())
            .wrap(Compress::default())
            .app_data(web::Data::new(app_storage.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .service(
                web::scope("/api")
                    .service(user_routes())
                    .service(qr_routes().wrap(BearerAuth::new(app_storage.clone()))),
            )
            .service(web::scope("/health").service(health_routes()))
            .service(redirect_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .bind(&bind_address)?
    .run()
    .await
}
