//! Public scan endpoint: resolve a slug, record the scan, redirect

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::analytics::classify_device;
use crate::config::get_config;
use crate::errors::QrtrackError;
use crate::storage::{ScanEvent, SeaOrmStorage};
use crate::utils::is_valid_slug;

pub struct RedirectService {}

impl RedirectService {
    #[instrument(skip(storage), fields(slug = %slug))]
    pub async fn handle_redirect(
        req: HttpRequest,
        slug: web::Path<String>,
        storage: web::Data<Arc<SeaOrmStorage>>,
    ) -> impl Responder {
        let slug = slug.into_inner();

        // 非法 slug 直接 404，不打扰存储层
        if !is_valid_slug(&slug) {
            debug!("Rejected malformed slug");
            return Self::not_found_response();
        }

        let qr = match storage.resolve_slug(&slug).await {
            Ok(Some(qr)) => qr,
            Ok(None) => {
                debug!("Slug not found: {}", slug);
                return Self::not_found_response();
            }
            Err(e) => {
                error!("Slug lookup failed: {}", e);
                return Self::server_error_response();
            }
        };

        let event = Self::scan_event_from_request(&req);

        // 扫码记录与计数递增在同一事务内，失败则不重定向
        match storage.record_scan(qr.id, &event).await {
            Ok(_) => HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                .insert_header(("Location", qr.destination_url.as_str()))
                .finish(),
            Err(QrtrackError::NotFound(_)) => {
                // 二维码在查找和记录之间被删除
                debug!("QR code deleted mid-scan: {}", slug);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Failed to record scan: {}", e);
                Self::server_error_response()
            }
        }
    }

    /// 从请求头收集扫码上下文（UA、设备类别、国家）
    fn scan_event_from_request(req: &HttpRequest) -> ScanEvent {
        let user_agent = req
            .headers()
            .get("User-Agent")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let device = classify_device(user_agent.as_deref());

        let country_header = &get_config().auth.country_header;
        let country = req
            .headers()
            .get(country_header.as_str())
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_uppercase())
            .filter(|s| s.len() == 2 && s.bytes().all(|b| b.is_ascii_uppercase()));

        ScanEvent {
            user_agent,
            device,
            country,
        }
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60")) // 缓存404
            .body("Not Found")
    }

    fn server_error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error")
    }
}

/// 扫码路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/s")
        .route("/{slug}", web::get().to(RedirectService::handle_redirect))
        .route("/{slug}", web::head().to(RedirectService::handle_redirect))
}
