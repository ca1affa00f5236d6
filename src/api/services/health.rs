use actix_web::{HttpResponse, Responder, web};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::storage::SeaOrmStorage;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health Service
///
/// 直接打数据库，不经过业务层：k8s probes 要求快速、无副作用。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(storage: web::Data<Arc<SeaOrmStorage>>) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let ping = async {
            let db = storage.get_db();
            db.execute_raw(Statement::from_string(
                db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await
        };

        let (status, error) = match tokio::time::timeout(Duration::from_secs(5), ping).await {
            Ok(Ok(_)) => ("healthy", None),
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                ("unhealthy", Some(format!("database error: {}", e)))
            }
            Err(_) => {
                error!("Storage health check timeout");
                ("unhealthy", Some("timeout".to_string()))
            }
        };

        let body = HealthResponse {
            status,
            backend: storage.backend_name().to_string(),
            error,
        };

        info!(
            "Health check completed in {:?}, status: {}",
            start_time.elapsed(),
            status
        );

        let response_status = if body.error.is_none() {
            actix_web::http::StatusCode::OK
        } else {
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        };

        HttpResponse::build(response_status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(body)
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查，检查基本服务可用性
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
