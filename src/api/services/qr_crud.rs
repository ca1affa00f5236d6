//! QR code CRUD 操作（认证范围内）

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use crate::api::helpers::{error_from_qrtrack, json_response, success_response};
use crate::api::middleware::CallerIdentity;
use crate::api::types::{CreateQrBody, QrCodeResponse, StatsResponse, UpdateQrBody};
use crate::services::{CreateQrRequest, QrService, UpdateQrRequest};
use crate::storage::SeaOrmStorage;

/// 列出当前用户的所有二维码（新的在前）
pub async fn list_qr_codes(
    identity: web::ReqData<CallerIdentity>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    trace!("API: list QR codes for user {}", identity.user_id);

    let service = QrService::new(storage.get_ref().clone());
    let response = match service.list_qr_codes(&identity.user_id).await {
        Ok(qrs) => {
            let body: Vec<QrCodeResponse> =
                qrs.into_iter().map(QrCodeResponse::from_qr_code).collect();
            success_response(&body)
        }
        Err(e) => error_from_qrtrack(&e),
    };
    Ok(response)
}

/// 创建二维码
pub async fn create_qr_code(
    identity: web::ReqData<CallerIdentity>,
    body: web::Json<CreateQrBody>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    trace!("API: create QR code for user {}", identity.user_id);

    let body = body.into_inner();
    let service = QrService::new(storage.get_ref().clone());
    let response = match service
        .create_qr_code(
            &identity.user_id,
            CreateQrRequest {
                title: body.title,
                destination_url: body.destination_url,
            },
        )
        .await
    {
        Ok(created) => json_response(
            StatusCode::CREATED,
            &QrCodeResponse::from_qr_code(created),
        ),
        Err(e) => error_from_qrtrack(&e),
    };
    Ok(response)
}

/// 获取单个二维码及其全部扫码记录
pub async fn get_qr_code(
    identity: web::ReqData<CallerIdentity>,
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let service = QrService::new(storage.get_ref().clone());
    let response = match service.get_qr_code(&identity.user_id, id.into_inner()).await {
        Ok(detail) => success_response(&QrCodeResponse::with_scans(detail.qr_code, detail.scans)),
        Err(e) => error_from_qrtrack(&e),
    };
    Ok(response)
}

/// 部分更新 title / destinationUrl
pub async fn update_qr_code(
    identity: web::ReqData<CallerIdentity>,
    id: web::Path<i32>,
    body: web::Json<UpdateQrBody>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    let service = QrService::new(storage.get_ref().clone());
    let response = match service
        .update_qr_code(
            &identity.user_id,
            id.into_inner(),
            UpdateQrRequest {
                title: body.title,
                destination_url: body.destination_url,
            },
        )
        .await
    {
        Ok(updated) => success_response(&QrCodeResponse::from_qr_code(updated)),
        Err(e) => error_from_qrtrack(&e),
    };
    Ok(response)
}

/// 删除二维码及其扫码记录
pub async fn delete_qr_code(
    identity: web::ReqData<CallerIdentity>,
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let service = QrService::new(storage.get_ref().clone());
    let response = match service
        .delete_qr_code(&identity.user_id, id.into_inner())
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_from_qrtrack(&e),
    };
    Ok(response)
}

/// 扫码统计：时间倒序的原始扫码记录 + 按天汇总
pub async fn qr_code_stats(
    identity: web::ReqData<CallerIdentity>,
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let service = QrService::new(storage.get_ref().clone());
    let response = match service
        .qr_code_stats(&identity.user_id, id.into_inner())
        .await
    {
        Ok(stats) => success_response(&StatsResponse::new(stats.scans, stats.daily)),
        Err(e) => error_from_qrtrack(&e),
    };
    Ok(response)
}

/// QR CRUD 路由配置（调用方负责包上认证中间件）
pub fn qr_routes() -> actix_web::Scope {
    web::scope("/qrs")
        .route("", web::get().to(list_qr_codes))
        .route("", web::post().to(create_qr_code))
        .route("/{id}", web::get().to(get_qr_code))
        .route("/{id}", web::patch().to(update_qr_code))
        .route("/{id}", web::delete().to(delete_qr_code))
        .route("/{id}/stats", web::get().to(qr_code_stats))
}
