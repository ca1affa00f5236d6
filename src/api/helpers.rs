//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::QrtrackError;

use super::types::ErrorBody;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: &T) -> HttpResponse {
    json_response(StatusCode::OK, data)
}

/// 从 QrtrackError 构建错误响应（自动映射 HTTP 状态码，校验错误带 field）
pub fn error_from_qrtrack(err: &QrtrackError) -> HttpResponse {
    let status = err.http_status();
    let body = match err.field() {
        Some(field) => ErrorBody::with_field(err.message(), field),
        // 服务端内部细节不外泄
        None if status == StatusCode::INTERNAL_SERVER_ERROR => {
            ErrorBody::message("Internal server error")
        }
        None => ErrorBody::message(err.message()),
    };
    json_response(status, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_400_with_field() {
        let resp = error_from_qrtrack(&QrtrackError::validation("title", "Title is required"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let resp = error_from_qrtrack(&QrtrackError::unauthorized(
            "Unauthorized: Invalid or missing token",
        ));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let resp = error_from_qrtrack(&QrtrackError::not_found("QR code not found"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let resp = error_from_qrtrack(&QrtrackError::database_operation("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
