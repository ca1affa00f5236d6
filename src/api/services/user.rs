//! Current-user endpoint（可选认证）

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{error, trace};

use crate::api::helpers::success_response;
use crate::api::jwt::get_jwt_service;
use crate::api::types::UserResponse;
use crate::storage::SeaOrmStorage;

pub struct UserService;

impl UserService {
    /// GET /api/user
    ///
    /// 带有效令牌时返回（已刷新的）用户档案，否则返回 200 + JSON null，
    /// 前端据此判断登录态。
    pub async fn current_user(
        req: HttpRequest,
        storage: web::Data<Arc<SeaOrmStorage>>,
    ) -> impl Responder {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));

        let Some(token) = token else {
            trace!("Anonymous /api/user request");
            return success_response(&serde_json::Value::Null);
        };

        let claims = match get_jwt_service().validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                trace!("Token rejected on /api/user: {}", e);
                return success_response(&serde_json::Value::Null);
            }
        };

        match storage
            .upsert_user(&claims.sub, claims.email, claims.name)
            .await
        {
            Ok(user) => success_response(&UserResponse::from_user(user)),
            Err(e) => {
                error!("Failed to upsert user profile: {}", e);
                HttpResponse::InternalServerError()
                    .append_header(("Content-Type", "application/json; charset=utf-8"))
                    .json(crate::api::types::ErrorBody::message("Internal server error"))
            }
        }
    }
}

/// 用户路由配置
pub fn user_routes() -> actix_web::Scope {
    web::scope("/user").route("", web::get().to(UserService::current_user))
}
