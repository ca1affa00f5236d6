use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{error, info, trace};

use crate::api::helpers::error_from_qrtrack;
use crate::api::jwt::{IdentityClaims, get_jwt_service};
use crate::api::types::ErrorBody;
use crate::errors::QrtrackError;
use crate::storage::SeaOrmStorage;

/// 已认证的调用者身份，由认证中间件写入请求扩展
#[derive(Clone, Debug)]
pub struct CallerIdentity {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl From<IdentityClaims> for CallerIdentity {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            display_name: claims.name,
        }
    }
}

/// Bearer token authentication middleware
///
/// Validates the identity token on every request under the wrapped scope,
/// refreshes the local user profile from the claims, and injects a
/// [`CallerIdentity`] into the request extensions.
#[derive(Clone)]
pub struct BearerAuth {
    storage: Arc<SeaOrmStorage>,
}

impl BearerAuth {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            storage: self.storage.clone(),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    storage: Arc<SeaOrmStorage>,
}

impl<S, B> BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Authentication failed - invalid or missing token");
        let err = QrtrackError::unauthorized("Unauthorized: Invalid or missing token");
        req.into_response(error_from_qrtrack(&err).map_into_right_body())
    }

    /// Handle profile upsert failures
    fn handle_internal_error(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::InternalServerError()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ErrorBody::message("Internal server error"))
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    }

    /// 验证 Bearer token，返回其中的身份 claims
    fn validate_bearer_token(token: &str) -> Option<IdentityClaims> {
        let jwt_service = get_jwt_service();
        match jwt_service.validate_token(token) {
            Ok(claims) => {
                trace!("Bearer token validation successful");
                Some(claims)
            }
            Err(e) => {
                info!("Bearer token validation failed: {}", e);
                None
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let storage = self.storage.clone();

        Box::pin(async move {
            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            let Some(claims) =
                Self::extract_bearer_token(&req).and_then(|t| Self::validate_bearer_token(&t))
            else {
                return Ok(Self::handle_unauthorized(req));
            };

            let identity = CallerIdentity::from(claims);

            // 每次认证都刷新本地用户档案，保证外键始终可解析
            if let Err(e) = storage
                .upsert_user(
                    &identity.user_id,
                    identity.email.clone(),
                    identity.display_name.clone(),
                )
                .await
            {
                error!("Failed to upsert user profile: {}", e);
                return Ok(Self::handle_internal_error(req));
            }

            req.extensions_mut().insert(identity);
            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
