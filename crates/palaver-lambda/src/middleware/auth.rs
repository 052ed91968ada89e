use axum::extract::{FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use lambda_http::RequestExt;
use palaver_auth::claims::{user_id_from_bearer, user_id_from_request_context};

use crate::error::ApiError;

/// Caller identification middleware.
///
/// Claims the API Gateway authorizer already verified win; otherwise the
/// `Authorization: Bearer <token>` header is decoded. On success, inserts
/// `AuthUser` into request extensions. Rejection happens in the
/// [`AuthUser`] extractor, after routing, so unknown paths and methods
/// still get 404 / 405.
pub async fn identify(mut req: Request, next: Next) -> Response {
    let sub = req
        .request_context_ref()
        .and_then(|ctx| serde_json::to_value(ctx).ok())
        .and_then(|ctx| user_id_from_request_context(&ctx))
        .or_else(|| {
            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok());
            user_id_from_bearer(header)
        });

    if let Some(sub) = sub {
        req.extensions_mut().insert(AuthUser { sub });
    }

    next.run(req).await
}

/// Authenticated user extracted from token claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}
