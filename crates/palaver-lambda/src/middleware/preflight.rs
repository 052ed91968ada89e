use axum::Json;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_REQUEST_METHOD,
};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::state::AppState;

pub const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

pub const ALLOWED_HEADERS: [&str; 5] = [
    "content-type",
    "x-amz-date",
    "authorization",
    "x-api-key",
    "x-amz-security-token",
];

/// Answer bare `OPTIONS` requests (no `Access-Control-Request-Method`) on any
/// path. Sits outside the CORS layer, which would otherwise treat every
/// `OPTIONS` as a preflight and reply with an empty body.
pub async fn answer_options(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let bare = req.method() == Method::OPTIONS
        && !req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD);
    if !bare {
        return next.run(req).await;
    }

    let origin = state
        .config
        .allowed_origin
        .clone()
        .unwrap_or(HeaderValue::from_static("*"));

    let mut response = Json(json!({ "message": "OK" })).into_response();
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,DELETE,OPTIONS"),
    );
    if let Ok(allowed) = HeaderValue::from_str(&ALLOWED_HEADERS.join(",")) {
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allowed);
    }
    response
}
