use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::middleware::auth::AuthUser;

/// Request logging middleware.
///
/// Logs every API request as a structured event using `tracing`, with the
/// caller when one was identified.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();
    let user_id = req.extensions().get::<AuthUser>().map(|u| u.sub.clone());

    let response = next.run(req).await;

    let status = response.status().as_u16();
    tracing::info!(
        method = %method,
        path = %uri,
        status = status,
        user_id = user_id.as_deref(),
        "api_request"
    );

    response
}
