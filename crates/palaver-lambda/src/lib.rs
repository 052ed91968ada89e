//! palaver-lambda
//!
//! HTTP surface of the Palaver chat backend: streamed and blocking chat,
//! conversation history, and file text extraction.

pub mod config;
pub mod error;
pub mod middleware;
pub mod relay;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::HeaderName;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::middleware::preflight::{ALLOWED_HEADERS, ALLOWED_METHODS};
use crate::state::AppState;

fn cors_layer(state: &AppState) -> CorsLayer {
    let origin = match &state.config.allowed_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

/// The full router. Identification runs for every request; handlers that
/// need a caller reject anonymous ones themselves. Bare `OPTIONS` is answered
/// before the CORS layer sees it; real preflights go on to CORS.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        .route("/chat", post(routes::chat::chat))
        .route("/chat/sync", post(routes::chat::chat_sync))
        .route(
            "/conversations",
            get(routes::conversations::list_conversations),
        )
        .route(
            "/conversations/{id}",
            get(routes::conversations::get_conversation)
                .delete(routes::conversations::delete_conversation),
        )
        .route("/files/extract", post(routes::files::extract_file))
        .method_not_allowed_fallback(routes::method_not_allowed)
        .fallback(routes::not_found)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(axum_mw::from_fn(middleware::auth::identify))
        .layer(cors)
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::preflight::answer_options,
        ))
        .with_state(state)
}
