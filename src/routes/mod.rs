//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) - adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/cases", get(http::http_list_cases))
        .route("/api/v1/case", get(http::http_get_case))
        .route("/api/v1/mission", get(http::http_get_mission))
        .route("/api/v1/submit", post(http::http_post_submit))
        .route("/api/v1/hint", get(http::http_get_hint))
        .route("/api/v1/register", post(http::http_post_register))
        .route("/api/v1/profile", get(http::http_get_profile))
        .route("/api/v1/case/unlock", post(http::http_post_unlock_case))
        .route("/api/v1/case/complete", post(http::http_post_complete_case))
        .route("/api/v1/referral/check", post(http::http_post_referral_check))
        .route("/api/v1/referral/apply", post(http::http_post_referral_apply))
        .route("/api/v1/achievement", post(http::http_post_achievement))
        .route("/api/v1/evidence", post(http::http_post_evidence))
        .route(
            "/api/v1/admin/reset_achievements",
            post(http::http_post_reset_achievements),
        )
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
