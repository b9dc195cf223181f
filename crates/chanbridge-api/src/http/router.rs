//! Axum router configuration with middleware.
//!
//! API routes live under `/api/v1/`; `/` and `/health` stay at the root.
//! Middleware: CORS, tracing, request timeout.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(handlers::session::get_status))
        // History
        .route("/messages", get(handlers::history::get_messages))
        .route("/sendmessage", post(handlers::send::send_message))
        // Roster
        .route("/users", get(handlers::roster::list_users))
        .route("/ops", get(handlers::roster::list_ops))
        .route("/halfops", get(handlers::roster::list_halfops))
        .route("/voiced", get(handlers::roster::list_voiced));

    let timeout = TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, state.request_timeout);

    Router::new()
        .route("/", get(handlers::session::banner))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .fallback(handlers::session::not_found)
        .layer(timeout)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::joined_state;
    use chanbridge_types::config::TextTransform;

    #[tokio::test]
    async fn health_reports_version() {
        let axum::Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn router_builds() {
        let (state, _) = joined_state(TextTransform::None);
        let _router = build_router(state);
    }
}
