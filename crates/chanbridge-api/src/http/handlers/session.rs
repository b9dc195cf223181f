//! Session status handlers.
//!
//! Endpoints:
//! - GET /            - Banner
//! - GET /api/v1/status - Lifecycle state, target and history window

use axum::Json;
use axum::extract::State;

use chanbridge_types::session::SessionStatus;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::state::AppState;

pub const BANNER: &str = "You were never here.";

/// GET / - Plain banner, no envelope.
pub async fn banner() -> &'static str {
    BANNER
}

/// GET /api/v1/status - Snapshot of the session.
pub async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionStatus>>, AppError> {
    let meta = RequestMeta::start();
    let status = state.session.status();
    let resp = ApiResponse::success(status, meta)
        .with_link("self", "/api/v1/status")
        .with_link("messages", "/api/v1/messages")
        .with_link("users", "/api/v1/users");
    Ok(Json(resp))
}

/// Fallback for unmatched paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{connecting_state, joined_state};
    use chanbridge_types::config::TextTransform;
    use chanbridge_types::session::SessionState;

    #[tokio::test]
    async fn status_reports_state_and_window() {
        let (state, _) = connecting_state(TextTransform::None);
        let Json(resp) = get_status(State(state.clone())).await.unwrap();
        let status = resp.data.unwrap();
        assert_eq!(status.state, SessionState::Connecting);
        assert_eq!(status.channel, "#bridge");

        let (state, _) = joined_state(TextTransform::None);
        state.session.on_inbound_message("alice", "hi", false);
        let Json(resp) = get_status(State(state)).await.unwrap();
        let status = resp.data.unwrap();
        assert_eq!(status.state, SessionState::Joined);
        assert_eq!(status.history.next_index, 1);
        assert_eq!(status.history.capacity, 5);
    }

    #[tokio::test]
    async fn banner_text() {
        assert_eq!(banner().await, "You were never here.");
    }
}
