//! Outbound message handler.
//!
//! Endpoints:
//! - POST /api/v1/sendmessage - Post `msg` (form body) to the channel

use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::{Form, Json};
use serde::Serialize;

use crate::http::error::AppError;
use crate::http::extractors::query::SendMessageForm;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SendResult {
    pub sent: bool,
    /// Log index the line was stored under.
    pub index: u64,
}

/// POST /api/v1/sendmessage - Send one line to the channel.
pub async fn send_message(
    State(state): State<AppState>,
    form: Result<Form<SendMessageForm>, FormRejection>,
) -> Result<Json<ApiResponse<SendResult>>, AppError> {
    let meta = RequestMeta::start();
    let Form(form) = form?;

    let msg = form.msg.unwrap_or_default();
    if msg.trim().is_empty() {
        return Err(AppError::Validation("Missing message parameter".to_string()));
    }
    if msg.contains(['\r', '\n', '\0']) {
        return Err(AppError::Validation(
            "Message must be a single line".to_string(),
        ));
    }

    let index = state.session.try_send(&msg)?;

    let resp = ApiResponse::success(SendResult { sent: true, index }, meta)
        .with_link("messages", &format!("/api/v1/messages?start={index}"));
    Ok(Json(resp))
}
