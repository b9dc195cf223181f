//! Roster handlers.
//!
//! Endpoints:
//! - GET /api/v1/users   - Every nick in the channel
//! - GET /api/v1/ops     - Operators
//! - GET /api/v1/halfops - Half-operators
//! - GET /api/v1/voiced  - Voiced participants
//!
//! All lists are sorted and empty while the session is not joined.

use std::collections::BTreeSet;

use axum::Json;
use axum::extract::State;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::state::AppState;

type NickList = Json<ApiResponse<Vec<String>>>;

fn nick_list(nicks: BTreeSet<String>, meta: RequestMeta, path: &str) -> NickList {
    Json(ApiResponse::success(nicks.into_iter().collect(), meta).with_link("self", path))
}

/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> Result<NickList, AppError> {
    let meta = RequestMeta::start();
    Ok(nick_list(state.session.roster(), meta, "/api/v1/users"))
}

/// GET /api/v1/ops
pub async fn list_ops(State(state): State<AppState>) -> Result<NickList, AppError> {
    let meta = RequestMeta::start();
    Ok(nick_list(state.session.operators(), meta, "/api/v1/ops"))
}

/// GET /api/v1/halfops
pub async fn list_halfops(State(state): State<AppState>) -> Result<NickList, AppError> {
    let meta = RequestMeta::start();
    Ok(nick_list(state.session.half_operators(), meta, "/api/v1/halfops"))
}

/// GET /api/v1/voiced
pub async fn list_voiced(State(state): State<AppState>) -> Result<NickList, AppError> {
    let meta = RequestMeta::start();
    Ok(nick_list(state.session.voiced(), meta, "/api/v1/voiced"))
}
