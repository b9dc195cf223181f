//! History polling handler.
//!
//! Endpoints:
//! - GET /api/v1/messages?start&end&last - Records in `[start, end)`

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use chanbridge_types::record::LogRecord;

use crate::http::error::AppError;
use crate::http::extractors::query::HistoryQuery;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::http::transform;
use crate::state::AppState;

/// GET /api/v1/messages - Read a slice of the channel history.
///
/// Out-of-window bounds are clamped, never rejected. Clients poll with
/// `start` set to the last index they saw plus one.
pub async fn get_messages(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<LogRecord>>>, AppError> {
    let meta = RequestMeta::start();
    let Query(query) = query?;
    query.check()?;

    let start = match query.last {
        Some(count) => Some(state.session.history_window().start_for_last(count)),
        None => query.start,
    };

    let records: Vec<LogRecord> = state
        .session
        .query_history(start, query.end)
        .into_iter()
        .map(|record| LogRecord {
            author: transform::apply(state.text_transform, &record.author),
            text: transform::apply(state.text_transform, &record.text),
            ..record
        })
        .collect();

    let next = match records.last() {
        Some(record) => record.index + 1,
        None => {
            let window = state.session.history_window();
            start.unwrap_or(0).clamp(window.base_index, window.next_index)
        }
    };

    let resp = ApiResponse::success(records, meta)
        .with_link("self", "/api/v1/messages")
        .with_link("next", &format!("/api/v1/messages?start={next}"));
    Ok(Json(resp))
}
