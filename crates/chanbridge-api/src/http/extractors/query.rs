//! Query and form parameters for the API endpoints.

use serde::Deserialize;

use crate::http::error::AppError;

/// Query parameters for `GET /messages`.
///
/// `start` and `end` are absolute log indices; `last` asks for the newest
/// N records and cannot be combined with `start`.
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub last: Option<u64>,
}

impl HistoryQuery {
    pub fn check(&self) -> Result<(), AppError> {
        if self.start.is_some() && self.last.is_some() {
            return Err(AppError::Validation(
                "'start' and 'last' cannot be combined".to_string(),
            ));
        }
        Ok(())
    }
}

/// Form body for `POST /sendmessage`.
#[derive(Debug, Deserialize, Default)]
pub struct SendMessageForm {
    pub msg: Option<String>,
}
