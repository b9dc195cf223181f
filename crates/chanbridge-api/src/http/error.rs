//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use chanbridge_types::error::TransmitError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// The session is not joined to its channel.
    NotConnected,
    /// Malformed request parameters or body.
    Validation(String),
    /// No route matches the request path.
    NotFound,
    Internal(String),
}

impl From<TransmitError> for AppError {
    fn from(e: TransmitError) -> Self {
        match e {
            TransmitError::NotConnected => AppError::NotConnected,
            TransmitError::Failed(reason) => AppError::Internal(reason),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(e: FormRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotConnected => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NOT_CONNECTED",
                "Agent is not joined to the channel".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "No such endpoint".to_string(),
            ),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(code, %message, "request failed");
        }
        (status, Json(ApiResponse::error(code, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::NotConnected.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Validation("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn transmit_errors_convert() {
        assert!(matches!(
            AppError::from(TransmitError::NotConnected),
            AppError::NotConnected
        ));
        assert!(matches!(
            AppError::from(TransmitError::Failed("closed".into())),
            AppError::Internal(msg) if msg == "closed"
        ));
    }
}
