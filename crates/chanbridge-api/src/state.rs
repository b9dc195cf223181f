//! Application state shared by all HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use chanbridge_core::session::ChannelSession;
use chanbridge_types::config::{HttpConfig, TextTransform};

/// Shared application state.
///
/// Cloned into every request; the session itself is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ChannelSession>,
    pub text_transform: TextTransform,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(session: Arc<ChannelSession>, http: &HttpConfig) -> Self {
        Self {
            session,
            text_transform: http.text_transform,
            request_timeout: Duration::from_secs(http.request_timeout_secs),
        }
    }
}
