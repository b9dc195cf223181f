//! HTTP adapter for the channel session.
//!
//! Axum-based API at `/api/v1/` with the envelope response format and CORS
//! support. Handlers only translate between HTTP and [`ChannelSession`]
//! calls.
//!
//! [`ChannelSession`]: chanbridge_core::session::ChannelSession

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
pub mod transform;
