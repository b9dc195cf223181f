//! Shared domain types for chanbridge.
//!
//! This crate contains the types passed between the history log, the channel
//! session, the IRC driver, and the HTTP layer: log records, roster roles,
//! session lifecycle, protocol events, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod record;
pub mod roster;
pub mod session;
