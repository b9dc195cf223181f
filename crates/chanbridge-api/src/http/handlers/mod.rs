//! HTTP request handlers for the API.

pub mod history;
pub mod roster;
pub mod send;
pub mod session;
