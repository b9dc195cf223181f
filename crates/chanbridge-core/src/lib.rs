//! Channel history and session state for chanbridge.
//!
//! This crate holds the only shared mutable state in the bridge: the bounded
//! history log and the channel session wrapped around it. It depends only on
//! `chanbridge-types` -- never on `chanbridge-infra`, the IRC client, or the
//! HTTP stack. The protocol layer reaches it through `ProtocolEvent`s and the
//! `LineTransmitter` trait.

pub mod history;
pub mod session;
