//! Infrastructure implementations for chanbridge.
//!
//! - `irc` -- the protocol collaborator: an `irc` crate client driven on a
//!   tokio task, translating server messages into `ProtocolEvent`s and
//!   implementing `LineTransmitter` over the client's sender
//! - `config` -- `config.toml` discovery and loading

pub mod config;
pub mod irc;
