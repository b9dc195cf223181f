//! Channel session: lifecycle state, roster cache, and the outbound seam.
//!
//! - `channel` -- `ChannelSession`, the object shared by the IRC driver task
//!   and the HTTP handlers
//! - `transmit` -- `LineTransmitter` trait for handing lines to the protocol layer

pub mod channel;
pub mod transmit;

pub use channel::ChannelSession;
pub use transmit::LineTransmitter;
