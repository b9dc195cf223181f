//! Outbound seam between the channel session and the protocol layer.

use chanbridge_types::error::TransmitError;

/// Hands a single line to the protocol layer for delivery.
///
/// Implementations must not block on network round-trips: the call either
/// enqueues the line or reports an immediate failure. Delivery itself is
/// fire-and-forget.
pub trait LineTransmitter: Send + Sync {
    fn transmit(&self, target: &str, text: &str) -> Result<(), TransmitError>;
}
