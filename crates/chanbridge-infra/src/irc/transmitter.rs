//! `LineTransmitter` over the `irc` client's outgoing sender.

use ::irc::client::Sender;
use ::irc::error::Error as IrcError;
use chanbridge_core::session::LineTransmitter;
use chanbridge_types::error::TransmitError;

/// Enqueues PRIVMSG lines on the client's outgoing queue.
///
/// The queue is unbounded and flushed by the driver task, so `transmit`
/// never waits on the network.
#[derive(Clone)]
pub struct IrcTransmitter {
    sender: Sender,
}

impl IrcTransmitter {
    pub fn new(sender: Sender) -> Self {
        Self { sender }
    }
}

/// Reject text that would break out of a single PRIVMSG line.
pub fn check_line(text: &str) -> Result<(), TransmitError> {
    if text.contains(['\r', '\n', '\0']) {
        return Err(TransmitError::Failed(
            "line contains a line break or NUL".to_string(),
        ));
    }
    Ok(())
}

impl LineTransmitter for IrcTransmitter {
    fn transmit(&self, target: &str, text: &str) -> Result<(), TransmitError> {
        check_line(text)?;
        self.sender.send_privmsg(target, text).map_err(transmit_error)
    }
}

/// A closed outgoing queue means the connection task is gone.
fn transmit_error(e: IrcError) -> TransmitError {
    match e {
        IrcError::AsyncChannelClosed => TransmitError::NotConnected,
        other => TransmitError::Failed(other.to_string()),
    }
}

impl std::fmt::Debug for IrcTransmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IrcTransmitter").finish_non_exhaustive()
    }
}
