//! Events delivered by the IRC protocol layer to a channel session.
//!
//! The driver task produces these in the order the connection delivers
//! them; the session consumes them through `ChannelSession::apply`.

use serde::{Deserialize, Serialize};

use crate::roster::{Participant, RoleSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// Registration with the server completed under `nickname`.
    Connected { nickname: String },

    /// The agent entered the target channel.
    Joined,

    /// A chat line arrived. `sender` may be a full `nick!user@host` prefix.
    LineReceived {
        sender: String,
        text: String,
        is_private: bool,
    },

    /// One participant joined or had its roles changed.
    RosterChanged {
        participant: String,
        roles: RoleSet,
    },

    /// A participant left the channel (part, kick, or quit).
    ParticipantLeft { nick: String },

    /// A participant changed nick.
    NickChanged { old: String, new: String },

    /// Full roster replacement, e.g. after a NAMES listing.
    RosterSynced { participants: Vec<Participant> },

    /// The connection is gone. Terminal.
    Disconnected { reason: Option<String> },
}

impl ProtocolEvent {
    /// Short name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolEvent::Connected { .. } => "connected",
            ProtocolEvent::Joined => "joined",
            ProtocolEvent::LineReceived { .. } => "line_received",
            ProtocolEvent::RosterChanged { .. } => "roster_changed",
            ProtocolEvent::ParticipantLeft { .. } => "participant_left",
            ProtocolEvent::NickChanged { .. } => "nick_changed",
            ProtocolEvent::RosterSynced { .. } => "roster_synced",
            ProtocolEvent::Disconnected { .. } => "disconnected",
        }
    }
}
