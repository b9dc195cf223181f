//! Channel session lifecycle types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::HistoryWindow;

/// Connection lifecycle of a channel session.
///
/// - Connecting: initial; sends are refused, roster is empty
/// - Joined: the agent is in the target channel; sends go through
/// - Disconnected: terminal; the connection is gone and is never re-established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Connecting,
    Joined,
    Disconnected,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Disconnected)
    }

    pub fn accepts_sends(&self) -> bool {
        matches!(self, SessionState::Joined)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Joined => write!(f, "joined"),
            SessionState::Disconnected => write!(f, "disconnected"),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Connecting
    }
}

/// Where a session connects and who it connects as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTarget {
    pub server: String,
    pub port: u16,
    pub channel: String,
    pub nickname: String,
}

/// Point-in-time view of a session, served by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub server: String,
    pub port: u16,
    pub channel: String,
    pub nickname: String,
    pub roster_size: usize,
    pub history: HistoryWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_defaults_to_connecting() {
        assert_eq!(SessionState::default(), SessionState::Connecting);
    }

    #[test]
    fn test_only_joined_accepts_sends() {
        assert!(!SessionState::Connecting.accepts_sends());
        assert!(SessionState::Joined.accepts_sends());
        assert!(!SessionState::Disconnected.accepts_sends());
    }

    #[test]
    fn test_only_disconnected_is_terminal() {
        assert!(!SessionState::Connecting.is_terminal());
        assert!(!SessionState::Joined.is_terminal());
        assert!(SessionState::Disconnected.is_terminal());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        let json = serde_json::to_string(&SessionState::Disconnected).unwrap();
        assert_eq!(json, "\"disconnected\"");
        assert_eq!(SessionState::Joined.to_string(), "joined");
    }
}
