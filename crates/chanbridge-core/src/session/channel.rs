//! The channel session shared by the IRC driver task and the HTTP handlers.
//!
//! The driver feeds protocol events in through [`ChannelSession::apply`];
//! request handlers read history and the roster and post lines through
//! [`ChannelSession::send_message`]. Lifecycle state and roster sit behind one
//! coarse mutex, the history log behind its own. When both are needed the
//! session lock is taken first. Neither lock is held while a line is handed
//! to the transmitter.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chanbridge_types::error::TransmitError;
use chanbridge_types::event::ProtocolEvent;
use chanbridge_types::record::{HistoryWindow, LogRecord};
use chanbridge_types::roster::{Participant, Role, RoleSet};
use chanbridge_types::session::{SessionState, SessionStatus, SessionTarget};
use tracing::{debug, info, warn};

use super::transmit::LineTransmitter;
use crate::history::BoundedIndexedLog;

/// Author prefix marking private (direct) messages in the shared log.
pub const PRIVATE_MESSAGE_PREFIX: &str = "pm: ";

/// One agent in one channel.
pub struct ChannelSession {
    target: SessionTarget,
    history: BoundedIndexedLog,
    transmitter: Arc<dyn LineTransmitter>,
    inner: Mutex<SessionInner>,
}

struct SessionInner {
    state: SessionState,
    /// Nick the server registered us under; starts as the configured one.
    nickname: String,
    roster: HashMap<String, RoleSet>,
}

/// The bare nick of an IRC prefix (`nick!user@host` -> `nick`).
pub fn bare_nick(sender: &str) -> &str {
    sender.split('!').next().unwrap_or(sender)
}

/// Author label stored in the log for an inbound line.
pub fn author_label(sender: &str, is_private: bool) -> String {
    let nick = bare_nick(sender);
    if is_private {
        format!("{PRIVATE_MESSAGE_PREFIX}{nick}")
    } else {
        nick.to_string()
    }
}

impl ChannelSession {
    /// Create a session in the `Connecting` state with an empty log and roster.
    pub fn new(
        target: SessionTarget,
        capacity: usize,
        transmitter: Arc<dyn LineTransmitter>,
    ) -> Self {
        let nickname = target.nickname.clone();
        Self {
            target,
            history: BoundedIndexedLog::new(capacity),
            transmitter,
            inner: Mutex::new(SessionInner {
                state: SessionState::Connecting,
                nickname,
                roster: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn target(&self) -> &SessionTarget {
        &self.target
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Nick currently used by the agent.
    pub fn nickname(&self) -> String {
        self.lock().nickname.clone()
    }

    // -----------------------------------------------------------------------
    // Protocol callbacks
    // -----------------------------------------------------------------------

    /// Dispatch one protocol event to the matching callback.
    pub fn apply(&self, event: ProtocolEvent) {
        debug!(kind = event.kind(), "protocol event");
        match event {
            ProtocolEvent::Connected { nickname } => self.on_connected(&nickname),
            ProtocolEvent::Joined => self.on_joined(),
            ProtocolEvent::LineReceived {
                sender,
                text,
                is_private,
            } => {
                self.on_inbound_message(&sender, &text, is_private);
            }
            ProtocolEvent::RosterChanged { participant, roles } => {
                self.on_roster_changed(&participant, roles)
            }
            ProtocolEvent::ParticipantLeft { nick } => self.on_participant_left(&nick),
            ProtocolEvent::NickChanged { old, new } => self.on_nick_changed(&old, &new),
            ProtocolEvent::RosterSynced { participants } => self.on_roster_synced(participants),
            ProtocolEvent::Disconnected { reason } => self.on_disconnected(reason.as_deref()),
        }
    }

    /// Registration finished. The session stays `Connecting` until the join.
    pub fn on_connected(&self, nickname: &str) {
        let mut inner = self.lock();
        if inner.state.is_terminal() {
            return;
        }
        inner.nickname = nickname.to_string();
        info!(
            server = %self.target.server,
            nickname,
            "registered with server"
        );
    }

    /// The agent entered the target channel.
    pub fn on_joined(&self) {
        let mut inner = self.lock();
        match inner.state {
            SessionState::Connecting => {
                inner.state = SessionState::Joined;
                info!(channel = %self.target.channel, "joined channel");
            }
            SessionState::Joined => {
                debug!(channel = %self.target.channel, "already joined");
            }
            SessionState::Disconnected => {
                warn!(channel = %self.target.channel, "join after disconnect ignored");
            }
        }
    }

    /// Record an inbound chat line and return its log index.
    ///
    /// Private lines are labelled `"pm: <nick>"` so readers of the shared log
    /// can tell them apart from channel traffic.
    pub fn on_inbound_message(&self, sender: &str, text: &str, is_private: bool) -> u64 {
        let author = author_label(sender, is_private);
        let index = self.history.append(author, text);
        debug!(index, sender = bare_nick(sender), is_private, "stored inbound line");
        index
    }

    /// Insert or replace one participant's role set.
    pub fn on_roster_changed(&self, participant: &str, roles: RoleSet) {
        self.lock().roster.insert(participant.to_string(), roles);
    }

    /// Remove a participant. If it is the agent itself, the roster is dropped.
    pub fn on_participant_left(&self, nick: &str) {
        let mut inner = self.lock();
        if nick == inner.nickname {
            warn!(channel = %self.target.channel, "agent left channel, clearing roster");
            inner.roster.clear();
        } else {
            inner.roster.remove(nick);
        }
    }

    /// Rename a roster entry, keeping its roles.
    pub fn on_nick_changed(&self, old: &str, new: &str) {
        let mut inner = self.lock();
        if old == inner.nickname {
            info!(old, new, "agent nick changed");
            inner.nickname = new.to_string();
        }
        if let Some(roles) = inner.roster.remove(old) {
            inner.roster.insert(new.to_string(), roles);
        }
    }

    /// Replace the whole roster.
    pub fn on_roster_synced(&self, participants: Vec<Participant>) {
        let mut inner = self.lock();
        inner.roster = participants
            .into_iter()
            .map(|p| (p.nick, p.roles))
            .collect();
        debug!(size = inner.roster.len(), "roster synced");
    }

    /// The connection dropped. Terminal: nothing reconnects.
    pub fn on_disconnected(&self, reason: Option<&str>) {
        let mut inner = self.lock();
        if inner.state.is_terminal() {
            return;
        }
        inner.state = SessionState::Disconnected;
        inner.roster.clear();
        warn!(
            server = %self.target.server,
            reason = reason.unwrap_or("connection closed"),
            "disconnected from server"
        );
    }

    // -----------------------------------------------------------------------
    // Request-side operations
    // -----------------------------------------------------------------------

    /// Send a line to the channel and record it under the agent's nick.
    ///
    /// Returns the log index of the stored line. Fails with
    /// [`TransmitError::NotConnected`] when the session is not joined, or with
    /// the protocol layer's error when it refused the line. Either the line
    /// is both transmitted and logged, or neither happens.
    pub fn try_send(&self, text: &str) -> Result<u64, TransmitError> {
        let (state, nickname) = {
            let inner = self.lock();
            (inner.state, inner.nickname.clone())
        };
        if !state.accepts_sends() {
            warn!(%state, "send refused: not joined");
            return Err(TransmitError::NotConnected);
        }

        if let Err(e) = self.transmitter.transmit(&self.target.channel, text) {
            warn!(error = %e, "send refused by protocol layer");
            return Err(e);
        }

        let index = self.history.append(nickname, text);
        debug!(index, "stored outbound line");
        Ok(index)
    }

    /// Boolean form of [`try_send`](Self::try_send).
    pub fn send_message(&self, text: &str) -> bool {
        self.try_send(text).is_ok()
    }

    /// History records with index in `[start, end)`; see [`BoundedIndexedLog::query`].
    pub fn query_history(&self, start: Option<u64>, end: Option<u64>) -> Vec<LogRecord> {
        self.history.query(start, end)
    }

    pub fn history_window(&self) -> HistoryWindow {
        self.history.window()
    }

    /// Every nick present in the channel. Empty unless joined.
    pub fn roster(&self) -> BTreeSet<String> {
        self.nicks_where(|_| true)
    }

    pub fn operators(&self) -> BTreeSet<String> {
        self.nicks_where(|roles| roles.contains(&Role::Operator))
    }

    pub fn half_operators(&self) -> BTreeSet<String> {
        self.nicks_where(|roles| roles.contains(&Role::HalfOperator))
    }

    pub fn voiced(&self) -> BTreeSet<String> {
        self.nicks_where(|roles| roles.contains(&Role::Voiced))
    }

    fn nicks_where(&self, keep: impl Fn(&RoleSet) -> bool) -> BTreeSet<String> {
        let inner = self.lock();
        if inner.state != SessionState::Joined {
            return BTreeSet::new();
        }
        inner
            .roster
            .iter()
            .filter(|(_, roles)| keep(roles))
            .map(|(nick, _)| nick.clone())
            .collect()
    }

    /// Snapshot for the status endpoint.
    pub fn status(&self) -> SessionStatus {
        let (state, nickname, roster_size) = {
            let inner = self.lock();
            let roster_size = if inner.state == SessionState::Joined {
                inner.roster.len()
            } else {
                0
            };
            (inner.state, inner.nickname.clone(), roster_size)
        };
        SessionStatus {
            state,
            server: self.target.server.clone(),
            port: self.target.port,
            channel: self.target.channel.clone(),
            nickname,
            roster_size,
            history: self.history.window(),
        }
    }
}

impl std::fmt::Debug for ChannelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ChannelSession")
            .field("server", &self.target.server)
            .field("channel", &self.target.channel)
            .field("state", &inner.state)
            .field("roster_size", &inner.roster.len())
            .field("history", &self.history)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::transmit::testing::RecordingTransmitter;
    use std::thread;

    fn target() -> SessionTarget {
        SessionTarget {
            server: "irc.example.net".to_string(),
            port: 6667,
            channel: "#bridge".to_string(),
            nickname: "relay".to_string(),
        }
    }

    fn session_with(transmitter: Arc<RecordingTransmitter>) -> ChannelSession {
        ChannelSession::new(target(), 5, transmitter)
    }

    fn joined_session() -> (ChannelSession, Arc<RecordingTransmitter>) {
        let transmitter = Arc::new(RecordingTransmitter::default());
        let session = session_with(Arc::clone(&transmitter));
        session.apply(ProtocolEvent::Connected {
            nickname: "relay".to_string(),
        });
        session.apply(ProtocolEvent::Joined);
        (session, transmitter)
    }

    fn roles(list: &[Role]) -> RoleSet {
        list.iter().copied().collect()
    }

    fn set(nicks: &[&str]) -> BTreeSet<String> {
        nicks.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn bare_nick_strips_user_and_host() {
        assert_eq!(bare_nick("alice!~a@example.org"), "alice");
        assert_eq!(bare_nick("alice"), "alice");
    }

    #[test]
    fn private_lines_get_marked_author() {
        let (session, _) = joined_session();
        session.apply(ProtocolEvent::LineReceived {
            sender: "alice!~a@example.org".to_string(),
            text: "psst".to_string(),
            is_private: true,
        });
        session.apply(ProtocolEvent::LineReceived {
            sender: "bob!~b@example.org".to_string(),
            text: "hello all".to_string(),
            is_private: false,
        });

        let records = session.query_history(None, None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, "pm: alice");
        assert_eq!(records[0].text, "psst");
        assert_eq!(records[1].author, "bob");
    }

    #[test]
    fn new_session_is_connecting_and_refuses_sends() {
        let transmitter = Arc::new(RecordingTransmitter::default());
        let session = session_with(Arc::clone(&transmitter));

        assert_eq!(session.state(), SessionState::Connecting);
        assert!(matches!(
            session.try_send("hello"),
            Err(TransmitError::NotConnected)
        ));
        assert!(session.query_history(None, None).is_empty());
        assert!(transmitter.lines().is_empty());
    }

    #[test]
    fn connected_alone_does_not_allow_sends() {
        let transmitter = Arc::new(RecordingTransmitter::default());
        let session = session_with(Arc::clone(&transmitter));
        session.apply(ProtocolEvent::Connected {
            nickname: "relay_".to_string(),
        });

        assert_eq!(session.state(), SessionState::Connecting);
        assert_eq!(session.nickname(), "relay_");
        assert!(!session.send_message("hello"));
    }

    #[test]
    fn joined_send_transmits_and_logs() {
        let (session, transmitter) = joined_session();

        assert_eq!(session.try_send("hi there").unwrap(), 0);
        assert!(session.send_message("second"));

        assert_eq!(
            transmitter.lines(),
            vec![
                ("#bridge".to_string(), "hi there".to_string()),
                ("#bridge".to_string(), "second".to_string()),
            ]
        );
        let records = session.query_history(None, None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, "relay");
        assert_eq!(records[1].text, "second");
    }

    #[test]
    fn send_after_disconnect_fails_without_side_effects() {
        let (session, transmitter) = joined_session();
        session.send_message("before");
        session.apply(ProtocolEvent::Disconnected {
            reason: Some("ping timeout".to_string()),
        });

        let len_before = session.history_window().len;
        assert!(!session.send_message("after"));
        assert_eq!(session.history_window().len, len_before);
        assert_eq!(transmitter.lines().len(), 1);
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn transmit_failure_leaves_log_untouched() {
        let transmitter = Arc::new(RecordingTransmitter::failing());
        let session = session_with(transmitter);
        session.on_joined();

        assert!(matches!(
            session.try_send("lost"),
            Err(TransmitError::Failed(_))
        ));
        assert!(session.query_history(None, None).is_empty());
    }

    #[test]
    fn disconnected_is_terminal() {
        let (session, _) = joined_session();
        session.on_disconnected(None);
        session.on_joined();
        session.on_connected("relay");
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn roster_filtered_by_role() {
        let (session, _) = joined_session();
        session.apply(ProtocolEvent::RosterSynced {
            participants: vec![
                Participant {
                    nick: "alice".to_string(),
                    roles: roles(&[Role::Operator, Role::Voiced]),
                },
                Participant {
                    nick: "bob".to_string(),
                    roles: roles(&[Role::HalfOperator]),
                },
                Participant {
                    nick: "carol".to_string(),
                    roles: roles(&[Role::Voiced]),
                },
                Participant {
                    nick: "dave".to_string(),
                    roles: RoleSet::new(),
                },
            ],
        });

        assert_eq!(session.roster(), set(&["alice", "bob", "carol", "dave"]));
        assert_eq!(session.operators(), set(&["alice"]));
        assert_eq!(session.half_operators(), set(&["bob"]));
        assert_eq!(session.voiced(), set(&["alice", "carol"]));
    }

    #[test]
    fn roster_empty_until_joined() {
        let transmitter = Arc::new(RecordingTransmitter::default());
        let session = session_with(transmitter);
        session.on_roster_changed("alice", roles(&[Role::Operator]));

        assert!(session.roster().is_empty());
        assert!(session.operators().is_empty());
        assert_eq!(session.status().roster_size, 0);
    }

    #[test]
    fn roster_cleared_on_disconnect() {
        let (session, _) = joined_session();
        session.on_roster_changed("alice", RoleSet::new());
        session.on_disconnected(None);
        assert!(session.roster().is_empty());
    }

    #[test]
    fn roster_incremental_updates() {
        let (session, _) = joined_session();
        session.on_roster_changed("alice", RoleSet::new());
        session.on_roster_changed("bob", RoleSet::new());
        session.on_roster_changed("alice", roles(&[Role::Operator]));
        assert_eq!(session.operators(), set(&["alice"]));

        session.on_nick_changed("alice", "alicia");
        assert_eq!(session.operators(), set(&["alicia"]));

        session.on_participant_left("bob");
        assert_eq!(session.roster(), set(&["alicia"]));
    }

    #[test]
    fn own_part_clears_roster() {
        let (session, _) = joined_session();
        session.on_roster_changed("alice", RoleSet::new());
        session.on_participant_left("relay");
        assert!(session.roster().is_empty());
    }

    #[test]
    fn own_nick_change_updates_outbound_author() {
        let (session, _) = joined_session();
        session.on_nick_changed("relay", "relay2");
        session.send_message("renamed");
        let records = session.query_history(None, None);
        assert_eq!(records[0].author, "relay2");
    }

    #[test]
    fn status_reports_target_and_window() {
        let (session, _) = joined_session();
        session.on_roster_changed("alice", RoleSet::new());
        for i in 0..7 {
            session.on_inbound_message("alice", &format!("line {i}"), false);
        }

        let status = session.status();
        assert_eq!(status.state, SessionState::Joined);
        assert_eq!(status.channel, "#bridge");
        assert_eq!(status.nickname, "relay");
        assert_eq!(status.roster_size, 1);
        assert_eq!(status.history.base_index, 2);
        assert_eq!(status.history.len, 5);
    }

    #[test]
    fn inbound_and_outbound_lines_share_one_index_space() {
        let (session, _) = joined_session();
        let session = Arc::new(session);
        let inbound = {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for i in 0..100 {
                    session.on_inbound_message("alice", &format!("in {i}"), false);
                }
            })
        };
        let outbound = {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for i in 0..100 {
                    assert!(session.send_message(&format!("out {i}")));
                }
            })
        };
        inbound.join().unwrap();
        outbound.join().unwrap();

        let window = session.history_window();
        assert_eq!(window.next_index, 200);
        let held = session.query_history(None, None);
        assert_eq!(held.len(), 5);
        assert_eq!(held.first().unwrap().index, 195);
    }
}
