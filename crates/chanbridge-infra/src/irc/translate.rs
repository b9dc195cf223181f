//! Translation of raw IRC messages into session-level actions.
//!
//! Kept free of client state so it can be tested on parsed messages. The
//! driver handles the two actions that need the live client (joining after
//! registration and reading the tracked user list).

use ::irc::client::data::{AccessLevel, User};
use ::irc::client::prelude::{Command, Message, Response};
use chanbridge_types::event::ProtocolEvent;
use chanbridge_types::roster::{Participant, Role, RoleSet};

/// What the driver should do with one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Registration finished; report it and join the channel.
    Welcome,
    /// Forward an event to the session as-is.
    Event(ProtocolEvent),
    /// Rebuild the roster from the client's tracked user list.
    SyncRoster,
}

const CTCP_DELIM: char = '\u{1}';

/// Map one message to an action, or `None` when it does not concern the
/// target channel or the agent.
pub fn translate(message: &Message, channel: &str, own_nick: &str) -> Option<Inbound> {
    let source = message.source_nickname();
    match &message.command {
        Command::Response(Response::RPL_WELCOME, _) => Some(Inbound::Welcome),

        Command::Response(Response::RPL_ENDOFNAMES, args) => args
            .get(1)
            .filter(|chan| chan.eq_ignore_ascii_case(channel))
            .map(|_| Inbound::SyncRoster),

        Command::JOIN(chanlist, _, _) if names_channel(chanlist, channel) => {
            let nick = source?;
            if nick.eq_ignore_ascii_case(own_nick) {
                Some(Inbound::Event(ProtocolEvent::Joined))
            } else {
                Some(Inbound::Event(ProtocolEvent::RosterChanged {
                    participant: nick.to_string(),
                    roles: RoleSet::new(),
                }))
            }
        }

        Command::PART(chanlist, _) if names_channel(chanlist, channel) => {
            Some(Inbound::Event(ProtocolEvent::ParticipantLeft {
                nick: source?.to_string(),
            }))
        }

        Command::KICK(chanlist, user, _) if names_channel(chanlist, channel) => {
            Some(Inbound::Event(ProtocolEvent::ParticipantLeft { nick: user.clone() }))
        }

        Command::QUIT(_) => Some(Inbound::Event(ProtocolEvent::ParticipantLeft {
            nick: source?.to_string(),
        })),

        Command::NICK(new) => Some(Inbound::Event(ProtocolEvent::NickChanged {
            old: source?.to_string(),
            new: new.clone(),
        })),

        Command::ChannelMODE(chan, _) if chan.eq_ignore_ascii_case(channel) => {
            Some(Inbound::SyncRoster)
        }

        Command::PRIVMSG(msg_target, text) => {
            let is_private = if msg_target.eq_ignore_ascii_case(channel) {
                false
            } else if msg_target.eq_ignore_ascii_case(own_nick) {
                true
            } else {
                return None;
            };
            let nick = source?;
            let text = line_text(nick, text)?;
            Some(Inbound::Event(ProtocolEvent::LineReceived {
                sender: nick.to_string(),
                text,
                is_private,
            }))
        }

        Command::ERROR(reason) => Some(Inbound::Event(ProtocolEvent::Disconnected {
            reason: Some(reason.clone()),
        })),

        _ => None,
    }
}

fn names_channel(chanlist: &str, channel: &str) -> bool {
    chanlist
        .split(',')
        .any(|chan| chan.eq_ignore_ascii_case(channel))
}

/// Text to store for a PRIVMSG body. CTCP ACTION becomes `* nick text`;
/// every other CTCP request is dropped.
fn line_text(nick: &str, body: &str) -> Option<String> {
    let Some(ctcp) = body.strip_prefix(CTCP_DELIM) else {
        return Some(body.to_string());
    };
    let ctcp = ctcp.strip_suffix(CTCP_DELIM).unwrap_or(ctcp);
    ctcp.strip_prefix("ACTION ")
        .map(|action| format!("* {nick} {action}"))
}

fn role_for_level(level: &AccessLevel) -> Option<Role> {
    match level {
        AccessLevel::Owner | AccessLevel::Admin | AccessLevel::Oper => Some(Role::Operator),
        AccessLevel::HalfOp => Some(Role::HalfOperator),
        AccessLevel::Voice => Some(Role::Voiced),
        AccessLevel::Member => None,
    }
}

/// Convert the client's tracked users into roster participants.
pub fn participants(users: &[User]) -> Vec<Participant> {
    users
        .iter()
        .filter(|user| !user.get_nickname().is_empty())
        .map(|user| Participant {
            nick: user.get_nickname().to_string(),
            roles: user.access_levels().iter().filter_map(role_for_level).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANNEL: &str = "#bridge";
    const NICK: &str = "relay";

    fn parse(line: &str) -> Message {
        line.parse::<Message>().expect("valid irc line")
    }

    fn run(line: &str) -> Option<Inbound> {
        translate(&parse(line), CHANNEL, NICK)
    }

    #[test]
    fn welcome_triggers_join() {
        assert_eq!(
            run(":irc.example.net 001 relay :Welcome to the network"),
            Some(Inbound::Welcome)
        );
    }

    #[test]
    fn own_join_marks_joined() {
        assert_eq!(
            run(":relay!r@host JOIN #bridge"),
            Some(Inbound::Event(ProtocolEvent::Joined))
        );
    }

    #[test]
    fn other_join_adds_plain_participant() {
        assert_eq!(
            run(":alice!a@host JOIN #Bridge"),
            Some(Inbound::Event(ProtocolEvent::RosterChanged {
                participant: "alice".to_string(),
                roles: RoleSet::new(),
            }))
        );
    }

    #[test]
    fn join_elsewhere_is_ignored() {
        assert_eq!(run(":alice!a@host JOIN #other"), None);
    }

    #[test]
    fn channel_privmsg_is_public_line() {
        let Some(Inbound::Event(ProtocolEvent::LineReceived {
            sender,
            text,
            is_private,
        })) = run(":alice!a@host PRIVMSG #bridge :hello there")
        else {
            panic!("expected a line");
        };
        assert_eq!(sender, "alice");
        assert_eq!(text, "hello there");
        assert!(!is_private);
    }

    #[test]
    fn direct_privmsg_is_private_line() {
        let Some(Inbound::Event(ProtocolEvent::LineReceived { is_private, .. })) =
            run(":alice!a@host PRIVMSG relay :psst")
        else {
            panic!("expected a line");
        };
        assert!(is_private);
    }

    #[test]
    fn privmsg_to_other_target_is_ignored() {
        assert_eq!(run(":alice!a@host PRIVMSG #other :hi"), None);
    }

    #[test]
    fn ctcp_action_is_rendered_and_other_ctcp_dropped() {
        let Some(Inbound::Event(ProtocolEvent::LineReceived { text, .. })) =
            run(":alice!a@host PRIVMSG #bridge :\u{1}ACTION waves\u{1}")
        else {
            panic!("expected a line");
        };
        assert_eq!(text, "* alice waves");

        assert_eq!(run(":alice!a@host PRIVMSG relay :\u{1}VERSION\u{1}"), None);
    }

    #[test]
    fn part_kick_and_quit_remove_participants() {
        assert_eq!(
            run(":bob!b@host PART #bridge :later"),
            Some(Inbound::Event(ProtocolEvent::ParticipantLeft {
                nick: "bob".to_string()
            }))
        );
        assert_eq!(
            run(":op!o@host KICK #bridge carol :behave"),
            Some(Inbound::Event(ProtocolEvent::ParticipantLeft {
                nick: "carol".to_string()
            }))
        );
        assert_eq!(
            run(":dave!d@host QUIT :Ping timeout"),
            Some(Inbound::Event(ProtocolEvent::ParticipantLeft {
                nick: "dave".to_string()
            }))
        );
    }

    #[test]
    fn nick_change_is_forwarded() {
        assert_eq!(
            run(":alice!a@host NICK alicia"),
            Some(Inbound::Event(ProtocolEvent::NickChanged {
                old: "alice".to_string(),
                new: "alicia".to_string(),
            }))
        );
    }

    #[test]
    fn mode_and_end_of_names_sync_roster() {
        assert_eq!(run(":op!o@host MODE #bridge +o alice"), Some(Inbound::SyncRoster));
        assert_eq!(
            run(":irc.example.net 366 relay #bridge :End of /NAMES list."),
            Some(Inbound::SyncRoster)
        );
        assert_eq!(run(":irc.example.net 366 relay #other :End of /NAMES list."), None);
    }

    #[test]
    fn server_error_is_disconnect() {
        assert_eq!(
            run("ERROR :Closing Link: relay (Quit)"),
            Some(Inbound::Event(ProtocolEvent::Disconnected {
                reason: Some("Closing Link: relay (Quit)".to_string()),
            }))
        );
    }

    #[test]
    fn access_levels_map_to_roles() {
        assert_eq!(role_for_level(&AccessLevel::Owner), Some(Role::Operator));
        assert_eq!(role_for_level(&AccessLevel::Oper), Some(Role::Operator));
        assert_eq!(role_for_level(&AccessLevel::HalfOp), Some(Role::HalfOperator));
        assert_eq!(role_for_level(&AccessLevel::Voice), Some(Role::Voiced));
        assert_eq!(role_for_level(&AccessLevel::Member), None);
    }
}
