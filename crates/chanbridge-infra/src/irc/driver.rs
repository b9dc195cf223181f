//! IRC connection driver.
//!
//! `IrcDriver` owns the `irc` client. `run` polls the client stream on the
//! calling task (usually a dedicated `tokio::spawn`), translates each message,
//! and feeds the resulting events into the channel session. Polling the
//! stream also flushes the outgoing queue that `IrcTransmitter` writes to.
//!
//! The driver never reconnects: when the stream ends or errors, the session
//! is marked disconnected and `run` returns.

use std::sync::Arc;
use std::time::Duration;

use ::irc::client::Client;
use ::irc::client::data::Config;
use ::irc::client::prelude::{ChannelExt, Command, Message, Response};
use chanbridge_core::session::ChannelSession;
use chanbridge_types::config::IrcConfig;
use chanbridge_types::error::DriverError;
use chanbridge_types::event::ProtocolEvent;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::translate::{self, Inbound};
use super::transmitter::IrcTransmitter;

/// How long to keep flushing after sending QUIT on shutdown.
const QUIT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

const QUIT_MESSAGE: &str = "bridge shutting down";

/// Build the `irc` client configuration from the bridge settings.
///
/// Channels are left empty: the driver joins the target itself once
/// registration completes.
pub fn client_config(config: &IrcConfig) -> Config {
    let nickname = config.nickname.clone();
    Config {
        alt_nicks: vec![format!("{nickname}_"), format!("{nickname}__")],
        username: Some(config.username.clone().unwrap_or_else(|| nickname.clone())),
        realname: Some(config.realname.clone().unwrap_or_else(|| nickname.clone())),
        nickname: Some(nickname),
        server: Some(config.server.clone()),
        port: Some(config.port),
        use_tls: Some(config.use_tls),
        channels: Vec::new(),
        ..Config::default()
    }
}

/// Drives one IRC connection for one channel session.
pub struct IrcDriver {
    client: Client,
    channel: String,
}

impl IrcDriver {
    /// Open the connection and send the registration burst.
    pub async fn connect(config: &IrcConfig) -> Result<Self, DriverError> {
        info!(server = %config.server, port = config.port, tls = config.use_tls, "connecting to irc server");
        Self::with_client_config(client_config(config), &config.channel).await
    }

    /// Connect with a prepared `irc` client configuration.
    pub async fn with_client_config(config: Config, channel: &str) -> Result<Self, DriverError> {
        let client = Client::from_config(config)
            .await
            .map_err(|e| DriverError::Client(e.to_string()))?;
        client
            .identify()
            .map_err(|e| DriverError::Client(e.to_string()))?;
        Ok(Self {
            client,
            channel: channel.to_string(),
        })
    }

    /// Transmitter writing into this connection's outgoing queue.
    pub fn transmitter(&self) -> IrcTransmitter {
        IrcTransmitter::new(self.client.sender())
    }

    /// Process the connection until it closes or `cancel` fires.
    ///
    /// Always leaves the session in the `Disconnected` state on return.
    pub async fn run(mut self, session: Arc<ChannelSession>, cancel: CancellationToken) {
        let mut stream = match self.client.stream() {
            Ok(stream) => stream,
            Err(e) => {
                session.apply(ProtocolEvent::Disconnected {
                    reason: Some(e.to_string()),
                });
                return;
            }
        };

        let reason = loop {
            tokio::select! {
                _ = cancel.cancelled() => break None,
                next = stream.next() => match next {
                    Some(Ok(message)) => self.handle(&message, &session),
                    Some(Err(e)) => {
                        warn!(error = %e, "irc stream error");
                        break Some(e.to_string());
                    }
                    None => break None,
                },
            }
        };

        let reason = if cancel.is_cancelled() {
            if let Err(e) = self.client.send_quit(QUIT_MESSAGE) {
                debug!(error = %e, "failed to queue QUIT");
            }
            // Keep polling so the QUIT actually reaches the server.
            let _ = tokio::time::timeout(QUIT_FLUSH_TIMEOUT, async {
                while let Some(Ok(_)) = stream.next().await {}
            })
            .await;
            Some("shutdown requested".to_string())
        } else {
            reason
        };

        session.apply(ProtocolEvent::Disconnected { reason });
    }

    fn handle(&self, message: &Message, session: &ChannelSession) {
        // The client only knows the nicks it asked for; server-side renames
        // are tracked by the session.
        let own_nick = session.nickname();
        match translate::translate(message, &self.channel, &own_nick) {
            Some(Inbound::Welcome) => {
                session.apply(ProtocolEvent::Connected {
                    nickname: welcome_nick(message)
                        .unwrap_or_else(|| self.client.current_nickname())
                        .to_string(),
                });
                self.join_target();
            }
            Some(Inbound::SyncRoster) => {
                let users = self.client.list_users(&self.channel).unwrap_or_default();
                session.apply(ProtocolEvent::RosterSynced {
                    participants: translate::participants(&users),
                });
            }
            Some(Inbound::Event(event)) => session.apply(event),
            None => {}
        }
    }

    fn join_target(&self) {
        if !self.channel.as_str().is_channel_name() {
            warn!(channel = %self.channel, "target is not a channel name, not joining");
            return;
        }
        match self.client.send_join(&self.channel) {
            Ok(()) => info!(channel = %self.channel, "joining channel"),
            Err(e) => warn!(channel = %self.channel, error = %e, "failed to queue JOIN"),
        }
    }
}

/// Nick the server registered us under: the first parameter of 001.
fn welcome_nick(message: &Message) -> Option<&str> {
    match &message.command {
        Command::Response(Response::RPL_WELCOME, args) => {
            args.first().map(String::as_str).filter(|nick| !nick.is_empty())
        }
        _ => None,
    }
}

impl std::fmt::Debug for IrcDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IrcDriver")
            .field("channel", &self.channel)
            .field("nickname", &self.client.current_nickname())
            .finish()
    }
}
