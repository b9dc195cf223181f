//! Bridge configuration types.
//!
//! `BridgeConfig` mirrors `config.toml`: an `[irc]` table for the upstream
//! connection, an `[http]` table for the request adapter, and a `[history]`
//! table for the retention window. Every field has a default so an empty
//! file (or no file at all) is a valid configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub irc: IrcConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Upstream IRC connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrcConfig {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_irc_port")]
    pub port: u16,
    #[serde(default)]
    pub use_tls: bool,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// Defaults to the nickname when unset.
    #[serde(default)]
    pub username: Option<String>,
    /// Defaults to the nickname when unset.
    #[serde(default)]
    pub realname: Option<String>,
}

fn default_server() -> String {
    "irc.libera.chat".to_string()
}

fn default_irc_port() -> u16 {
    6667
}

fn default_channel() -> String {
    "#chanbridge".to_string()
}

fn default_nickname() -> String {
    "mcagent".to_string()
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            port: default_irc_port(),
            use_tls: false,
            channel: default_channel(),
            nickname: default_nickname(),
            username: None,
            realname: None,
        }
    }
}

/// HTTP request adapter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    /// Bind to loopback only.
    #[serde(default)]
    pub local_only: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub text_transform: TextTransform,
}

fn default_http_port() -> u16 {
    5001
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            local_only: false,
            request_timeout_secs: default_request_timeout_secs(),
            text_transform: TextTransform::default(),
        }
    }
}

impl HttpConfig {
    pub fn bind_host(&self) -> &'static str {
        if self.local_only { "127.0.0.1" } else { "0.0.0.0" }
    }
}

/// History retention settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    500
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Transform applied to message text by the HTTP layer before responding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTransform {
    None,
    CyrillicToLatin,
}

impl fmt::Display for TextTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextTransform::None => write!(f, "none"),
            TextTransform::CyrillicToLatin => write!(f, "cyrillic_to_latin"),
        }
    }
}

impl FromStr for TextTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "none" => Ok(TextTransform::None),
            "cyrillic_to_latin" => Ok(TextTransform::CyrillicToLatin),
            other => Err(format!("invalid text transform: '{other}'")),
        }
    }
}

impl Default for TextTransform {
    fn default() -> Self {
        TextTransform::None
    }
}

/// Whether `name` looks like an IRC channel (`#`, `&`, `+` or `!` prefix).
pub fn is_channel_name(name: &str) -> bool {
    name.len() > 1 && matches!(name.chars().next(), Some('#' | '&' | '+' | '!'))
}

impl BridgeConfig {
    /// Reject configurations the bridge cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.irc.server.trim().is_empty() {
            return Err(ConfigError::Invalid("irc.server must not be empty".to_string()));
        }
        if self.irc.nickname.trim().is_empty() || self.irc.nickname.contains(' ') {
            return Err(ConfigError::Invalid(format!(
                "irc.nickname '{}' is not a valid nick",
                self.irc.nickname
            )));
        }
        if !is_channel_name(&self.irc.channel) {
            return Err(ConfigError::Invalid(format!(
                "irc.channel '{}' is not a channel name",
                self.irc.channel
            )));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid(
                "history.capacity must be at least 1".to_string(),
            ));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
