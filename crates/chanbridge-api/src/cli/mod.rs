//! CLI command definitions for the `chanbridge` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod config;
pub mod serve;

use std::path::PathBuf;

use chanbridge_types::config::TextTransform;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Bridge one IRC channel to a small HTTP API.
#[derive(Parser)]
#[command(name = "chanbridge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, global = true, env = "CHANBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to IRC and serve the HTTP API until the connection drops.
    Serve(ServeArgs),

    /// Print the effective configuration.
    Config {
        /// Output JSON instead of TOML.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        overrides: ServeArgs,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Connection and server settings. Each one overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// IRC server, e.g. irc.libera.chat
    pub server: Option<String>,

    /// IRC server port, e.g. 6667
    pub port: Option<u16>,

    /// IRC channel, e.g. '#test'
    pub channel: Option<String>,

    /// IRC agent nick
    #[arg(long, alias = "nickname")]
    pub nick: Option<String>,

    /// Connect with TLS.
    #[arg(long)]
    pub tls: bool,

    /// Make the HTTP server only visible to localhost.
    #[arg(long)]
    pub local: bool,

    /// Debug mode: forces --local and debug logging.
    #[arg(long)]
    pub debug: bool,

    /// HTTP listen port.
    #[arg(long)]
    pub http_port: Option<u16>,

    /// Number of history lines kept in memory.
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Transform applied to /messages output: none or cyrillic_to_latin.
    #[arg(long)]
    pub text_transform: Option<TextTransform>,

    /// Also export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long)]
    pub otel: bool,
}
