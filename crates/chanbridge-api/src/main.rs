//! chanbridge CLI and HTTP API entry point.
//!
//! Binary name: `chanbridge`
//!
//! Parses CLI arguments, resolves configuration, then either prints it or
//! joins the configured IRC channel and serves the HTTP API.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use chanbridge_observe::tracing_setup;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need logging or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chanbridge", &mut std::io::stdout());
        return Ok(());
    }

    let (debug, otel) = match &cli.command {
        Commands::Serve(args) => (args.debug, args.otel),
        _ => (false, false),
    };
    let filter = tracing_setup::default_filter(cli.verbose, cli.quiet, debug);
    tracing_setup::init_tracing(filter, otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = match cli.command {
        Commands::Serve(args) => {
            let config = cli::config::resolve(cli.config.as_deref(), &args).await?;
            cli::serve::serve(config).await
        }
        Commands::Config { json, overrides } => {
            cli::config::show_config(cli.config.as_deref(), &overrides, json).await
        }
        Commands::Completions { .. } => Ok(()),
    };

    tracing_setup::shutdown_tracing();
    result
}
