//! Effective configuration: config file plus command-line overrides.

use std::path::Path;

use anyhow::Result;
use chanbridge_infra::config::load_bridge_config;
use chanbridge_types::config::BridgeConfig;

use super::ServeArgs;

/// Apply command-line settings on top of the file configuration.
pub fn apply_overrides(config: &mut BridgeConfig, args: &ServeArgs) {
    if let Some(server) = &args.server {
        config.irc.server = server.clone();
    }
    if let Some(port) = args.port {
        config.irc.port = port;
    }
    if let Some(channel) = &args.channel {
        config.irc.channel = channel.clone();
    }
    if let Some(nick) = &args.nick {
        config.irc.nickname = nick.clone();
    }
    if args.tls {
        config.irc.use_tls = true;
    }
    if args.local || args.debug {
        config.http.local_only = true;
    }
    if let Some(port) = args.http_port {
        config.http.port = port;
    }
    if let Some(capacity) = args.capacity {
        config.history.capacity = capacity;
    }
    if let Some(transform) = args.text_transform {
        config.http.text_transform = transform;
    }
}

/// Load, override, and validate.
pub async fn resolve(config_path: Option<&Path>, args: &ServeArgs) -> Result<BridgeConfig> {
    let mut config = load_bridge_config(config_path).await?;
    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

/// `chanbridge config`: print the effective configuration.
pub async fn show_config(config_path: Option<&Path>, args: &ServeArgs, json: bool) -> Result<()> {
    let config = resolve(config_path, args).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", toml::to_string_pretty(&config)?);
    }
    Ok(())
}
