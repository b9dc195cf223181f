//! `chanbridge serve`: run the IRC session and the HTTP API side by side.
//!
//! The IRC driver runs on its own task and feeds the shared session; axum
//! serves requests against the same session. The process stops on Ctrl+C,
//! on SIGTERM, or when the IRC connection is lost. There is no reconnect.

use std::sync::Arc;

use anyhow::Result;
use chanbridge_core::session::ChannelSession;
use chanbridge_infra::irc::IrcDriver;
use chanbridge_types::config::{BridgeConfig, TextTransform};
use chanbridge_types::session::SessionTarget;
use console::style;
use tokio_util::sync::CancellationToken;

use crate::http;
use crate::state::AppState;

pub async fn serve(config: BridgeConfig) -> Result<()> {
    let driver = IrcDriver::connect(&config.irc).await?;

    let target = SessionTarget {
        server: config.irc.server.clone(),
        port: config.irc.port,
        channel: config.irc.channel.clone(),
        nickname: config.irc.nickname.clone(),
    };
    let session = Arc::new(ChannelSession::new(
        target,
        config.history.capacity,
        Arc::new(driver.transmitter()),
    ));

    let cancel = CancellationToken::new();
    let driver_task = tokio::spawn(driver.run(Arc::clone(&session), cancel.clone()));

    let state = AppState::new(Arc::clone(&session), &config.http);
    let addr = format!("{}:{}", config.http.bind_host(), config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Bridging {} on {} as {}",
        style("⚡").bold(),
        style(&config.irc.channel).cyan(),
        style(format!("{}:{}", config.irc.server, config.irc.port)).cyan(),
        style(&config.irc.nickname).cyan()
    );
    println!(
        "  {} HTTP API listening on {}",
        style("⚡").bold(),
        style(format!("http://{addr}")).cyan()
    );
    if config.http.text_transform != TextTransform::None {
        println!(
            "  {} Message text transform: {}",
            style("⚡").bold(),
            style(config.http.text_transform).cyan()
        );
    }
    println!("  {}", style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);
    let shutdown = {
        let cancel = cancel.clone();
        async move {
            tokio::select! {
                _ = shutdown_signal() => {
                    tracing::info!("shutdown signal received");
                }
                _ = cancel.cancelled() => {}
            }
        }
    };

    // The driver finishing means the connection is gone: stop serving.
    let watchdog = {
        let cancel = cancel.clone();
        async move {
            if let Err(e) = driver_task.await {
                tracing::error!(error = %e, "irc driver task failed");
            }
            cancel.cancel();
        }
    };
    let watchdog = tokio::spawn(watchdog);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    // Server stopped on a signal: tell the driver to QUIT and wait for it.
    cancel.cancel();
    let _ = watchdog.await;

    println!("\n  Bridge stopped ({}).", session.state());
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
