//! # notifreezed — NotiFreeze daemon
//!
//! Composition root that wires the virtual host to the freeze monitor.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Build the virtual host from the `[virtual]` section
//! - Set up the freeze monitor against the host ports
//! - Play the scripted scenario and run until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use anyhow::Context;
use notifreeze_adapter_virtual::VirtualHost;
use notifreeze_app::monitor::FreezeMonitor;
use notifreeze_domain::error::NotiFreezeError;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let mut host =
        VirtualHost::from_config(&config.virtual_host).context("building virtual host")?;

    let mut monitor = match FreezeMonitor::setup(
        &config.notifreeze,
        host.store(),
        host.scheduler(),
        host.notifier(),
    )
    .await
    {
        Ok(monitor) => monitor,
        Err(NotiFreezeError::Validation(err)) => {
            tracing::warn!(%err, "freeze monitor not started");
            return Ok(());
        }
        Err(err) => return Err(err).context("setting up freeze monitor"),
    };

    let scenario = host
        .play(&config.virtual_host.scenario)
        .context("loading scenario")?;

    host.run(&mut monitor, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "unable to listen for shutdown signal");
        }
    })
    .await;

    scenario.abort();
    tracing::info!("notifreezed stopped");
    Ok(())
}
