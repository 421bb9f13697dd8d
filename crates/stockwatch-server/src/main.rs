mod logging;
mod scheduler;
mod shutdown;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use stockwatch_core::{AppConfig, MonitorSpec};
use stockwatch_notify::{ArtifactNotifier, DiscordNotifier, LogNotifier, Notifier};
use stockwatch_scraper::{PageClient, PageSource};

use crate::scheduler::{Dispatch, MonitorScheduler, Pipeline};

#[derive(Debug, Parser)]
#[command(name = "stockwatch", about = "Poll product pages and alert when they come back in stock")]
struct Cli {
    /// Monitors file (JSON or YAML). Overrides `CONFIG_FILE`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate configuration and the monitors file, print a summary, and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = stockwatch_core::load_app_config()?;
    let _log_guard = logging::init(&config.log_level, config.log_file.as_deref())?;

    let monitors_path = config.resolve_monitors_path(cli.config)?;
    let monitors = stockwatch_core::load_monitors(&monitors_path)?;
    tracing::info!(
        path = %monitors_path.display(),
        monitors = monitors.len(),
        enabled = monitors.iter().filter(|m| m.enabled).count(),
        "loaded monitors"
    );

    if cli.check {
        print_summary(&config, &monitors);
        return Ok(());
    }

    let source: Arc<dyn PageSource> =
        Arc::new(PageClient::new(config.request_timeout_secs, &config.user_agent)?);
    let dispatch = build_dispatch(&config)?;
    let posting = dispatch.posting_enabled();
    let remote = dispatch.remote().cloned();

    let pipeline = Pipeline {
        source,
        dispatch,
        fetch_timeout: Duration::from_secs(config.request_timeout_secs),
    };

    // Listen for signals before anything is posted, so an early CTRL-C still
    // retracts the announcements that made it out.
    let shutdown = shutdown::shutdown_signal();
    tokio::pin!(shutdown);

    let mut scheduler = MonitorScheduler::start(monitors, pipeline);
    let interrupted = tokio::select! {
        biased;
        () = &mut shutdown => true,
        () = scheduler.announce() => false,
    };
    if !interrupted {
        tracing::info!(
            running = scheduler.running(),
            posting,
            "monitors running; press CTRL-C to exit"
        );
        shutdown.await;
    }

    let announcements = scheduler.shutdown().await;

    if let Some(remote) = remote {
        for announcement in &announcements {
            if let Err(e) = remote.retract(announcement).await {
                tracing::error!(
                    channel = %announcement.destination,
                    message_id = %announcement.message_id,
                    error = %e,
                    "failed to delete watching announcement"
                );
            }
        }
        tracing::info!(deleted = announcements.len(), "cleaned up announcements");
    }

    Ok(())
}

/// Picks the alert sinks from configuration.
///
/// The local sink is the artifact file when one is configured, otherwise the
/// log. Discord is only wired up when posting is enabled.
fn build_dispatch(config: &AppConfig) -> anyhow::Result<Dispatch> {
    let local: Arc<dyn Notifier> = match &config.artifact_path {
        Some(path) => Arc::new(ArtifactNotifier::new(path.clone())),
        None => Arc::new(LogNotifier),
    };

    if !config.post_to_discord {
        tracing::info!("POST_TO_DISCORD is off; alerts stay local");
        return Ok(Dispatch::local_only(local));
    }

    let token = config
        .discord_token
        .as_deref()
        .context("posting to Discord requires STOCKWATCH_DISCORD_TOKEN")?;
    let discord = DiscordNotifier::new(&config.discord_api_base, token)?;
    Ok(Dispatch::posting(Arc::new(discord), local))
}

fn print_summary(config: &AppConfig, monitors: &[MonitorSpec]) {
    println!(
        "posting to discord: {}",
        if config.post_to_discord { "yes" } else { "no" }
    );
    for spec in monitors {
        println!(
            "{:<8} {:<10} every {:>4}s  {}  ({})",
            if spec.enabled { "enabled" } else { "disabled" },
            spec.rule.kind(),
            spec.interval_secs,
            spec.friendly_name,
            spec.url
        );
    }
}
