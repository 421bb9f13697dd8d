//! Per-monitor polling tasks.
//!
//! [`MonitorScheduler::start`] spawns one task per enabled monitor. Each task
//! owns its spec and ticks on its own timer, so a slow page only ever delays
//! its own next check. A single `watch` channel fans the shutdown signal out
//! to every task.

mod pipeline;

use std::sync::Arc;
use std::time::Instant;

use stockwatch_core::MonitorSpec;
use stockwatch_notify::Announcement;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

pub use pipeline::{Dispatch, Pipeline, TickOutcome};

/// Handle to the running monitor tasks.
///
/// Dropping it without calling [`MonitorScheduler::shutdown`] aborts the
/// tasks without retracting announcements.
pub struct MonitorScheduler {
    pipeline: Arc<Pipeline>,
    shutdown_tx: watch::Sender<bool>,
    tasks: JoinSet<()>,
    unannounced: Vec<MonitorSpec>,
    announcements: Vec<Announcement>,
}

impl MonitorScheduler {
    /// Spawns a task for every enabled monitor. Nothing is posted yet; see
    /// [`MonitorScheduler::announce`].
    pub fn start(monitors: Vec<MonitorSpec>, pipeline: Pipeline) -> Self {
        let pipeline = Arc::new(pipeline);
        let (shutdown_tx, _) = watch::channel(false);
        let mut tasks = JoinSet::new();
        let mut unannounced = Vec::new();

        for spec in monitors {
            if !spec.enabled {
                tracing::debug!(monitor = %spec.friendly_name, "monitor disabled; not scheduling");
                continue;
            }

            tracing::info!(
                monitor = %spec.friendly_name,
                interval_secs = spec.interval_secs,
                rule = spec.rule.kind(),
                "checking every {} seconds",
                spec.interval_secs
            );

            if pipeline.dispatch.posting_enabled() {
                unannounced.push(spec.clone());
            }
            let shutdown_rx = shutdown_tx.subscribe();
            tasks.spawn(run_monitor(spec, Arc::clone(&pipeline), shutdown_rx));
        }

        tracing::info!(running = tasks.len(), "monitor scheduler started");

        Self {
            pipeline,
            shutdown_tx,
            tasks,
            unannounced,
            announcements: Vec::new(),
        }
    }

    /// Posts the "now watching" message for every scheduled monitor, all at
    /// once, while the monitors are already ticking.
    ///
    /// Does nothing unless posting is enabled. Each announcement is recorded
    /// as soon as it is created, so dropping this future early (for example
    /// on a shutdown signal) keeps the ones that already landed; requests
    /// still in flight are abandoned. Failures are logged.
    pub async fn announce(&mut self) {
        let Some(remote) = self.pipeline.dispatch.remote().cloned() else {
            return;
        };

        let mut pending = JoinSet::new();
        for spec in std::mem::take(&mut self.unannounced) {
            let remote = Arc::clone(&remote);
            pending.spawn(async move {
                let result = remote.announce(&spec.destination, &spec).await;
                (spec.friendly_name, result)
            });
        }

        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok((_, Ok(Some(announcement)))) => self.announcements.push(announcement),
                Ok((_, Ok(None))) => {}
                Ok((monitor, Err(e))) => tracing::error!(
                    monitor = %monitor,
                    error = %e,
                    "failed to post watching announcement"
                ),
                Err(e) => tracing::error!(error = %e, "announcement task failed"),
            }
        }
    }

    /// Number of monitor tasks still running.
    #[must_use]
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    /// Cancels every monitor task and waits for all of them to exit.
    ///
    /// Returns the announcements created so far so the caller can retract
    /// them. Once this returns no further ticks will run.
    pub async fn shutdown(mut self) -> Vec<Announcement> {
        // Receivers only disappear when their task has already exited.
        let _ = self.shutdown_tx.send(true);

        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    tracing::error!(error = %e, "monitor task panicked");
                }
            }
        }

        tracing::info!("all monitor tasks stopped");
        std::mem::take(&mut self.announcements)
    }
}

/// Timer loop for one monitor.
///
/// The first check runs one full interval after start. Ticks never overlap:
/// if a check overruns the interval the next one is delayed instead of
/// bunching up.
async fn run_monitor(
    spec: MonitorSpec,
    pipeline: Arc<Pipeline>,
    mut shutdown: watch::Receiver<bool>,
) {
    let period = spec.interval();
    // The second deadline must be representable too.
    let now = tokio::time::Instant::now();
    let Some(first) = now.checked_add(period).filter(|t| t.checked_add(period).is_some()) else {
        tracing::error!(
            monitor = %spec.friendly_name,
            interval_secs = spec.interval_secs,
            "interval too large to schedule; monitor not started"
        );
        return;
    };
    let mut ticker = tokio::time::interval_at(first, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        tracing::info!(monitor = %spec.friendly_name, "checking if in stock...");
        let started = Instant::now();

        // A shutdown mid-check abandons the in-flight fetch.
        let outcome = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            outcome = pipeline.run_tick(&spec) => outcome,
        };

        let elapsed = started.elapsed();
        tracing::info!(
            monitor = %spec.friendly_name,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            outcome = ?outcome,
            "took {elapsed:?} to check stock"
        );
    }

    tracing::debug!(monitor = %spec.friendly_name, "monitor task stopped");
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
