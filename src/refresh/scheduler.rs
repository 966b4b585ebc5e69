//! Timer-driven refresh cycles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info};

use super::orchestrator::Orchestrator;
use super::outcome::{tally, RefreshOutcome};

/// Runs before every cycle, timer-driven or triggered.
#[async_trait]
pub trait CycleHook: Send + Sync {
    async fn before_cycle(&self, orchestrator: &Orchestrator);
}

/// Commands accepted by the background loop.
#[derive(Debug)]
pub enum SyncCommand {
    /// Run a cycle now and reply with its outcomes.
    Trigger(oneshot::Sender<Vec<RefreshOutcome>>),
    /// Change the period; `None` disables timer-driven cycles.
    SetInterval(Option<Duration>),
    Stop,
}

/// Handle for controlling a running [`BackgroundSync`] loop.
#[derive(Debug)]
pub struct SyncHandle {
    command_tx: mpsc::Sender<SyncCommand>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Run a cycle now. Returns `None` if the loop has stopped.
    pub async fn trigger(&self) -> Option<Vec<RefreshOutcome>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(SyncCommand::Trigger(reply_tx))
            .await
            .ok()?;
        reply_rx.await.ok()
    }

    /// Returns `false` if the loop has stopped.
    pub async fn set_interval(&self, interval: Option<Duration>) -> bool {
        self.command_tx
            .send(SyncCommand::SetInterval(interval))
            .await
            .is_ok()
    }

    /// Stop the loop and wait for an in-flight cycle to finish.
    pub async fn stop(self) {
        if self.command_tx.send(SyncCommand::Stop).await.is_err() {
            debug!("Background sync already stopped");
        }
        if let Err(e) = self.task.await {
            debug!("Background sync task ended abnormally: {e}");
        }
    }
}

pub struct BackgroundSync;

impl BackgroundSync {
    /// Spawn the loop. With `interval == None` only triggered cycles run.
    ///
    /// The first timer-driven cycle runs one full period after start.
    #[must_use]
    pub fn start(orchestrator: Arc<Orchestrator>, interval: Option<Duration>) -> SyncHandle {
        Self::start_with_hook(orchestrator, interval, None)
    }

    #[must_use]
    pub fn start_with_hook(
        orchestrator: Arc<Orchestrator>,
        interval: Option<Duration>,
        hook: Option<Arc<dyn CycleHook>>,
    ) -> SyncHandle {
        let (command_tx, mut command_rx) = mpsc::channel::<SyncCommand>(16);

        let task = tokio::spawn(async move {
            let mut timer = interval.map(delayed_interval);
            log_period(interval);

            loop {
                tokio::select! {
                    () = next_tick(&mut timer) => {
                        let outcomes = run_cycle(&orchestrator, hook.as_deref()).await;
                        let (synced, failed) = tally(&outcomes);
                        info!(synced, failed, "Scheduled refresh finished");
                    }
                    command = command_rx.recv() => match command {
                        Some(SyncCommand::Trigger(reply)) => {
                            let outcomes = run_cycle(&orchestrator, hook.as_deref()).await;
                            if reply.send(outcomes).is_err() {
                                debug!("Trigger caller went away before the cycle finished");
                            }
                        }
                        Some(SyncCommand::SetInterval(period)) => {
                            timer = period.map(delayed_interval);
                            log_period(period);
                        }
                        Some(SyncCommand::Stop) | None => break,
                    },
                }
            }
            info!("Background sync stopped");
        });

        SyncHandle { command_tx, task }
    }
}

async fn run_cycle(orchestrator: &Orchestrator, hook: Option<&dyn CycleHook>) -> Vec<RefreshOutcome> {
    if let Some(hook) = hook {
        hook.before_cycle(orchestrator).await;
    }
    orchestrator.refresh_all().await
}

fn delayed_interval(period: Duration) -> Interval {
    let mut timer = time::interval_at(time::Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn log_period(period: Option<Duration>) {
    match period {
        Some(period) => info!(
            "Background refresh every {}",
            humantime::format_duration(period)
        ),
        None => info!("Background refresh disabled; waiting for manual triggers"),
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
