//! Background task scheduler
//!
//! One long-lived scheduler owns every timer the relay needs: recurring jobs
//! (counter window reset, retention sweep) and one-shot jobs (pause expiry).
//! Each task gets a child cancellation token, so it can be cancelled on its
//! own or together with everything else at shutdown.

use std::future::Future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    shutdown: CancellationToken,
    tracker: TaskTracker,
}

/// Handle to a scheduled task. Dropping it does not cancel the task.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl TaskHandle {
    /// Stop the task before its next run. A run already in progress finishes.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once after `delay` unless cancelled first.
    pub fn run_once_after<F, Fut>(&self, name: &'static str, delay: Duration, task: F) -> TaskHandle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.child_token();
        let handle = TaskHandle {
            token: token.clone(),
        };

        debug!(task = name, delay_secs = delay.as_secs(), "Scheduling one-shot task");

        self.tracker.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(task = name, "One-shot task cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    task().await;
                }
            }
        });

        handle
    }

    /// Run `task` every `period`, first run one period from now.
    ///
    /// Runs never overlap: a slow run delays the following tick instead of
    /// bunching missed ticks together.
    pub fn run_every<F, Fut>(&self, name: &'static str, period: Duration, mut task: F) -> TaskHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.child_token();
        let handle = TaskHandle {
            token: token.clone(),
        };

        info!(task = name, period_secs = period.as_secs(), "Starting recurring task");

        self.tracker.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!(task = name, "Recurring task stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        task().await;
                    }
                }
            }
        });

        handle
    }

    /// Number of tasks that have not finished yet.
    pub fn active_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel every task and wait for them to finish.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        info!("Scheduler stopped");
    }
}
