//! Background refresh loop for a [`JobTracker`].

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

use crate::job_tracker::JobTracker;

/// Owns a running poll loop.
///
/// The loop stops when [`PollHandle::cancel`] is called or the handle is
/// dropped. A refresh already in flight at that point runs to completion but
/// its result is thrown away.
#[derive(Debug)]
pub struct PollHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Asks the loop to stop; no refresh starts after this returns.
    pub fn cancel(&self) {
        self.stop.send_replace(true);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the loop to exit. Does not cancel it.
    pub async fn join(self) -> Result<(), JoinError> {
        self.task.await
    }

    /// Cancels the loop and waits for it to exit.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.cancel();
        self.join().await
    }
}

fn stop_requested(stopped: &watch::Receiver<bool>) -> bool {
    *stopped.borrow() || stopped.has_changed().is_err()
}

impl JobTracker {
    /// Spawns the poll loop: refresh immediately, then again `poll_interval`
    /// after each refresh completes, whether it succeeded or not.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start_polling(self: &Arc<Self>) -> PollHandle {
        let (stop, mut stopped) = watch::channel(false);
        let tracker = Arc::clone(self);
        let delay = self.settings().poll_interval;

        let task = tokio::spawn(async move {
            tracing::info!(?delay, mode = %tracker.settings().mode, "job polling started");
            let mut ticks: u64 = 0;
            loop {
                if stop_requested(&stopped) {
                    break;
                }
                ticks = ticks.wrapping_add(1);
                let ok = tracker.refresh_unless(|| stop_requested(&stopped)).await;
                tracing::debug!(tick = ticks, ok, "poll tick");

                tokio::select! {
                    _ = stopped.changed() => break,
                    () = tokio::time::sleep(delay) => {},
                }
            }
            tracing::info!(ticks, "job polling stopped");
        });

        PollHandle { stop, task }
    }
}
