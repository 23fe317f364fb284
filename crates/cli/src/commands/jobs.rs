use std::sync::Arc;

use anyhow::Result;
use liftlog_client::SupabaseClient;
use liftlog_core::{Job, JobId};
use liftlog_service::{JobTracker, TrackerSettings};

use super::print_json;

fn tracker(client: Arc<SupabaseClient>, settings: TrackerSettings) -> Arc<JobTracker> {
    Arc::new(JobTracker::new(client, settings))
}

pub(crate) async fn run_log(
    client: Arc<SupabaseClient>,
    settings: TrackerSettings,
    messages: &[String],
    watch: bool,
) -> Result<()> {
    let tracker = tracker(client, settings);
    let created = tracker.submit(messages).await?;
    tracing::info!(count = created.len(), "submitted workout messages");
    print_json(tracker.snapshot().jobs())?;

    if watch {
        follow(&tracker).await?;
    }
    Ok(())
}

pub(crate) async fn run_watch(
    client: Arc<SupabaseClient>,
    settings: TrackerSettings,
) -> Result<()> {
    follow(&tracker(client, settings)).await
}

pub(crate) async fn run_pending(
    client: Arc<SupabaseClient>,
    settings: TrackerSettings,
) -> Result<()> {
    let tracker = tracker(client, settings);
    if !tracker.refresh().await {
        if let Some(err) = tracker.snapshot().last_error() {
            anyhow::bail!("failed to load pending jobs: {err}");
        }
    }
    print_json(tracker.snapshot().jobs())
}

pub(crate) async fn run_timeout(
    client: Arc<SupabaseClient>,
    settings: TrackerSettings,
    job_id: String,
) -> Result<()> {
    let job = tracker(client, settings).timeout(&JobId::from(job_id)).await?;
    print_json(&job)
}

/// Polls in the background and prints the job list whenever it changes, until
/// Ctrl-C.
async fn follow(tracker: &Arc<JobTracker>) -> Result<()> {
    let mut view = tracker.subscribe();
    let handle = tracker.start_polling();
    let mut shown: Option<Vec<Job>> = None;

    loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let jobs = view.borrow_and_update().jobs().to_vec();
                if shown.as_ref() != Some(&jobs) {
                    print_json(&jobs)?;
                    shown = Some(jobs);
                }
            },
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("interrupted, stopping");
                break;
            },
        }
    }

    handle.shutdown().await?;
    Ok(())
}
