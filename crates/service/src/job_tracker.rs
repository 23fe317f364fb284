//! Client-side view of in-flight jobs, reconciled against the store.
//!
//! Three sources write to the view: refreshes (server truth), optimistic
//! inserts right after a submission, and explicit timeouts. Every write is one
//! `send_modify` on the view channel, so observers never see a half-applied
//! update.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use liftlog_client::{JobRepository, RequestError};
use liftlog_core::{Job, JobId};
use tokio::sync::watch;
use tokio::time::Instant;
use uuid::Uuid;

use crate::outcome::{CallState, Outcome, Settle, tracked};
use crate::settings::{ReconcileMode, TrackerSettings};

/// Snapshot of the jobs a user should currently see as in flight.
#[derive(Debug, Clone, Default)]
pub struct JobView {
    jobs: Vec<Job>,
    calls: CallState,
    last_refreshed_at: Option<DateTime<Utc>>,
    ledger: Ledger,
}

/// Bookkeeping that travels with the view but is not part of what it shows.
#[derive(Debug, Clone, Default)]
struct Ledger {
    /// Bumped by every accepted timeout.
    generation: u64,
    tombstones: Vec<Tombstone>,
    optimistic: Vec<Provisional>,
    /// Sequence number of the newest refresh applied so far.
    applied_refresh: u64,
}

/// A job the store accepted as timed out. Refreshes issued before
/// `generation` may still list it as pending.
#[derive(Debug, Clone)]
struct Tombstone {
    id: JobId,
    generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Provisional {
    correlation: Uuid,
    added_at: Instant,
}

impl Ledger {
    fn bury(&mut self, id: JobId) {
        self.generation = self.generation.saturating_add(1);
        self.tombstones.push(Tombstone { id, generation: self.generation });
    }

    fn buried_since(&self, job: &Job, issued: u64) -> bool {
        self.tombstones.iter().any(|t| t.generation > issued && job.has_id(&t.id))
    }

    fn prune_tombstones(&mut self, issued: u64) {
        self.tombstones.retain(|t| t.generation > issued);
    }
}

impl JobView {
    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.calls.is_loading()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&Arc<RequestError>> {
        self.calls.last_error()
    }

    #[must_use]
    pub const fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed_at
    }

    #[must_use]
    pub fn contains(&self, id: &JobId) -> bool {
        self.jobs.iter().any(|job| job.has_id(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Number of optimistic jobs still waiting for the store to confirm them.
    #[must_use]
    pub fn unconfirmed(&self) -> usize {
        self.ledger.optimistic.len()
    }

    fn insert_optimistic(&mut self, mut job: Job, now: Instant) -> bool {
        if let Some(id) = &job.id {
            if self.contains(id) {
                tracing::debug!(job_id = %id, "job already visible, skipping optimistic insert");
                return false;
            }
        }
        let correlation = *job.correlation.get_or_insert_with(Uuid::new_v4);
        self.ledger.optimistic.push(Provisional { correlation, added_at: now });
        self.jobs.push(job);
        true
    }

    fn remove(&mut self, id: &JobId) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|job| !job.has_id(id));
        before - self.jobs.len()
    }

    fn apply_refresh(
        &mut self,
        fetched: &[Job],
        issued: u64,
        settings: &TrackerSettings,
        now: Instant,
    ) {
        let mut next: Vec<Job> = fetched
            .iter()
            .filter(|job| !self.ledger.buried_since(job, issued))
            .cloned()
            .collect();
        self.ledger.prune_tombstones(issued);

        match settings.mode {
            ReconcileMode::Replace => self.ledger.optimistic.clear(),
            ReconcileMode::Merge => {
                let kept = self.retain_unconfirmed(&next, now, settings.optimistic_grace);
                next.extend(kept);
            },
        }

        self.jobs = next;
        self.last_refreshed_at = Some(Utc::now());
    }

    /// Drops optimistic entries that the store confirmed, that outlived the
    /// grace period, or that were removed from the view; returns the rest.
    fn retain_unconfirmed(&mut self, fetched: &[Job], now: Instant, grace: Duration) -> Vec<Job> {
        let jobs = &self.jobs;
        let find = |correlation: Uuid| jobs.iter().find(|j| j.correlation == Some(correlation));

        self.ledger.optimistic.retain(|provisional| {
            let Some(job) = find(provisional.correlation) else {
                return false;
            };
            let confirmed =
                job.id.as_ref().is_some_and(|id| fetched.iter().any(|f| f.has_id(id)));
            let expired = now.saturating_duration_since(provisional.added_at) >= grace;
            !confirmed && !expired
        });

        self.ledger
            .optimistic
            .iter()
            .filter_map(|provisional| find(provisional.correlation).cloned())
            .collect()
    }
}

fn job_calls(view: &mut JobView) -> &mut CallState {
    &mut view.calls
}

/// Keeps a [`JobView`] of in-flight jobs up to date.
///
/// The repository is injected so tests (and other backends) can substitute
/// their own. Share the tracker behind an `Arc` to poll it in the background
/// with [`JobTracker::start_polling`].
pub struct JobTracker {
    repo: Arc<dyn JobRepository>,
    settings: TrackerSettings,
    view: watch::Sender<JobView>,
    refresh_seq: AtomicU64,
}

impl JobTracker {
    #[must_use]
    pub fn new(repo: Arc<dyn JobRepository>, settings: TrackerSettings) -> Self {
        let (view, _) = watch::channel(JobView::default());
        Self { repo, settings, view, refresh_seq: AtomicU64::new(0) }
    }

    #[must_use]
    pub const fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Current view.
    #[must_use]
    pub fn snapshot(&self) -> JobView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every change to the view.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<JobView> {
        self.view.subscribe()
    }

    /// Fetches the pending list and reconciles the view with it.
    ///
    /// Returns `false` if the fetch failed; the view keeps its jobs and the
    /// error is published as `last_error`.
    pub async fn refresh(&self) -> bool {
        self.refresh_unless(|| false).await
    }

    /// [`Self::refresh`], except the result is dropped if `discard` says so
    /// once the fetch returns.
    pub(crate) async fn refresh_unless<D: Fn() -> bool>(&self, discard: D) -> bool {
        let seq = self.refresh_seq.fetch_add(1, Ordering::Relaxed).saturating_add(1);
        let issued = self.view.borrow().ledger.generation;
        let settings = self.settings;

        let outcome = tracked(
            &self.view,
            "refresh",
            job_calls,
            self.repo.list_pending_jobs(),
            |view, outcome| {
                if discard() {
                    return Settle::Discard;
                }
                if let Ok(jobs) = outcome {
                    if seq < view.ledger.applied_refresh {
                        tracing::debug!(seq, "newer refresh already applied, dropping result");
                        return Settle::Record;
                    }
                    view.ledger.applied_refresh = seq;
                    view.apply_refresh(jobs, issued, &settings, Instant::now());
                    tracing::debug!(pending = view.jobs.len(), "refreshed pending jobs");
                }
                Settle::Record
            },
        )
        .await;

        outcome.is_ok()
    }

    /// Shows `job` right away, before the store has confirmed it.
    ///
    /// Returns `false` if a job with the same id is already visible.
    pub fn add_optimistic(&self, job: Job) -> bool {
        let mut inserted = false;
        self.view.send_modify(|view| inserted = view.insert_optimistic(job, Instant::now()));
        inserted
    }

    /// Marks a job timed out on the store and drops it from the view.
    ///
    /// The job leaves the view whether or not the store accepted the change;
    /// a rejection is still returned and published as `last_error`.
    pub async fn timeout(&self, job_id: &JobId) -> Outcome<Job> {
        tracked(
            &self.view,
            "timeout",
            job_calls,
            self.repo.mark_timed_out(job_id),
            |view, outcome| {
                let removed = view.remove(job_id);
                if outcome.is_ok() {
                    view.ledger.bury(job_id.clone());
                }
                tracing::info!(
                    job_id = %job_id,
                    removed,
                    accepted = outcome.is_ok(),
                    "timed out job"
                );
                Settle::Record
            },
        )
        .await
    }

    /// Creates jobs for `messages` and shows each created job optimistically.
    pub async fn submit(&self, messages: &[String]) -> Outcome<Vec<Job>> {
        tracked(
            &self.view,
            "submit",
            job_calls,
            self.repo.create_jobs(messages),
            |view, outcome| {
                if let Ok(jobs) = outcome {
                    let now = Instant::now();
                    for job in jobs {
                        view.insert_optimistic(job.clone(), now);
                    }
                }
                Settle::Record
            },
        )
        .await
    }
}
