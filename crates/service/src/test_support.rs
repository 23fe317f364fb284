//! In-memory repositories for service tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use liftlog_client::{ExerciseRepository, JobRepository, RequestError};
use liftlog_core::constants::TIMED_OUT_ERROR;
use liftlog_core::{Exercise, ExerciseSummary, Job, JobId, JobStatus};
use tokio::sync::Notify;
use tokio::time::Instant;

pub(crate) fn pending_job(id: &str, message: &str) -> Job {
    Job::placeholder(message).with_id(id)
}

pub(crate) fn ids(jobs: &[Job]) -> Vec<String> {
    jobs.iter()
        .map(|job| job.id.as_ref().map_or_else(|| "-".to_owned(), ToString::to_string))
        .collect()
}

fn unavailable() -> RequestError {
    RequestError::HttpStatus { code: 503, body: "Service Unavailable".to_owned() }
}

/// Job store held in memory. Created jobs become pending unless
/// `forget_created` is set, which mimics a store that has not caught up yet.
#[derive(Default)]
pub(crate) struct FakeJobs {
    pending: Mutex<Vec<Job>>,
    list_starts: Mutex<Vec<Instant>>,
    gates: Mutex<VecDeque<Arc<Notify>>>,
    latency: Mutex<Duration>,
    fail_lists: AtomicBool,
    fail_writes: AtomicBool,
    forget_created: AtomicBool,
    created: AtomicUsize,
}

impl FakeJobs {
    pub(crate) fn with_pending(jobs: Vec<Job>) -> Arc<Self> {
        let fake = Self::default();
        *fake.pending.lock().unwrap() = jobs;
        Arc::new(fake)
    }

    pub(crate) fn set_pending(&self, jobs: Vec<Job>) {
        *self.pending.lock().unwrap() = jobs;
    }

    pub(crate) fn pending(&self) -> Vec<Job> {
        self.pending.lock().unwrap().clone()
    }

    pub(crate) fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub(crate) fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn forget_created(&self, forget: bool) {
        self.forget_created.store(forget, Ordering::SeqCst);
    }

    /// The next list call answers with the data it saw on entry, but only once
    /// the returned gate is notified.
    pub(crate) fn hold_next_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().push_back(Arc::clone(&gate));
        gate
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_starts.lock().unwrap().len()
    }

    pub(crate) fn list_starts(&self) -> Vec<Instant> {
        self.list_starts.lock().unwrap().clone()
    }

    /// Yields until `n` list calls have started.
    pub(crate) async fn wait_for_lists(&self, n: usize) {
        while self.list_calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl JobRepository for FakeJobs {
    async fn list_pending_jobs(&self) -> Result<Vec<Job>, RequestError> {
        self.list_starts.lock().unwrap().push(Instant::now());
        let seen = self.pending();
        let gate = self.gates.lock().unwrap().pop_front();
        let latency = *self.latency.lock().unwrap();

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(seen.into_iter().filter(|job| !job.is_terminal()).collect())
    }

    async fn create_jobs(&self, messages: &[String]) -> Result<Vec<Job>, RequestError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let created: Vec<Job> = messages
            .iter()
            .map(|message| {
                let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
                pending_job(&format!("new-{n}"), message)
            })
            .collect();
        if !self.forget_created.load(Ordering::SeqCst) {
            self.pending.lock().unwrap().extend(created.iter().cloned());
        }
        Ok(created)
    }

    async fn mark_timed_out(&self, job_id: &JobId) -> Result<Job, RequestError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let mut pending = self.pending.lock().unwrap();
        let position = pending
            .iter()
            .position(|job| job.has_id(job_id))
            .ok_or_else(|| RequestError::NotFound { entity: "job", id: job_id.to_string() })?;
        let mut job = pending.remove(position).with_status(JobStatus::Failed);
        job.error = Some(TIMED_OUT_ERROR.to_owned());
        Ok(job)
    }
}

#[derive(Default)]
pub(crate) struct FakeExercises {
    pub(crate) rows: Mutex<Vec<Exercise>>,
    pub(crate) fail: AtomicBool,
}

#[async_trait]
impl ExerciseRepository for FakeExercises {
    async fn list_summaries(&self) -> Result<Vec<ExerciseSummary>, RequestError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.rows.lock().unwrap().iter().rev().map(|e| e.summary.clone()).collect())
    }

    async fn get_exercise(&self, id: &str) -> Result<Exercise, RequestError> {
        tokio::task::yield_now().await;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| RequestError::NotFound { entity: "exercise", id: id.to_owned() })
    }

    async fn update_exercise(&self, exercise: &Exercise) -> Result<Exercise, RequestError> {
        exercise.validate()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|e| e.id() == exercise.id())
            .ok_or_else(|| RequestError::NotFound {
                entity: "exercise",
                id: exercise.id().to_owned(),
            })?;
        *row = exercise.clone();
        Ok(row.clone())
    }
}
