use async_trait::async_trait;
use liftlog_core::{Job, JobId};

use crate::error::RequestError;

/// Remote operations on processing jobs.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Jobs updated within the pending window that have not completed or
    /// failed, in store order.
    async fn list_pending_jobs(&self) -> Result<Vec<Job>, RequestError>;

    /// Create one job per message in a single batch. Returns the stored
    /// records with their server-assigned ids. Every call inserts new rows,
    /// so retrying duplicates the jobs.
    async fn create_jobs(&self, messages: &[String]) -> Result<Vec<Job>, RequestError>;

    /// Mark a job failed with the timed-out error and return the updated row.
    async fn mark_timed_out(&self, job_id: &JobId) -> Result<Job, RequestError>;

    /// Single-message form of [`Self::create_jobs`].
    async fn create_job(&self, message: &str) -> Result<Vec<Job>, RequestError> {
        self.create_jobs(&[message.to_owned()]).await
    }
}
